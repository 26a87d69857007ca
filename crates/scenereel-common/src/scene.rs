//! Scene list records and resolved scenes.
//!
//! A [`SceneList`] is the parsed, structurally validated form of the scene list
//! produced by the upstream script generator, either a JSON array or a
//! directory of `scene<N>.txt` files. A [`Scene`] is one record after
//! its image and audio assets have been located on disk.

use crate::paths::scene_text_number;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One entry of the scene list, as supplied by the scene generator.
///
/// Only `scene_number` is required. When `images` is absent the images are
/// discovered by file name prefix; when `audio` is absent the narration
/// defaults to `s<N>.mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Positive, unique scene number. Also accepted as `number`.
    #[serde(alias = "number")]
    pub scene_number: u32,

    /// Free-form scene description from the script generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Explicit image file names, relative to the images directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Explicit narration file name, relative to the audio directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl SceneRecord {
    /// Create a record that relies on naming conventions for its assets.
    pub fn new(scene_number: u32) -> Self {
        Self {
            scene_number,
            description: None,
            images: None,
            audio: None,
        }
    }
}

/// A validated, ordered collection of scene records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SceneList {
    records: Vec<SceneRecord>,
}

impl SceneList {
    /// Validate a list of records.
    ///
    /// The list must be non-empty and every scene number must be positive and
    /// unique. Record order is preserved.
    pub fn new(records: Vec<SceneRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::invalid_scene_list("scene list is empty"));
        }

        let mut seen = HashSet::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.scene_number == 0 {
                return Err(Error::invalid_scene_list(format!(
                    "entry {i} has scene_number 0; scene numbers start at 1"
                )));
            }
            if !seen.insert(record.scene_number) {
                return Err(Error::invalid_scene_list(format!(
                    "duplicate scene_number {}",
                    record.scene_number
                )));
            }
            if let Some(images) = &record.images {
                if images.iter().any(|name| name.trim().is_empty()) {
                    return Err(Error::invalid_scene_list(format!(
                        "scene {} lists an empty image name",
                        record.scene_number
                    )));
                }
            }
        }

        Ok(Self { records })
    }

    /// Parse and validate a scene list from a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<SceneRecord> = serde_json::from_str(json)
            .map_err(|e| Error::invalid_scene_list(format!("malformed scene list: {e}")))?;
        Self::new(records)
    }

    /// Build a scene list from a directory of per-scene text files.
    ///
    /// Each `scene<N>.txt` lists the image file names of scene `N`, one per
    /// line. Blank lines are skipped, so an empty file gives a scene with no
    /// images, which the pipeline later skips. Narration follows the `s<N>.mp3`
    /// default. Other files in the directory are ignored.
    pub fn from_scene_files(dir: &Path) -> Result<Self> {
        let mut records = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(number) = entry.file_name().to_str().and_then(scene_text_number) else {
                continue;
            };

            let content = std::fs::read_to_string(entry.path())?;
            let images = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();

            records.push(SceneRecord {
                images: Some(images),
                ..SceneRecord::new(number)
            });
        }

        if records.is_empty() {
            return Err(Error::invalid_scene_list(format!(
                "no scene<N>.txt files in {}",
                dir.display()
            )));
        }
        records.sort_by_key(|r| r.scene_number);
        Self::new(records)
    }

    /// Read a scene list from a JSON file, or from a directory of
    /// `scene<N>.txt` files.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Self::from_scene_files(path);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Records in their original order.
    pub fn records(&self) -> &[SceneRecord] {
        &self.records
    }

    /// Records sorted by ascending scene number.
    pub fn sorted_by_number(&self) -> Vec<&SceneRecord> {
        let mut sorted: Vec<&SceneRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.scene_number);
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A scene whose assets have been located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    number: u32,
    images: Vec<PathBuf>,
    audio: PathBuf,
}

impl Scene {
    /// Create a resolved scene. The image list must be non-empty.
    pub fn new(number: u32, images: Vec<PathBuf>, audio: PathBuf) -> Result<Self> {
        if number == 0 {
            return Err(Error::invalid_input("scene number must be positive"));
        }
        if images.is_empty() {
            return Err(Error::invalid_input(format!(
                "scene {number} has no images"
            )));
        }
        Ok(Self {
            number,
            images,
            audio,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Images in display order.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn audio(&self) -> &Path {
        &self.audio
    }
}

/// An encoded scene clip, produced only when the scene encoded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneClip {
    pub number: u32,
    pub path: PathBuf,
}
