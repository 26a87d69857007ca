//! Locating the images and narration of a scene.

use scenereel_common::paths::{
    default_audio_name, is_audio_file, is_image_file, matches_scene_prefix,
};
use scenereel_common::{Scene, SceneRecord};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::SceneError;

/// Directories scene assets are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirs {
    pub images_dir: PathBuf,
    pub audio_dir: PathBuf,
}

/// Resolve a scene list record into a [`Scene`] with absolute asset paths.
///
/// Images come from the record's explicit list when present (entries that do
/// not exist are dropped with a warning), otherwise from the files in the
/// images directory whose name starts with `scene<N>_`. Audio comes from the
/// record or defaults to `s<N>.mp3`.
pub fn resolve_scene(record: &SceneRecord, dirs: &AssetDirs) -> Result<Scene, SceneError> {
    let number = record.scene_number;

    let images = match &record.images {
        Some(names) => explicit_images(number, names, &dirs.images_dir),
        None => discover_images(&dirs.images_dir, number).map_err(|e| {
            SceneError::assets(format!(
                "cannot read images directory {:?}: {e}",
                dirs.images_dir
            ))
        })?,
    };
    if images.is_empty() {
        return Err(SceneError::assets(format!(
            "no images found for scene {number}"
        )));
    }

    let audio_name = record
        .audio
        .clone()
        .unwrap_or_else(|| default_audio_name(number));
    let audio = dirs.audio_dir.join(audio_name);
    if !is_audio_file(&audio) {
        return Err(SceneError::assets(format!(
            "narration {audio:?} is not an audio file"
        )));
    }
    if !audio.is_file() {
        return Err(SceneError::assets(format!(
            "narration {audio:?} not found"
        )));
    }

    let images = images
        .iter()
        .map(|p| absolute(p))
        .collect::<Result<Vec<_>, _>>()?;
    let audio = absolute(&audio)?;

    Scene::new(number, images, audio).map_err(|e| SceneError::assets(e.to_string()))
}

/// Image files of a scene, found by their `scene<N>_` prefix and sorted by
/// file name.
pub fn discover_images(images_dir: &Path, number: u32) -> std::io::Result<Vec<PathBuf>> {
    if !images_dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not a directory",
        ));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(images_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_image_file(path))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| matches_scene_prefix(name, number))
        })
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

fn explicit_images(number: u32, names: &[String], images_dir: &Path) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| images_dir.join(name))
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                tracing::warn!("Scene {}: image {:?} not found, ignoring", number, path);
            }
            exists
        })
        .collect()
}

fn absolute(path: &Path) -> Result<PathBuf, SceneError> {
    std::path::absolute(path)
        .map_err(|e| SceneError::assets(format!("cannot resolve {path:?}: {e}")))
}
