//! ffconcat manifests.
//!
//! A scene manifest lists every image with its display duration and then the
//! last image once more without a duration. The concat demuxer ignores the
//! duration of the final entry, so the trailing entry is what keeps the last
//! image on screen for its full duration.
//!
//! The same format, without durations, lists the scene clips for the merge.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One `file` line of a manifest, with an optional `duration` line.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub path: PathBuf,
    pub duration: Option<f64>,
}

/// An ordered ffconcat manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatManifest {
    entries: Vec<ManifestEntry>,
}

impl ConcatManifest {
    /// Build the manifest for a scene's image sequence.
    ///
    /// Every image is shown for `per_image_secs`, in the given order, followed
    /// by a hold-frame entry for the last image. The result always has
    /// `images.len() + 1` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `images` is empty or `per_image_secs`
    /// is not a finite positive number.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenereel_av::ConcatManifest;
    /// use std::path::PathBuf;
    ///
    /// let images = vec![PathBuf::from("/img/scene1_a.png"), PathBuf::from("/img/scene1_b.png")];
    /// let manifest = ConcatManifest::for_images(&images, 2.0)?;
    /// assert_eq!(manifest.len(), 3);
    /// assert_eq!(manifest.entries()[2].duration, None);
    /// # Ok::<(), scenereel_av::Error>(())
    /// ```
    pub fn for_images(images: &[PathBuf], per_image_secs: f64) -> Result<Self> {
        let last = images
            .last()
            .ok_or_else(|| Error::invalid_input("cannot build a manifest without images"))?;
        if !per_image_secs.is_finite() || per_image_secs <= 0.0 {
            return Err(Error::invalid_input(format!(
                "image duration must be positive, got {per_image_secs}"
            )));
        }

        let mut entries: Vec<ManifestEntry> = images
            .iter()
            .map(|path| ManifestEntry {
                path: path.clone(),
                duration: Some(per_image_secs),
            })
            .collect();
        entries.push(ManifestEntry {
            path: last.clone(),
            duration: None,
        });

        Ok(Self { entries })
    }

    /// Build the merge list for already encoded clips, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `clips` is empty.
    pub fn for_clips(clips: &[PathBuf]) -> Result<Self> {
        if clips.is_empty() {
            return Err(Error::invalid_input("no clips to merge"));
        }
        Ok(Self {
            entries: clips
                .iter()
                .map(|path| ManifestEntry {
                    path: path.clone(),
                    duration: None,
                })
                .collect(),
        })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the manifest in ffconcat text form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "file '{}'", escape_path(&entry.path));
            if let Some(duration) = entry.duration {
                let _ = writeln!(out, "duration {duration}");
            }
        }
        out
    }

    /// Render and write the manifest, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Wrote {} manifest entries to {:?}", self.entries.len(), path);

        Ok(())
    }
}

/// Quote a path for a `file '...'` line.
///
/// Backslashes become forward slashes and each single quote is closed, escaped
/// and reopened (`'\''`).
fn escape_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('\'', r"'\''")
}
