//! Staging area for outputs that must appear atomically.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory next to a destination file.
///
/// The tool writes to [`Workspace::output`]; [`Workspace::finalize`] then
/// renames that file over the destination. Being in the same directory keeps
/// the rename on one filesystem. Dropping the workspace without finalizing
/// removes everything it staged.
///
/// # Example
///
/// ```no_run
/// use scenereel_av::Workspace;
///
/// let workspace = Workspace::new("/outputs/final_video.mp4")?;
/// // Run the tool with workspace.output() as its output path, then:
/// workspace.finalize()?;
/// # Ok::<(), scenereel_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    _temp_dir: TempDir,
    destination: PathBuf,
    output_path: PathBuf,
}

impl Workspace {
    /// Create a workspace for producing `destination`.
    ///
    /// The parent directory of `destination` must exist.
    pub fn new<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref();

        let file_name = destination
            .file_name()
            .ok_or_else(|| Error::invalid_input("invalid destination file path"))?;
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let temp_dir = tempfile::Builder::new()
            .prefix(".scenereel-")
            .tempdir_in(parent)
            .map_err(|e| Error::Workspace(format!("cannot create temp dir in {parent:?}: {e}")))?;
        let output_path = temp_dir.path().join(file_name);

        Ok(Self {
            _temp_dir: temp_dir,
            destination: destination.to_path_buf(),
            output_path,
        })
    }

    /// Path the tool should write to.
    pub fn output(&self) -> &Path {
        &self.output_path
    }

    /// Move the staged output over the destination.
    ///
    /// An existing destination is first moved aside and restored if the final
    /// rename fails.
    pub fn finalize(self) -> Result<PathBuf> {
        let dest = self.destination.as_path();

        if !self.output_path.is_file() {
            return Err(Error::Workspace(format!(
                "output file does not exist: {:?}",
                self.output_path
            )));
        }

        if dest.exists() {
            let backup = dest.with_extension("bak");
            std::fs::rename(dest, &backup).map_err(|e| {
                Error::Workspace(format!("failed to move previous output aside: {e}"))
            })?;

            if let Err(e) = std::fs::rename(&self.output_path, dest) {
                let _ = std::fs::rename(&backup, dest);
                return Err(Error::Workspace(format!(
                    "failed to move output to destination: {e}"
                )));
            }

            let _ = std::fs::remove_file(&backup);
        } else {
            std::fs::rename(&self.output_path, dest).map_err(|e| {
                Error::Workspace(format!("failed to move output to destination: {e}"))
            })?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Finalized {:?}", dest);

        Ok(self.destination.clone())
    }
}
