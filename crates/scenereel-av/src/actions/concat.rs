//! Concatenation of scene clips into the final video.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::EncodeSettings;
use crate::command::ToolCommand;
use crate::manifest::ConcatManifest;
use crate::workspace::Workspace;
use crate::{Error, Result};

/// Build the ffmpeg arguments that re-encode a concat list into `output`.
pub fn concat_args(list: &Path, output: &Path, settings: &EncodeSettings) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list.to_string_lossy().into_owned(),
    ];
    args.extend(settings.codec_args());
    args.extend([
        "-pix_fmt".to_string(),
        settings.pixel_format.clone(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

/// Merge `clips`, in the given order, into `destination`.
///
/// The clip list is written to `list_path`. ffmpeg writes into a temporary
/// [`Workspace`] next to `destination`, and the result is moved into place only
/// once ffmpeg has succeeded, so a failed merge leaves no partial video behind.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an empty clip list,
/// [`Error::FileNotFound`] for a missing clip, and any tool or workspace error.
pub async fn concat_clips(
    ffmpeg: &Path,
    clips: &[PathBuf],
    list_path: &Path,
    destination: &Path,
    settings: &EncodeSettings,
    timeout: Duration,
) -> Result<PathBuf> {
    let manifest = ConcatManifest::for_clips(clips)?;
    if let Some(missing) = clips.iter().find(|clip| !clip.is_file()) {
        return Err(Error::file_not_found(missing));
    }
    manifest.write_to(list_path)?;

    let workspace = Workspace::new(destination)?;

    #[cfg(feature = "tracing")]
    tracing::info!("Merging {} clips -> {:?}", clips.len(), destination);

    ToolCommand::new(ffmpeg.to_path_buf())
        .args(concat_args(list_path, workspace.output(), settings))
        .timeout(timeout)
        .execute()
        .await?;

    workspace.finalize()
}
