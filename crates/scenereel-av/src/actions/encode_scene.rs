//! Scene clip encoding.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::EncodeSettings;
use crate::command::ToolCommand;
use crate::workspace::Workspace;
use crate::{Error, Result};

/// Inputs and output of one scene encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEncode {
    /// ffconcat manifest of the scene's images.
    pub manifest: PathBuf,
    /// Narration track.
    pub audio: PathBuf,
    /// Number of times the narration is played (at least 1).
    pub loop_count: u32,
    /// Clip to write; overwritten if it exists.
    pub output: PathBuf,
}

/// Build the ffmpeg arguments for a scene encode writing to `output`.
///
/// The narration is looped with `-stream_loop (loop_count - 1)` and
/// `-shortest` ends the clip with whichever input runs out first.
pub fn scene_encode_args(
    job: &SceneEncode,
    output: &Path,
    settings: &EncodeSettings,
) -> Vec<String> {
    let extra_loops = job.loop_count.max(1) - 1;

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
        job.manifest.to_string_lossy().into_owned(),
        "-stream_loop".into(),
        extra_loops.to_string(),
        "-i".into(),
        job.audio.to_string_lossy().into_owned(),
    ];
    args.extend(settings.codec_args());
    args.extend([
        "-vf".to_string(),
        settings.video_filter(),
        "-pix_fmt".to_string(),
        settings.pixel_format.clone(),
        "-shortest".to_string(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

/// Encode one scene clip with ffmpeg.
///
/// ffmpeg writes into a [`Workspace`] next to `job.output`. The clip is moved
/// into place only after ffmpeg succeeds, so a failed or timed-out encode
/// leaves no partial clip behind.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the manifest or narration is missing,
/// any [`ToolCommand`] error if ffmpeg fails or times out, and
/// [`Error::ToolFailed`] if ffmpeg exits cleanly without producing the clip.
pub async fn encode_scene(
    ffmpeg: &Path,
    job: &SceneEncode,
    settings: &EncodeSettings,
    timeout: Duration,
) -> Result<PathBuf> {
    for input in [&job.manifest, &job.audio] {
        if !input.is_file() {
            return Err(Error::file_not_found(input));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Encoding {:?} (audio x{}) -> {:?}",
        job.manifest,
        job.loop_count,
        job.output
    );

    let workspace = Workspace::new(&job.output)?;

    ToolCommand::new(ffmpeg.to_path_buf())
        .args(scene_encode_args(job, workspace.output(), settings))
        .timeout(timeout)
        .execute()
        .await?;

    if !workspace.output().is_file() {
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("no output written to {}", job.output.display()),
        ));
    }

    workspace.finalize()
}
