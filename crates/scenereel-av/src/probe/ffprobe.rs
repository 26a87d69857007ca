//! FFprobe-based duration probing.

use crate::command::ToolCommand;
use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Probe the playable duration of a media file, in seconds.
///
/// Runs `ffprobe -v error -show_entries format=duration -of
/// default=noprint_wrappers=1:nokey=1 <file>` and parses the single value it
/// prints.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if `path` does not exist.
/// - [`Error::ToolNotFound`], [`Error::ToolFailed`] or [`Error::Timeout`] if
///   ffprobe cannot run to completion.
/// - [`Error::ParseError`] if the output is not a finite positive number.
pub async fn probe_duration(ffprobe: &Path, path: &Path, timeout: Duration) -> Result<f64> {
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }

    let output = ToolCommand::new(ffprobe.to_path_buf())
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .path_arg(path)
        .timeout(timeout)
        .execute()
        .await?;

    let duration = parse_duration(&output.stdout)?;

    #[cfg(feature = "tracing")]
    tracing::debug!("Probed {:?}: {:.3}s", path, duration);

    Ok(duration)
}

/// Parse the `format=duration` value printed by ffprobe.
///
/// ffprobe prints `N/A` for streams without a known duration; that, an empty
/// output, and anything that is not a finite positive number are rejected.
///
/// # Examples
///
/// ```
/// use scenereel_av::probe::parse_duration;
///
/// assert_eq!(parse_duration("12.480000\n").unwrap(), 12.48);
/// assert!(parse_duration("N/A").is_err());
/// ```
pub fn parse_duration(stdout: &str) -> Result<f64> {
    let value = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| Error::parse_error("ffprobe", "empty duration output"))?;

    let duration: f64 = value
        .parse()
        .map_err(|_| Error::parse_error("ffprobe", format!("not a number: {value:?}")))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::parse_error(
            "ffprobe",
            format!("duration must be positive, got {value}"),
        ));
    }

    Ok(duration)
}
