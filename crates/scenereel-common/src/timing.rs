//! Per-scene timing.
//!
//! Every image of a scene is shown for the same duration. The narration is
//! looped a whole number of times so that it covers the image sequence; the
//! encoder then cuts the clip at whichever input ends first.

use crate::{Error, Result};
use serde::Serialize;

/// Timing derived for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneTiming {
    /// Number of images in the scene.
    pub image_count: usize,
    /// Display time of each image in seconds.
    pub per_image_secs: f64,
    /// `image_count × per_image_secs`.
    pub total_image_secs: f64,
    /// Probed narration length in seconds.
    pub audio_secs: f64,
    /// Number of times the narration is played, always at least 1.
    pub loop_count: u32,
}

impl SceneTiming {
    /// Derive the timing of a scene.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if there are no images or if either
    /// duration is not a finite positive number.
    pub fn compute(image_count: usize, per_image_secs: f64, audio_secs: f64) -> Result<Self> {
        if image_count == 0 {
            return Err(Error::invalid_input("scene timing needs at least one image"));
        }
        if !per_image_secs.is_finite() || per_image_secs <= 0.0 {
            return Err(Error::invalid_input(format!(
                "image duration must be positive, got {per_image_secs}"
            )));
        }
        if !audio_secs.is_finite() || audio_secs <= 0.0 {
            return Err(Error::invalid_input(format!(
                "audio duration must be positive, got {audio_secs}"
            )));
        }

        let total_image_secs = image_count as f64 * per_image_secs;
        Ok(Self {
            image_count,
            per_image_secs,
            total_image_secs,
            audio_secs,
            loop_count: loop_count(total_image_secs, audio_secs),
        })
    }

    /// Total length of the looped narration.
    pub fn looped_audio_secs(&self) -> f64 {
        self.audio_secs * f64::from(self.loop_count)
    }

    /// Expected clip length: the shorter of looped narration and images.
    pub fn expected_clip_secs(&self) -> f64 {
        self.total_image_secs.min(self.looped_audio_secs())
    }
}

/// Number of narration repetitions needed to cover `total_image_secs`.
///
/// Computed once with ceiling division and clamped to at least 1, so a
/// narration longer than the images still plays exactly once. Non-positive or
/// non-finite audio durations also yield 1; callers validate those earlier.
///
/// # Examples
///
/// ```
/// use scenereel_common::loop_count;
///
/// assert_eq!(loop_count(10.0, 4.0), 3);
/// assert_eq!(loop_count(6.0, 30.0), 1);
/// ```
pub fn loop_count(total_image_secs: f64, audio_secs: f64) -> u32 {
    if !audio_secs.is_finite() || audio_secs <= 0.0 {
        return 1;
    }
    // Float to int `as` casts saturate, so absurd ratios clamp to u32::MAX.
    let loops = (total_image_secs / audio_secs).ceil();
    (loops as u32).max(1)
}
