//! Output encoding target.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Target format shared by scene clips and the final video.
///
/// Defaults to 1280×720 H.264 (`slow`, CRF 18) with 192 kbit/s AAC in
/// `yuv420p`, which plays everywhere an MP4 does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub width: u32,
    pub height: u32,
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub pixel_format: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            video_codec: "libx264".to_string(),
            preset: "slow".to_string(),
            crf: 18,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            pixel_format: "yuv420p".to_string(),
        }
    }
}

impl EncodeSettings {
    /// Letterbox filter: fit inside the frame keeping aspect ratio, pad the
    /// rest and force square pixels.
    pub fn video_filter(&self) -> String {
        let (w, h) = (self.width, self.height);
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1"
        )
    }

    /// Codec arguments common to scene encoding and merging.
    pub fn codec_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
        ]
    }

    /// Check the settings can be handed to ffmpeg.
    ///
    /// yuv420p subsamples chroma by two in both directions, so both frame
    /// dimensions must be even.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_input(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(Error::invalid_input(format!(
                "frame size must be even, got {}x{}",
                self.width, self.height
            )));
        }
        if self.crf > 51 {
            return Err(Error::invalid_input(format!(
                "crf must be between 0 and 51, got {}",
                self.crf
            )));
        }
        for (name, value) in [
            ("video_codec", &self.video_codec),
            ("preset", &self.preset),
            ("audio_codec", &self.audio_codec),
            ("audio_bitrate", &self.audio_bitrate),
            ("pixel_format", &self.pixel_format),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_input(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            EncodeSettings::default().video_filter(),
            "scale=1280:720:force_original_aspect_ratio=decrease,pad=1280:720:(ow-iw)/2:(oh-ih)/2,setsar=1"
        );
    }

    #[test]
    fn test_codec_args() {
        assert_eq!(
            EncodeSettings::default().codec_args(),
            vec!["-c:v", "libx264", "-preset", "slow", "-crf", "18", "-c:a", "aac", "-b:a", "192k"]
        );
    }

    #[test]
    fn test_validate() {
        assert!(EncodeSettings::default().validate().is_ok());

        let odd = EncodeSettings {
            width: 1279,
            ..Default::default()
        };
        assert!(odd.validate().is_err());

        let zero = EncodeSettings {
            height: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let blank = EncodeSettings {
            preset: " ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let settings: EncodeSettings =
            serde_json::from_str(r#"{"width": 1920, "height": 1080}"#).unwrap();
        assert_eq!(settings.width, 1920);
        assert_eq!(settings.crf, 18);
        assert_eq!(settings.video_codec, "libx264");
    }
}
