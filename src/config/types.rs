use scenereel_av::{EncodeSettings, ToolOverrides};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    /// Output format of scene clips and the final video.
    #[serde(default)]
    pub encode: EncodeSettings,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory holding `scene<N>_*` images
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Directory holding `s<N>.mp3` narration tracks
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Directory receiving manifests, scene clips and the final video
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Scene list used when none is given on the command line
    #[serde(default = "default_scene_list")]
    pub scene_list: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            audio_dir: default_audio_dir(),
            output_dir: default_output_dir(),
            scene_list: default_scene_list(),
        }
    }
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("./images")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./audio")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./outputs")
}

fn default_scene_list() -> PathBuf {
    PathBuf::from("./scene_script.json")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Seconds each image stays on screen
    #[serde(default = "default_image_duration")]
    pub image_duration_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            image_duration_secs: default_image_duration(),
        }
    }
}

fn default_image_duration() -> f64 {
    2.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Scenes encoded at the same time; 0 means one per CPU
    #[serde(default)]
    pub max_parallel_scenes: usize,
}

impl PipelineConfig {
    /// Effective concurrency limit, never below 1.
    pub fn parallelism(&self) -> usize {
        match self.max_parallel_scenes {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_encode_timeout")]
    pub encode_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            probe_timeout_secs: default_probe_timeout(),
            encode_timeout_secs: default_encode_timeout(),
        }
    }
}

impl ToolsConfig {
    pub fn overrides(&self) -> ToolOverrides {
        ToolOverrides {
            ffmpeg_path: self.ffmpeg_path.clone(),
            ffprobe_path: self.ffprobe_path.clone(),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Applies to scene encodes and to the merge.
    pub fn encode_timeout(&self) -> Duration {
        Duration::from_secs(self.encode_timeout_secs)
    }
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_encode_timeout() -> u64 {
    1800
}
