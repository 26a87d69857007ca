//! Boundary to the external media tools.
//!
//! The pipeline only ever asks two things of the outside world: how long is
//! this audio file, and please encode this job. [`MediaService`] captures
//! exactly that, so the controller can be driven by ffmpeg in production and
//! by in-memory fakes in tests.

use async_trait::async_trait;
use scenereel_av::probe::probe_duration;
use scenereel_av::{concat_clips, encode_scene, EncodeSettings, SceneEncode, ToolRegistry};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;

/// Concatenate clips, in order, into one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatJob {
    pub clips: Vec<PathBuf>,
    /// Where the clip list is written.
    pub list: PathBuf,
    pub output: PathBuf,
}

/// Work handed to [`MediaService::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeJob {
    /// One scene: image manifest plus looped narration.
    Scene(SceneEncode),
    /// The final merge.
    Concat(ConcatJob),
}

/// Probing and encoding backend.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Duration of a media file in seconds, finite and positive.
    async fn probe(&self, asset: &Path) -> scenereel_av::Result<f64>;

    /// Run an encode job and return the path of the written file.
    async fn encode(&self, job: EncodeJob) -> scenereel_av::Result<PathBuf>;
}

/// [`MediaService`] backed by the ffmpeg and ffprobe command line tools.
#[derive(Debug, Clone)]
pub struct FfmpegService {
    tools: ToolRegistry,
    settings: EncodeSettings,
    probe_timeout: Duration,
    encode_timeout: Duration,
}

impl FfmpegService {
    pub fn new(
        tools: ToolRegistry,
        settings: EncodeSettings,
        probe_timeout: Duration,
        encode_timeout: Duration,
    ) -> Self {
        Self {
            tools,
            settings,
            probe_timeout,
            encode_timeout,
        }
    }

    /// Discover the tools and take encode settings and timeouts from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ToolRegistry::discover(&config.tools.overrides()),
            config.encode.clone(),
            config.tools.probe_timeout(),
            config.tools.encode_timeout(),
        )
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

#[async_trait]
impl MediaService for FfmpegService {
    async fn probe(&self, asset: &Path) -> scenereel_av::Result<f64> {
        probe_duration(self.tools.ffprobe()?, asset, self.probe_timeout).await
    }

    async fn encode(&self, job: EncodeJob) -> scenereel_av::Result<PathBuf> {
        let ffmpeg = self.tools.ffmpeg()?;
        match job {
            EncodeJob::Scene(scene) => {
                encode_scene(ffmpeg, &scene, &self.settings, self.encode_timeout).await
            }
            EncodeJob::Concat(concat) => {
                concat_clips(
                    ffmpeg,
                    &concat.clips,
                    &concat.list,
                    &concat.output,
                    &self.settings,
                    self.encode_timeout,
                )
                .await
            }
        }
    }
}
