//! Shared test harness for integration tests.
//!
//! Provides [`FakeMedia`], an in-memory [`MediaService`] that records every
//! call, and [`Fixture`], a temporary project with images, audio and output
//! directories laid out the way a run expects.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scenereel::pipeline::{AssemblerOptions, SceneAssembler};
use scenereel::service::{ConcatJob, EncodeJob, MediaService};
use scenereel_av::{ConcatManifest, SceneEncode};
use tempfile::TempDir;
use tokio::sync::Notify;

/// Scene number encoded in a `scene<N>_final.mp4` clip path.
pub fn scene_number_of(path: &Path) -> u32 {
    let name = path.file_name().unwrap().to_string_lossy();
    name.strip_prefix("scene")
        .and_then(|rest| rest.split('_').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("not a scene clip: {name}"))
}

/// Makes one scene's encode wait until another scene's encode has finished.
pub struct Gate {
    pub waiter: u32,
    pub signaller: u32,
    pub notify: Notify,
}

/// In-memory media backend.
#[derive(Default)]
pub struct FakeMedia {
    /// Narration durations by file name; unknown files fail to probe.
    pub durations: HashMap<String, f64>,
    /// Scenes whose encode fails.
    pub failing_encodes: HashSet<u32>,
    pub fail_merge: bool,
    pub encode_delay: Option<Duration>,
    pub gate: Option<Gate>,

    pub probes: Mutex<Vec<PathBuf>>,
    pub scene_jobs: Mutex<Vec<SceneEncode>>,
    /// Scene numbers in the order their encodes finished.
    pub completed: Mutex<Vec<u32>>,
    pub merges: Mutex<Vec<ConcatJob>>,

    pub running: AtomicUsize,
    pub max_running: AtomicUsize,
}

impl FakeMedia {
    pub fn with_durations(durations: &[(&str, f64)]) -> Self {
        Self {
            durations: durations
                .iter()
                .map(|(name, secs)| (name.to_string(), *secs))
                .collect(),
            ..Default::default()
        }
    }

    pub fn merge_count(&self) -> usize {
        self.merges.lock().unwrap().len()
    }

    pub fn completed(&self) -> Vec<u32> {
        self.completed.lock().unwrap().clone()
    }

    async fn encode_scene(&self, job: SceneEncode) -> scenereel_av::Result<PathBuf> {
        let number = scene_number_of(&job.output);
        self.scene_jobs.lock().unwrap().push(job.clone());

        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if gate.waiter == number {
                gate.notify.notified().await;
            }
        }
        if let Some(delay) = self.encode_delay {
            tokio::time::sleep(delay).await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.failing_encodes.contains(&number) {
            return Err(scenereel_av::Error::tool_failed("ffmpeg", "simulated failure"));
        }

        std::fs::write(&job.output, format!("clip {number}"))?;
        self.completed.lock().unwrap().push(number);

        if let Some(gate) = &self.gate {
            if gate.signaller == number {
                gate.notify.notify_one();
            }
        }

        Ok(job.output)
    }
}

#[async_trait]
impl MediaService for FakeMedia {
    async fn probe(&self, asset: &Path) -> scenereel_av::Result<f64> {
        self.probes.lock().unwrap().push(asset.to_path_buf());
        let name = asset.file_name().unwrap().to_string_lossy().into_owned();
        self.durations
            .get(&name)
            .copied()
            .ok_or_else(|| scenereel_av::Error::parse_error("ffprobe", "not a number: \"N/A\""))
    }

    async fn encode(&self, job: EncodeJob) -> scenereel_av::Result<PathBuf> {
        match job {
            EncodeJob::Scene(scene) => self.encode_scene(scene).await,
            EncodeJob::Concat(concat) => {
                self.merges.lock().unwrap().push(concat.clone());
                if self.fail_merge {
                    return Err(scenereel_av::Error::tool_failed("ffmpeg", "merge failed"));
                }
                ConcatManifest::for_clips(&concat.clips)?.write_to(&concat.list)?;
                std::fs::write(&concat.output, b"final")?;
                Ok(concat.output)
            }
        }
    }
}

/// A temporary project directory.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["images", "audio"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.path().join("images")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.path().join("audio")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("outputs")
    }

    /// Create `count` images named `scene<N>_<i>.png`.
    pub fn add_images(&self, scene: u32, count: usize) {
        for i in 1..=count {
            std::fs::write(self.images_dir().join(format!("scene{scene}_{i}.png")), b"png").unwrap();
        }
    }

    /// Create the default narration file `s<N>.mp3`.
    pub fn add_audio(&self, scene: u32) {
        std::fs::write(self.audio_dir().join(format!("s{scene}.mp3")), b"mp3").unwrap();
    }

    pub fn options(&self, max_parallel_scenes: usize) -> AssemblerOptions {
        AssemblerOptions {
            images_dir: self.images_dir(),
            audio_dir: self.audio_dir(),
            output_dir: self.output_dir(),
            image_duration_secs: 2.0,
            max_parallel_scenes,
        }
    }

    pub fn assembler(&self, media: Arc<FakeMedia>, max_parallel_scenes: usize) -> SceneAssembler {
        SceneAssembler::new(media, self.options(max_parallel_scenes))
    }

    /// Sorted file names in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
