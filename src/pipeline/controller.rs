//! Scene assembly controller.
//!
//! Each scene runs as its own task: resolve assets, probe the narration,
//! write the manifest, encode the clip. Scenes fail independently. Once every
//! task has finished, the surviving clips are merged in scene-number order.

use scenereel_av::{ConcatManifest, SceneEncode};
use scenereel_common::paths::{scene_clip_name, scene_manifest_name};
use scenereel_common::{SceneClip, SceneList, SceneRecord, SceneTiming};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::assets::{resolve_scene, AssetDirs};
use super::merge::{merge_clips, FinalVideo};
use super::{PipelineError, SceneError, SkippedScene};
use crate::config::Config;
use crate::service::{EncodeJob, MediaService};

/// Inputs of a run that do not come from the scene list.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerOptions {
    pub images_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub output_dir: PathBuf,
    pub image_duration_secs: f64,
    /// Upper bound on scenes processed at once.
    pub max_parallel_scenes: usize,
}

impl AssemblerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            images_dir: config.paths.images_dir.clone(),
            audio_dir: config.paths.audio_dir.clone(),
            output_dir: config.paths.output_dir.clone(),
            image_duration_secs: config.timing.image_duration_secs,
            max_parallel_scenes: config.pipeline.parallelism(),
        }
    }

    fn asset_dirs(&self) -> AssetDirs {
        AssetDirs {
            images_dir: self.images_dir.clone(),
            audio_dir: self.audio_dir.clone(),
        }
    }
}

/// Progress of a run, reported once per finished scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneProgress {
    pub done: usize,
    pub total: usize,
    pub scene: u32,
    pub included: bool,
}

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(&SceneProgress) + Send + Sync>;

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub attempted: usize,
    /// Clips merged into the final video, in scene-number order.
    pub clips: Vec<SceneClip>,
    pub skipped: Vec<SkippedScene>,
    pub final_video: FinalVideo,
}

impl RunReport {
    pub fn included(&self) -> usize {
        self.clips.len()
    }
}

/// What a run would do for one scene.
#[derive(Debug, Clone, Serialize)]
pub struct ScenePlan {
    pub number: u32,
    pub description: Option<String>,
    pub images: Vec<PathBuf>,
    pub audio: PathBuf,
    pub timing: SceneTiming,
}

/// Result of a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub scenes: Vec<ScenePlan>,
    pub skipped: Vec<SkippedScene>,
}

/// Everything a scene task needs besides its record.
struct SceneContext {
    dirs: AssetDirs,
    output_dir: PathBuf,
    image_duration_secs: f64,
}

/// Drives a scene list through the [`MediaService`] and merges the result.
pub struct SceneAssembler {
    service: Arc<dyn MediaService>,
    options: AssemblerOptions,
    progress_callback: Option<ProgressCallback>,
}

impl SceneAssembler {
    pub fn new(service: Arc<dyn MediaService>, options: AssemblerOptions) -> Self {
        Self {
            service,
            options,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    fn report_progress(&self, progress: SceneProgress) {
        if let Some(ref cb) = self.progress_callback {
            cb(&progress);
        }
    }

    fn validate_options(&self) -> Result<(), PipelineError> {
        let secs = self.options.image_duration_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(PipelineError::Validation(format!(
                "image duration must be positive, got {secs}"
            )));
        }
        Ok(())
    }

    /// Create the output directory and return its absolute path.
    fn prepare_output_dir(&self) -> Result<PathBuf, PipelineError> {
        let dir = &self.options.output_dir;
        let to_err = |source: std::io::Error| PipelineError::OutputDir {
            path: dir.clone(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(to_err)?;
        std::path::absolute(dir).map_err(to_err)
    }

    /// Assemble every scene and merge the clips into the final video.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Validation`] for unusable options, before any scene runs.
    /// - [`PipelineError::NoClips`] if every scene was skipped; the merge is
    ///   not attempted.
    /// - [`PipelineError::Merge`] if the final concatenation fails.
    pub async fn run(&self, list: &SceneList) -> Result<RunReport, PipelineError> {
        self.validate_options()?;
        let output_dir = self.prepare_output_dir()?;

        let records = list.sorted_by_number();
        let total = records.len();
        let parallel = self.options.max_parallel_scenes.max(1);
        tracing::info!(
            "Assembling {} scenes into {:?} ({} at a time)",
            total,
            output_dir,
            parallel
        );

        let context = Arc::new(SceneContext {
            dirs: self.options.asset_dirs(),
            output_dir: output_dir.clone(),
            image_duration_secs: self.options.image_duration_secs,
        });
        let semaphore = Arc::new(Semaphore::new(parallel));
        let mut tasks = JoinSet::new();

        for record in &records {
            let record = (*record).clone();
            let service = Arc::clone(&self.service);
            let context = Arc::clone(&context);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let number = record.scene_number;
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => assemble_scene(service.as_ref(), &context, &record).await,
                    Err(e) => Err(SceneError::Aborted(e.to_string())),
                };
                (number, result)
            });
        }

        let mut clips: BTreeMap<u32, SceneClip> = BTreeMap::new();
        let mut skipped: BTreeMap<u32, SkippedScene> = BTreeMap::new();
        let mut done = 0;

        while let Some(joined) = tasks.join_next().await {
            done += 1;
            match joined {
                Ok((number, Ok(clip))) => {
                    tracing::info!("[{}/{}] scene {}: clip ready", done, total, number);
                    clips.insert(number, clip);
                    self.report_progress(SceneProgress {
                        done,
                        total,
                        scene: number,
                        included: true,
                    });
                }
                Ok((number, Err(err))) => {
                    tracing::warn!("[{}/{}] scene {} skipped: {}", done, total, number, err);
                    skipped.insert(number, SkippedScene::new(number, &err));
                    self.report_progress(SceneProgress {
                        done,
                        total,
                        scene: number,
                        included: false,
                    });
                }
                Err(e) => {
                    tracing::error!("[{}/{}] scene task failed: {}", done, total, e);
                }
            }
        }

        // A panicked task never reports its scene number.
        for record in &records {
            let number = record.scene_number;
            if !clips.contains_key(&number) && !skipped.contains_key(&number) {
                let err = SceneError::Aborted("task panicked".to_string());
                skipped.insert(number, SkippedScene::new(number, &err));
            }
        }

        let skipped: Vec<SkippedScene> = skipped.into_values().collect();
        if clips.is_empty() {
            tracing::error!("All {} scenes were skipped; nothing to merge", total);
            return Err(PipelineError::NoClips { skipped });
        }

        let clips: Vec<SceneClip> = clips.into_values().collect();
        let final_video = merge_clips(self.service.as_ref(), &clips, &output_dir).await?;

        tracing::info!(
            "Included {} of {} scenes in {:?}",
            clips.len(),
            total,
            final_video.path
        );
        if !skipped.is_empty() {
            let numbers: Vec<u32> = skipped.iter().map(|s| s.number).collect();
            tracing::warn!("Skipped scenes: {:?}", numbers);
        }

        Ok(RunReport {
            attempted: total,
            clips,
            skipped,
            final_video,
        })
    }

    /// Resolve and probe every scene without writing or encoding anything.
    pub async fn plan(&self, list: &SceneList) -> Result<PlanReport, PipelineError> {
        self.validate_options()?;
        let dirs = self.options.asset_dirs();

        let mut scenes = Vec::new();
        let mut skipped = Vec::new();
        for record in list.sorted_by_number() {
            match self.plan_scene(record, &dirs).await {
                Ok(plan) => scenes.push(plan),
                Err(err) => {
                    tracing::warn!("Scene {} would be skipped: {}", record.scene_number, err);
                    skipped.push(SkippedScene::new(record.scene_number, &err));
                }
            }
        }

        Ok(PlanReport { scenes, skipped })
    }

    async fn plan_scene(
        &self,
        record: &SceneRecord,
        dirs: &AssetDirs,
    ) -> Result<ScenePlan, SceneError> {
        let scene = resolve_scene(record, dirs)?;
        let audio_secs = self
            .service
            .probe(scene.audio())
            .await
            .map_err(SceneError::Probe)?;
        let timing = SceneTiming::compute(
            scene.images().len(),
            self.options.image_duration_secs,
            audio_secs,
        )?;

        Ok(ScenePlan {
            number: scene.number(),
            description: record.description.clone(),
            images: scene.images().to_vec(),
            audio: scene.audio().to_path_buf(),
            timing,
        })
    }
}

/// Run one scene from asset lookup to encoded clip.
async fn assemble_scene(
    service: &dyn MediaService,
    context: &SceneContext,
    record: &SceneRecord,
) -> Result<SceneClip, SceneError> {
    let number = record.scene_number;
    if let Some(description) = &record.description {
        tracing::debug!("Scene {}: {}", number, description);
    }

    let scene = resolve_scene(record, &context.dirs)?;

    let audio_secs = service
        .probe(scene.audio())
        .await
        .map_err(SceneError::Probe)?;

    let manifest = ConcatManifest::for_images(scene.images(), context.image_duration_secs)
        .map_err(SceneError::Manifest)?;
    let manifest_path = context.output_dir.join(scene_manifest_name(number));
    manifest
        .write_to(&manifest_path)
        .map_err(SceneError::Manifest)?;

    let timing = SceneTiming::compute(
        scene.images().len(),
        context.image_duration_secs,
        audio_secs,
    )?;
    tracing::debug!(
        "Scene {}: {} images, {:.2}s of images, {:.2}s narration x{}",
        number,
        timing.image_count,
        timing.total_image_secs,
        timing.audio_secs,
        timing.loop_count
    );

    let job = SceneEncode {
        manifest: manifest_path,
        audio: scene.audio().to_path_buf(),
        loop_count: timing.loop_count,
        output: clip_path(&context.output_dir, number),
    };
    let path = service
        .encode(EncodeJob::Scene(job))
        .await
        .map_err(SceneError::Encode)?;

    Ok(SceneClip { number, path })
}

fn clip_path(output_dir: &Path, number: u32) -> PathBuf {
    output_dir.join(scene_clip_name(number))
}
