pub mod assets;
pub mod controller;
mod error;
pub mod merge;

pub use controller::{
    AssemblerOptions, PlanReport, ProgressCallback, RunReport, SceneAssembler, ScenePlan,
    SceneProgress,
};
pub use error::{PipelineError, SceneError, SkippedScene};
pub use merge::{merge_clips, FinalVideo};
