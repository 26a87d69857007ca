//! Pipeline error types.
//!
//! [`SceneError`] is local to one scene: the controller logs it, records the
//! scene as skipped, and carries on. [`PipelineError`] ends the run.

use serde::Serialize;

/// Why a single scene could not produce a clip.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Images or narration could not be located.
    #[error("assets: {0}")]
    Assets(String),

    /// The narration could not be probed.
    #[error("probe failed: {0}")]
    Probe(#[source] scenereel_av::Error),

    /// The scene timing could not be derived.
    #[error("timing: {0}")]
    Timing(#[from] scenereel_common::Error),

    /// The concat manifest could not be built or written.
    #[error("manifest: {0}")]
    Manifest(#[source] scenereel_av::Error),

    /// The encoder failed or timed out.
    #[error("encode failed: {0}")]
    Encode(#[source] scenereel_av::Error),

    /// The scene task ended without reporting a result.
    #[error("scene task aborted: {0}")]
    Aborted(String),
}

impl SceneError {
    pub fn assets(msg: impl Into<String>) -> Self {
        Self::Assets(msg.into())
    }

    /// Short stage name for summaries.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Assets(_) => "assets",
            Self::Probe(_) => "probe",
            Self::Timing(_) => "timing",
            Self::Manifest(_) => "manifest",
            Self::Encode(_) => "encode",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// A scene left out of the final video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedScene {
    pub number: u32,
    pub stage: &'static str,
    pub reason: String,
}

impl SkippedScene {
    pub fn new(number: u32, error: &SceneError) -> Self {
        Self {
            number,
            stage: error.stage(),
            reason: error.to_string(),
        }
    }
}

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The scene list or the run setup is unusable.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Every scene was skipped; nothing to merge.
    #[error("no scene produced a clip ({} attempted)", skipped.len())]
    NoClips { skipped: Vec<SkippedScene> },

    /// The final concatenation failed.
    #[error("merge failed: {0}")]
    Merge(#[source] scenereel_av::Error),

    /// The output directory could not be prepared.
    #[error("output directory {path:?}: {source}")]
    OutputDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<scenereel_common::Error> for PipelineError {
    fn from(err: scenereel_common::Error) -> Self {
        Self::Validation(err.to_string())
    }
}
