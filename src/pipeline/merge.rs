//! Final merge of scene clips.

use scenereel_common::paths::{FINAL_VIDEO_NAME, MERGE_LIST_NAME};
use scenereel_common::SceneClip;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::PipelineError;
use crate::service::{ConcatJob, EncodeJob, MediaService};

/// The merged video and the scenes it contains, in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalVideo {
    pub path: PathBuf,
    pub scenes: Vec<u32>,
}

/// Concatenate `clips`, in the order given, into `<output_dir>/final_video.mp4`.
///
/// The caller supplies the clips already ordered by scene number. An empty
/// list is rejected without invoking the encoder. Failures are not retried.
pub async fn merge_clips(
    service: &dyn MediaService,
    clips: &[SceneClip],
    output_dir: &Path,
) -> Result<FinalVideo, PipelineError> {
    if clips.is_empty() {
        return Err(PipelineError::Merge(scenereel_av::Error::invalid_input(
            "no clips to merge",
        )));
    }

    let job = ConcatJob {
        clips: clips.iter().map(|c| c.path.clone()).collect(),
        list: output_dir.join(MERGE_LIST_NAME),
        output: output_dir.join(FINAL_VIDEO_NAME),
    };

    tracing::info!("Merging {} scene clips into {:?}", clips.len(), job.output);
    let path = service
        .encode(EncodeJob::Concat(job))
        .await
        .map_err(PipelineError::Merge)?;

    Ok(FinalVideo {
        path,
        scenes: clips.iter().map(|c| c.number).collect(),
    })
}
