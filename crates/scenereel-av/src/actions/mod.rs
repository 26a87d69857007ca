//! Encoding actions.
//!
//! - Scene encoding: image manifest plus looped narration into one clip
//! - Clip concatenation: ordered clips into the final video

mod concat;
mod encode_scene;
mod settings;

pub use concat::{concat_args, concat_clips};
pub use encode_scene::{encode_scene, scene_encode_args, SceneEncode};
pub use settings::EncodeSettings;
