//! Scenereel-Common: scene model, timing, and asset naming conventions.
//!
//! This crate provides the pieces of the assembly pipeline that do not touch
//! any external tool:
//!
//! - **Scene list**: parsing and validating the externally produced scene list
//! - **Scenes**: resolved scenes with their ordered images and narration track
//! - **Timing**: per-scene image duration and audio loop count
//! - **Path Utilities**: asset naming conventions and extension checks
//!
//! # Examples
//!
//! ```
//! use scenereel_common::{SceneList, SceneTiming};
//!
//! let list = SceneList::from_json(r#"[{"scene_number": 1}, {"scene_number": 2}]"#)?;
//! assert_eq!(list.len(), 2);
//!
//! // Five images at two seconds each against a four second narration.
//! let timing = SceneTiming::compute(5, 2.0, 4.0)?;
//! assert_eq!(timing.loop_count, 3);
//! # Ok::<(), scenereel_common::Error>(())
//! ```

pub mod error;
pub mod paths;
pub mod scene;
pub mod timing;

pub use error::{Error, Result};
pub use scene::{Scene, SceneClip, SceneList, SceneRecord};
pub use timing::{loop_count, SceneTiming};
