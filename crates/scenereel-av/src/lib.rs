//! # scenereel-av
//!
//! ffmpeg and ffprobe plumbing for narrated scene videos.
//!
//! This crate provides functionality for:
//! - Probing the duration of narration tracks
//! - Writing ffconcat manifests for image sequences and clip lists
//! - Encoding a scene clip from an image manifest and looped narration
//! - Merging clips into the final video through an atomic [`Workspace`]
//!
//! Every external invocation goes through [`ToolCommand`], which enforces a
//! wall-clock timeout and kills the child when it fires.
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use scenereel_av::{probe::probe_duration, ToolOverrides, ToolRegistry};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn example() -> scenereel_av::Result<()> {
//! let tools = ToolRegistry::discover(&ToolOverrides::default());
//! let secs = probe_duration(tools.ffprobe()?, Path::new("audio/s1.mp3"), Duration::from_secs(30)).await?;
//! println!("narration: {secs:.2}s");
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod command;
mod error;
pub mod manifest;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::{concat_clips, encode_scene, EncodeSettings, SceneEncode};
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use manifest::{ConcatManifest, ManifestEntry};
pub use tools::{ToolInfo, ToolOverrides, ToolRegistry};
pub use workspace::Workspace;
