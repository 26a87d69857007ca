//! Duration probing.
//!
//! Only the container duration is needed to time a scene, so the probe asks
//! ffprobe for `format=duration` and nothing else.

mod ffprobe;

pub use ffprobe::{parse_duration, probe_duration};
