//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the two external
//! CLI tools the pipeline drives (ffmpeg and ffprobe) and provides lookup
//! methods for the rest of the crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Custom tool locations, usually taken from the `[tools]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOverrides {
    /// Path to the ffmpeg binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
    /// Path to the ffprobe binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<PathBuf>,
}

impl ToolOverrides {
    fn get(&self, name: &str) -> Option<&Path> {
        match name {
            "ffmpeg" => self.ffmpeg_path.as_deref(),
            "ffprobe" => self.ffprobe_path.as_deref(),
            _ => None,
        }
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool paths.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each known tool, a custom path is used directly if it exists.
    /// Otherwise [`which::which`] locates the tool in `PATH`. Tools that are
    /// not found are omitted from the registry.
    pub fn discover(overrides: &ToolOverrides) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let resolved = match overrides.get(name) {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(_p) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Configured {} path {:?} does not exist; searching PATH",
                        name,
                        _p
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(name.to_string(), path);
            }
        }

        Self { tools }
    }

    /// Return the path of the given tool, or [`Error::ToolNotFound`] if it was
    /// not found during discovery.
    pub fn require(&self, name: &str) -> Result<&Path> {
        self.tools
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::tool_not_found(name))
    }

    /// Path to ffmpeg.
    pub fn ffmpeg(&self) -> Result<&Path> {
        self.require("ffmpeg")
    }

    /// Path to ffprobe.
    pub fn ffprobe(&self) -> Result<&Path> {
        self.require("ffprobe")
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(path) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(path),
                    path: Some(path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
