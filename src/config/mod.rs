mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./scenereel.toml",
        "./config.toml",
        "~/.config/scenereel/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    config
        .encode
        .validate()
        .context("Invalid [encode] section")?;

    let image_duration = config.timing.image_duration_secs;
    if !image_duration.is_finite() || image_duration <= 0.0 {
        anyhow::bail!(
            "timing.image_duration_secs must be positive, got {}",
            image_duration
        );
    }

    if config.tools.probe_timeout_secs == 0 {
        anyhow::bail!("tools.probe_timeout_secs cannot be 0");
    }
    if config.tools.encode_timeout_secs == 0 {
        anyhow::bail!("tools.encode_timeout_secs cannot be 0");
    }

    // Missing asset directories only affect the scenes that need them
    for (name, path) in [
        ("images_dir", &config.paths.images_dir),
        ("audio_dir", &config.paths.audio_dir),
    ] {
        if !path.is_dir() {
            tracing::warn!("paths.{} does not exist: {:?}", name, path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.paths.output_dir, PathBuf::from("./outputs"));
        assert_eq!(config.timing.image_duration_secs, 2.0);
        assert_eq!(config.encode.width, 1280);
        assert_eq!(config.encode.height, 720);
        assert_eq!(config.tools.probe_timeout_secs, 30);
        assert_eq!(config.tools.encode_timeout_secs, 1800);
        assert!(config.pipeline.parallelism() >= 1);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            images_dir = "/data/images"

            [timing]
            image_duration_secs = 3.5

            [encode]
            crf = 20

            [pipeline]
            max_parallel_scenes = 3

            [tools]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.images_dir, PathBuf::from("/data/images"));
        assert_eq!(config.paths.audio_dir, PathBuf::from("./audio"));
        assert_eq!(config.timing.image_duration_secs, 3.5);
        assert_eq!(config.encode.crf, 20);
        assert_eq!(config.encode.preset, "slow");
        assert_eq!(config.pipeline.parallelism(), 3);
        assert_eq!(
            config.tools.overrides().ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.tools.probe_timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.timing.image_duration_secs = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.encode.width = 1281;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.tools.encode_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn validate_accepts_missing_asset_dirs() {
        let mut config = Config::default();
        config.paths.images_dir = PathBuf::from("/nonexistent/images");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn load_config_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenereel.toml");

        std::fs::write(&path, "[timing]\nimage_duration_secs = 1.5\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.timing.image_duration_secs, 1.5);

        std::fs::write(&path, "[timing]\nimage_duration_secs = -1.0\n").unwrap();
        assert!(load_config(&path).is_err());

        std::fs::write(&path, "[timing\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(load_config_or_default(Some(Path::new("/nonexistent/scenereel.toml"))).is_err());
    }
}
