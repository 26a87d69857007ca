use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scenereel")]
#[command(author, version, about = "Assemble narrated scene videos from images and audio")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode every scene and merge the clips into the final video
    Run {
        /// Scene list: a JSON file or a directory of scene<N>.txt files;
        /// defaults to paths.scene_list from the config
        scene_list: Option<PathBuf>,

        /// Directory for manifests, clips and the final video
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seconds each image stays on screen
        #[arg(long)]
        image_duration: Option<f64>,

        /// Maximum number of scenes encoded at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Show what would be done without encoding
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the duration of an audio file
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
