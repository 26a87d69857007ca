mod cli;

use scenereel::{
    config,
    pipeline::{AssemblerOptions, PlanReport, RunReport, SceneAssembler},
    service::FfmpegService,
};
use scenereel_av::{probe::probe_duration, ToolRegistry};
use scenereel_common::SceneList;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options of the `run` subcommand.
struct RunArgs {
    scene_list: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    image_duration: Option<f64>,
    jobs: Option<usize>,
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "scenereel=trace,scenereel_av=debug,scenereel_common=debug".to_string()
        } else {
            "scenereel=info,scenereel_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scene_list,
            output_dir,
            image_duration,
            jobs,
            dry_run,
        } => {
            let args = RunArgs {
                scene_list,
                output_dir,
                image_duration,
                jobs,
                dry_run,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_scenes(args, cli.config.as_deref()))
        }
        Commands::Probe { file, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_file(&file, json, cli.config.as_deref()))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("scenereel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_scenes(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Command line flags win over the config file
    if let Some(dir) = args.output_dir {
        config.paths.output_dir = dir;
    }
    if let Some(secs) = args.image_duration {
        config.timing.image_duration_secs = secs;
    }
    if let Some(jobs) = args.jobs {
        config.pipeline.max_parallel_scenes = jobs;
    }
    config::validate_config(&config)?;

    let list_path = args.scene_list.unwrap_or_else(|| config.paths.scene_list.clone());
    let list = SceneList::load(&list_path)
        .with_context(|| format!("Failed to load scene list: {:?}", list_path))?;
    tracing::info!("Loaded {} scenes from {:?}", list.len(), list_path);

    let service = FfmpegService::from_config(&config);
    service
        .tools()
        .ffprobe()
        .context("ffprobe is required; install ffmpeg or set tools.ffprobe_path")?;
    if !args.dry_run {
        service
            .tools()
            .ffmpeg()
            .context("ffmpeg is required; install it or set tools.ffmpeg_path")?;
    }

    let assembler = SceneAssembler::new(Arc::new(service), AssemblerOptions::from_config(&config));

    if args.dry_run {
        let plan = assembler.plan(&list).await?;
        print_plan(&plan, assembler.options());
        return Ok(());
    }

    let report = assembler.run(&list).await?;
    print_report(&report);
    Ok(())
}

fn print_plan(plan: &PlanReport, options: &AssemblerOptions) {
    println!(
        "[DRY RUN] {} scenes would be encoded into {:?}",
        plan.scenes.len(),
        options.output_dir
    );
    for scene in &plan.scenes {
        let t = &scene.timing;
        print!("\nScene {}", scene.number);
        if let Some(ref description) = scene.description {
            print!(": {}", description);
        }
        println!();
        println!(
            "  Images: {} x {}s = {:.2}s",
            t.image_count, t.per_image_secs, t.total_image_secs
        );
        for image in &scene.images {
            println!("    {}", image.display());
        }
        println!(
            "  Audio: {} ({:.2}s, played {}x)",
            scene.audio.display(),
            t.audio_secs,
            t.loop_count
        );
        println!("  Clip length: {:.2}s", t.expected_clip_secs());
    }

    if !plan.skipped.is_empty() {
        println!("\nWould skip {} scenes:", plan.skipped.len());
        for skipped in &plan.skipped {
            println!("  scene {} ({}): {}", skipped.number, skipped.stage, skipped.reason);
        }
    }
}

fn print_report(report: &RunReport) {
    println!("Final video: {}", report.final_video.path.display());
    println!(
        "Included {} of {} scenes: {:?}",
        report.included(),
        report.attempted,
        report.final_video.scenes
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} scenes:", report.skipped.len());
        for skipped in &report.skipped {
            println!("  scene {} ({}): {}", skipped.number, skipped.stage, skipped.reason);
        }
    }
}

async fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools.overrides());
    let duration = probe_duration(tools.ffprobe()?, file, config.tools.probe_timeout())
        .await
        .with_context(|| format!("Failed to probe {:?}", file))?;

    if json {
        let value = serde_json::json!({
            "file": file,
            "duration_secs": duration,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("File: {}", file.display());
        let total = duration.round() as u64;
        println!(
            "Duration: {:.3}s ({:02}:{:02}:{:02})",
            duration,
            total / 3600,
            (total / 60) % 60,
            total % 60
        );
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools.overrides()).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg (which ships ffprobe) to render videos.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Images: {}", config.paths.images_dir.display());
    println!("  Audio: {}", config.paths.audio_dir.display());
    println!("  Output: {}", config.paths.output_dir.display());
    println!("  Image duration: {}s", config.timing.image_duration_secs);
    println!(
        "  Encode: {}x{} {} ({}, crf {}) + {} {}",
        config.encode.width,
        config.encode.height,
        config.encode.video_codec,
        config.encode.preset,
        config.encode.crf,
        config.encode.audio_codec,
        config.encode.audio_bitrate
    );
    println!("  Parallel scenes: {}", config.pipeline.parallelism());

    Ok(())
}
