/// Lofi Maker - "slowed + reverb" renderer
use anyhow::Context;
use clap::{Parser, Subcommand};
use lofi_maker::{
    config::LofiConfig,
    jobs::{collect_inputs, BatchQueue},
    presets::{parse_assignment, resolve_effects},
    services::RenderService,
    AppError, BatchReport,
};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lofi-maker")]
#[command(about = "Turn tracks into slowed + reverb versions", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./lofi.toml if present)
    #[arg(short, long, global = true, env = "LOFI_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Enable or re-level a configured preset, e.g. --preset rain=0.4
    #[arg(long = "preset", value_name = "NAME=VOLUME", value_parser = parse_assignment)]
    presets: Vec<(String, f32)>,

    /// Mix in an effect file, e.g. --fx fx/vinyl.wav=0.3
    #[arg(long = "fx", value_name = "PATH=VOLUME", value_parser = parse_assignment)]
    files: Vec<(String, f32)>,

    /// Output directory (overrides output.directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single track
    Render {
        /// Track to process
        input: PathBuf,

        /// Output file name without extension (default: "<prefix><input name>")
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        args: RenderArgs,
    },
    /// Render many tracks (files and/or directories) in parallel
    Batch {
        /// Tracks or directories to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Number of parallel workers (overrides batch.workers)
        #[arg(short, long)]
        workers: Option<usize>,

        #[command(flatten)]
        args: RenderArgs,
    },
    /// List the configured effect presets
    Presets,
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "lofi_maker=debug,lofi_audio=debug"
    } else {
        "lofi_maker=info,lofi_audio=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = LofiConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            input,
            name,
            args,
        } => {
            apply_overrides(&mut config, &args, None);
            config.validate()?;
            render(&config, input, name.as_deref(), &args).await?;
        }
        Commands::Batch {
            inputs,
            workers,
            args,
        } => {
            apply_overrides(&mut config, &args, workers);
            config.validate()?;
            let report = batch(&config, &inputs, &args).await?;
            if !report.is_success() {
                anyhow::bail!("{} of {} tracks failed", report.failed.len(), report.total());
            }
        }
        Commands::Presets => {
            config.validate()?;
            list_presets(&config);
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut LofiConfig, args: &RenderArgs, workers: Option<usize>) {
    if let Some(dir) = &args.output {
        config.output.directory = dir.clone();
    }
    if let Some(workers) = workers {
        config.batch.workers = workers;
    }
}

async fn render(
    config: &LofiConfig,
    input: PathBuf,
    name: Option<&str>,
    args: &RenderArgs,
) -> anyhow::Result<()> {
    let effects = resolve_effects(&config.effects, &args.presets, &args.files)?;
    let service = RenderService::from_config(config);
    let request = service.request_for(&input, name, effects);

    let track = service
        .render(request)
        .await
        .with_context(|| format!("failed to render {}", input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&track)?);
    } else {
        for warning in &track.warnings {
            eprintln!("warning: {warning}");
        }
        println!(
            "{} ({} Hz, {:.1}s)",
            track.output.display(),
            track.sample_rate,
            track.duration_secs
        );
    }
    Ok(())
}

async fn batch(
    config: &LofiConfig,
    inputs: &[PathBuf],
    args: &RenderArgs,
) -> Result<BatchReport, AppError> {
    let effects = resolve_effects(&config.effects, &args.presets, &args.files)?;
    let tracks = collect_inputs(inputs)?;
    if tracks.is_empty() {
        return Err(AppError::Config("no audio files found in the given inputs".to_string()));
    }

    let service = Arc::new(RenderService::from_config(config));
    let queue = Arc::new(BatchQueue::new(Arc::clone(&service), config.batch.workers));
    for track in &tracks {
        queue
            .enqueue(service.request_for(track, None, effects.clone()))
            .await;
    }

    let report = queue.run().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for track in &report.rendered {
            println!("ok    {} -> {}", track.input.display(), track.output.display());
            for warning in &track.warnings {
                println!("      warning: {warning}");
            }
        }
        for track in &report.failed {
            println!("error {}: {}", track.input.display(), track.error);
        }
    }
    Ok(report)
}

fn list_presets(config: &LofiConfig) {
    if config.effects.is_empty() {
        println!("No effect presets configured (add [[effects]] entries to lofi.toml)");
        return;
    }
    for preset in &config.effects {
        let state = if preset.volume > 0.0 {
            format!("on at {}", preset.volume)
        } else {
            "off".to_string()
        };
        println!("{:<16} {:<8} {}", preset.name, state, preset.path.display());
    }
}
