//! Headless game client.
//!
//! Usage:
//!   cargo run -p clash_client -- run --autopilot --rounds 3 --seed 7
//!   cargo run -p clash_client -- run --script inputs.json --fixed-step
//!   cargo run -p clash_client -- check-bundle --asset-dir asset --build-dir build/web
//!
//! Without a subcommand the client runs a session with the defaults.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clash_client::{
    bundle::missing_from_bundle,
    input::{Autopilot, IdleInput, InputSource, ScriptedInput},
    runner::{self, LoopMode, RunOptions},
    GameClient,
};
use clash_shared::config::GameConfig;
use tracing::{info, warn};

const DEFAULT_ROUNDS: u32 = 3;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Cosmo Clash headless client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a session
    Run(RunArgs),
    /// Check that a packaged build contains every asset file
    CheckBundle {
        #[arg(long, default_value = "asset")]
        asset_dir: PathBuf,
        #[arg(long, default_value = "build/web")]
        build_dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// JSON config file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    asset_root: Option<String>,
    #[arg(long)]
    fps: Option<u32>,
    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = LoopMode::Auto)]
    mode: LoopMode,
    /// Derive frame time from the frame index
    #[arg(long)]
    fixed_step: bool,
    /// Run frames back to back (implies --fixed-step)
    #[arg(long)]
    unpaced: bool,
    /// Let the bot play
    #[arg(long)]
    autopilot: bool,
    /// Games the autopilot plays before quitting
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    rounds: u32,
    /// Replay input from a JSON script
    #[arg(long, conflicts_with = "autopilot")]
    script: Option<PathBuf>,
    /// Print the session summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

fn load_config(args: &RunArgs) -> anyhow::Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(root) = &args.asset_root {
        cfg.asset_root = root.clone();
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate().context("invalid config")?;
    Ok(cfg)
}

fn input_source(args: &RunArgs) -> anyhow::Result<Box<dyn InputSource>> {
    if let Some(path) = &args.script {
        return Ok(Box::new(ScriptedInput::load(path)?));
    }
    if args.autopilot {
        return Ok(Box::new(Autopilot::new(args.rounds)));
    }
    Ok(Box::new(IdleInput))
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    if cfg.seed.is_none() && (args.fixed_step || args.unpaced) {
        warn!("Fixed-step run without --seed will not be reproducible");
    }
    info!(
        width = cfg.width,
        height = cfg.height,
        fps = cfg.fps,
        seed = ?cfg.seed,
        mode = ?args.mode,
        "Starting client"
    );

    let opts = RunOptions {
        mode: args.mode,
        max_frames: args.frames,
        fixed_step: args.fixed_step,
        unpaced: args.unpaced,
        fps: cfg.fps,
    };
    let summary = runner::run(
        || GameClient::from_config(cfg.clone(), input_source(&args)?),
        &opts,
    )?;

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            frames = summary.frames,
            rounds = summary.rounds,
            best_score = summary.best_score,
            last_score = summary.last_score,
            enemies_destroyed = summary.enemies_destroyed,
            mode = ?summary.mode,
            "Session finished"
        );
    }
    Ok(())
}

fn check_bundle(asset_dir: PathBuf, build_dir: PathBuf) -> anyhow::Result<()> {
    let missing = missing_from_bundle(&asset_dir, &build_dir)?;
    if missing.is_empty() {
        info!(build = %build_dir.display(), "All asset files are bundled");
        return Ok(());
    }
    for path in &missing {
        warn!(file = %path.display(), "Missing from bundle");
    }
    anyhow::bail!(
        "{} asset file(s) missing from {}",
        missing.len(),
        build_dir.display()
    )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        // Keep stdout clean for --summary-json.
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Run(args)) => run(args),
        Some(Command::CheckBundle {
            asset_dir,
            build_dir,
        }) => check_bundle(asset_dir, build_dir),
        None => run(RunArgs {
            rounds: DEFAULT_ROUNDS,
            ..Default::default()
        }),
    }
}
