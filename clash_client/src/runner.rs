//! Frame loops.
//!
//! The cooperative loop runs on a current-thread tokio runtime and sleeps
//! until the next frame deadline, so other tasks on the runtime get a turn
//! every frame. If the runtime is unavailable or the loop fails,
//! `LoopMode::Auto` falls back to a plain blocking loop.

use std::{io, thread, time::Duration};

use clash_shared::game::FrameOutcome;
use tokio::{runtime::Runtime, time::Instant};
use tracing::{info, warn};

use crate::{
    client::{GameClient, RunMode, SessionSummary},
    clock::{Clock, FixedStepClock, WallClock},
};

/// Which loop to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LoopMode {
    /// Cooperative, falling back to blocking if it cannot run.
    #[default]
    Auto,
    /// Cooperative only; failures are returned.
    Cooperative,
    Blocking,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: LoopMode,
    /// Stop after this many frames even if the game is still running.
    pub max_frames: Option<u64>,
    /// Derive time from the frame index instead of the wall clock.
    pub fixed_step: bool,
    /// Don't wait between frames. Implies `fixed_step`.
    pub unpaced: bool,
    pub fps: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: LoopMode::Auto,
            max_frames: None,
            fixed_step: false,
            unpaced: false,
            fps: 60,
        }
    }
}

impl RunOptions {
    pub fn clock(&self) -> Box<dyn Clock> {
        if self.fixed_step || self.unpaced {
            Box::new(FixedStepClock::new(self.fps))
        } else {
            Box::new(WallClock::start())
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    fn reached_limit(&self, frame: u64) -> bool {
        self.max_frames.is_some_and(|max| frame >= max)
    }
}

/// Runs frames until the game quits or the frame limit is hit, yielding to
/// the runtime between frames.
pub async fn run_cooperative(client: &mut GameClient, opts: &RunOptions) -> anyhow::Result<()> {
    let clock = opts.clock();
    let period = opts.frame_period();
    let mut next = Instant::now();

    while !opts.reached_limit(client.frame()) {
        next += period;
        let now_ms = clock.now_ms(client.frame());
        if client.step(now_ms)? == FrameOutcome::Quit {
            break;
        }
        if opts.unpaced {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep_until(next).await;
        }
    }
    Ok(())
}

/// Same as `run_cooperative` without a runtime.
pub fn run_blocking(client: &mut GameClient, opts: &RunOptions) -> anyhow::Result<()> {
    let clock = opts.clock();
    let period = opts.frame_period();
    let mut next = std::time::Instant::now();

    while !opts.reached_limit(client.frame()) {
        next += period;
        let now_ms = clock.now_ms(client.frame());
        if client.step(now_ms)? == FrameOutcome::Quit {
            break;
        }
        if !opts.unpaced {
            // A slow frame just shortens the next wait.
            if let Some(wait) = next.checked_duration_since(std::time::Instant::now()) {
                thread::sleep(wait);
            }
        }
    }
    Ok(())
}

fn current_thread_runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Builds a client and runs a session with the requested loop.
pub fn run<F>(make_client: F, opts: &RunOptions) -> anyhow::Result<SessionSummary>
where
    F: FnMut() -> anyhow::Result<GameClient>,
{
    run_with_runtime(make_client, opts, current_thread_runtime)
}

/// `run` with a caller-provided runtime builder.
///
/// A client that cannot be built is an error in every mode. Under
/// `LoopMode::Auto` a runtime that cannot be built, or a cooperative loop
/// that fails, falls back to the blocking loop; after a loop failure the
/// half-played client is replaced by a fresh one.
pub fn run_with_runtime<F, B>(
    mut make_client: F,
    opts: &RunOptions,
    build_runtime: B,
) -> anyhow::Result<SessionSummary>
where
    F: FnMut() -> anyhow::Result<GameClient>,
    B: FnOnce() -> io::Result<Runtime>,
{
    let mut client = make_client()?;
    if opts.mode == LoopMode::Blocking {
        return blocking_session(client, opts);
    }

    let rt = match build_runtime() {
        Ok(rt) => rt,
        Err(err) if opts.mode == LoopMode::Auto => {
            warn!(error = %err, "Async runtime unavailable, falling back to blocking loop");
            return blocking_session(client, opts);
        }
        Err(err) => return Err(anyhow::Error::from(err).context("build async runtime")),
    };

    info!(fps = opts.fps, "Running cooperative frame loop");
    match rt.block_on(run_cooperative(&mut client, opts)) {
        Ok(()) => Ok(client.into_summary(RunMode::Cooperative)),
        Err(err) if opts.mode == LoopMode::Auto => {
            warn!(error = %err, "Cooperative loop failed, retrying with blocking loop");
            blocking_session(make_client()?, opts)
        }
        Err(err) => Err(err.context("cooperative loop")),
    }
}

fn blocking_session(mut client: GameClient, opts: &RunOptions) -> anyhow::Result<SessionSummary> {
    info!(fps = opts.fps, "Running blocking frame loop");
    run_blocking(&mut client, opts)?;
    Ok(client.into_summary(RunMode::Blocking))
}
