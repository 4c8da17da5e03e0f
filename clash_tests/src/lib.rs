//! Shared fixtures for the integration tests.

use std::{fs, path::Path};

use clash_client::{
    input::InputSource,
    runner::{self, LoopMode, RunOptions},
    GameClient, SessionSummary,
};
use clash_shared::config::GameConfig;
use tempfile::TempDir;

/// Installs a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// A temporary asset root holding empty placeholder files at `files`
/// (paths relative to the root, e.g. `asset/enemy/enemy1.png`).
pub fn asset_tree(files: &[&str]) -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for rel in files {
        touch(dir.path(), rel)?;
    }
    Ok(dir)
}

pub fn touch(root: &Path, rel: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(())
}

/// Default config with a fixed seed and the given asset root.
pub fn seeded_config(seed: u64, asset_root: &Path) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        asset_root: asset_root.display().to_string(),
        ..Default::default()
    }
}

/// Options for a reproducible run: fixed-step time, no waiting.
pub fn unpaced(mode: LoopMode, max_frames: u64) -> RunOptions {
    RunOptions {
        mode,
        max_frames: Some(max_frames),
        fixed_step: true,
        unpaced: true,
        ..Default::default()
    }
}

/// Runs a full session, building a fresh input source for every client.
pub fn run_session<I>(
    cfg: &GameConfig,
    opts: &RunOptions,
    mut input: I,
) -> anyhow::Result<SessionSummary>
where
    I: FnMut() -> anyhow::Result<Box<dyn InputSource>>,
{
    runner::run(|| GameClient::from_config(cfg.clone(), input()?), opts)
}
