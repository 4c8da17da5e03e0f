//! Checks that a packaged build carries every asset file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Relative paths of files under `asset_dir` that are missing from
/// `bundle_dir/<asset_dir name>`, sorted. Empty means the bundle is complete.
pub fn missing_from_bundle(asset_dir: &Path, bundle_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let name = asset_dir
        .canonicalize()
        .with_context(|| format!("resolve asset dir {}", asset_dir.display()))?
        .file_name()
        .map(PathBuf::from)
        .with_context(|| format!("asset dir {} has no name", asset_dir.display()))?;
    let bundled_root = bundle_dir.join(name);

    let mut files = Vec::new();
    collect_files(asset_dir, Path::new(""), &mut files)?;

    let mut missing: Vec<PathBuf> = files
        .into_iter()
        .filter(|rel| !bundled_root.join(rel).is_file())
        .collect();
    missing.sort();
    Ok(missing)
}

fn collect_files(root: &Path, rel: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let dir = root.join(rel);
    let entries = fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let child = rel.join(entry.file_name());
        let kind = entry.file_type()?;
        if kind.is_dir() {
            collect_files(root, &child, out)?;
        } else if kind.is_file() {
            out.push(child);
        }
    }
    Ok(())
}
