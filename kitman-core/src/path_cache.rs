//! Last-used install path, cached between sessions.
//!
//! Only a convenience: a successful `get_install_dir` always wins over it.
//! Default location: `$HOME/.cache/kitman/install-path.json`
//! (override via `KITMAN_PATH_CACHE`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "install-path.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathCache {
    pub version: u32,
    pub install_path: Option<String>,
}

impl PathCache {
    pub fn new(install_path: Option<String>) -> Self {
        Self {
            version: 1,
            install_path,
        }
    }
}

pub fn default_cache_path() -> PathBuf {
    if let Some(path) = std::env::var_os("KITMAN_PATH_CACHE") {
        return PathBuf::from(path);
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".cache").join("kitman"))
        .unwrap_or_else(|| PathBuf::from(".kitman"))
        .join(CACHE_FILE_NAME)
}

pub fn load_cache(path: &Path) -> Result<Option<PathCache>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read path cache: {}", path.display()))?;
    let cache = serde_json::from_str(&content).context("Failed to parse path cache")?;
    Ok(Some(cache))
}

/// The cached install path, or `None` when absent or unreadable.
pub fn cached_install_path(path: &Path) -> Option<String> {
    match load_cache(path) {
        Ok(cache) => cache
            .and_then(|c| c.install_path)
            .filter(|p| !p.trim().is_empty()),
        Err(err) => {
            log::warn!("ignoring path cache: {:#}", err);
            None
        }
    }
}

pub fn save_cache_atomic(path: &Path, cache: &PathCache) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }

    let tmp_path = temp_path(path);
    let payload = serde_json::to_string_pretty(cache).context("Failed to serialize path cache")?;

    let mut file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp cache file: {}", tmp_path.display()))?;
    file.write_all(payload.as_bytes())
        .context("Failed to write path cache")?;
    file.sync_all().context("Failed to flush path cache")?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to atomically replace path cache: {}",
            path.display()
        )
    })?;

    sync_parent_dir(path)
}

/// Flush the directory entry so the rename survives a crash. A bare file
/// name has no parent to sync.
fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir = File::open(parent)
            .with_context(|| format!("Failed to open cache directory: {}", parent.display()))?;
        dir.sync_all().ok();
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(CACHE_FILE_NAME);
    let tmp_name = format!("{}.tmp", file_name);
    path.with_file_name(tmp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_cache_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let cache = PathCache::new(Some("/opt/rust".into()));

        save_cache_atomic(&path, &cache).unwrap();
        assert_eq!(load_cache(&path).unwrap(), Some(cache));
        assert_eq!(cached_install_path(&path).as_deref(), Some("/opt/rust"));
        assert!(!dir.path().join("nested").join("cache.json.tmp").exists());
    }

    #[test]
    fn missing_or_corrupt_cache_yields_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        assert_eq!(cached_install_path(&path), None);

        fs::write(&path, "not json").unwrap();
        assert!(load_cache(&path).is_err());
        assert_eq!(cached_install_path(&path), None);
    }

    #[test]
    fn overwrite_replaces_cache_and_syncs_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        save_cache_atomic(&path, &PathCache::new(Some("/opt/old".into()))).unwrap();
        save_cache_atomic(&path, &PathCache::new(Some("/opt/new".into()))).unwrap();

        assert_eq!(cached_install_path(&path).as_deref(), Some("/opt/new"));
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[test]
    fn parent_dir_sync_handles_bare_and_missing_parents() {
        assert!(sync_parent_dir(Path::new("cache.json")).is_ok());

        let dir = tempdir().unwrap();
        assert!(sync_parent_dir(&dir.path().join("cache.json")).is_ok());
        assert!(sync_parent_dir(&dir.path().join("gone").join("cache.json")).is_err());
    }

    #[test]
    fn blank_cached_path_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        save_cache_atomic(&path, &PathCache::new(Some("  ".into()))).unwrap();
        assert_eq!(cached_install_path(&path), None);
    }
}
