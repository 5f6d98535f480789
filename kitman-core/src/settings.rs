//! Kitman settings (TOML).
//!
//! Every field has a default, so an empty file or no file at all is valid.
//! Lookup order: explicit path, `KITMAN_CONFIG`, built-in defaults.

use crate::path_cache;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask the backend to re-read its records instead of serving a cached copy.
    pub reload: bool,
    /// Run the self-update check at the end of a full load.
    pub self_update_check: bool,
    /// The manager only offers update/uninstall of the installed kit.
    pub uninstall_manager: bool,
    pub path_cache: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    /// Directory read by the file-backed backend.
    pub backend_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reload: true,
            self_update_check: true,
            uninstall_manager: true,
            path_cache: None,
            log_file: None,
            backend_dir: None,
        }
    }
}

impl Settings {
    pub fn path_cache_path(&self) -> PathBuf {
        self.path_cache
            .clone()
            .unwrap_or_else(path_cache::default_cache_path)
    }
}

pub fn parse_settings(toml_str: &str) -> Result<Settings> {
    toml::from_str(toml_str).context("failed to parse settings")
}

pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var_os("KITMAN_CONFIG").map(PathBuf::from),
    };

    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings = parse_settings(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn fields_override_defaults() {
        let settings = parse_settings(
            r#"
reload = false
self_update_check = false
path_cache = "/tmp/kitman/path.json"
backend_dir = "/srv/kitman"
"#,
        )
        .unwrap();
        assert!(!settings.reload);
        assert!(!settings.self_update_check);
        assert!(settings.uninstall_manager);
        assert_eq!(
            settings.path_cache_path(),
            PathBuf::from("/tmp/kitman/path.json")
        );
        assert_eq!(settings.backend_dir, Some(PathBuf::from("/srv/kitman")));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = parse_settings("reload = \"sometimes\"").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse settings"));
    }

    #[test]
    fn explicit_file_is_required_to_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("kitman.toml");
        assert!(load_settings(Some(&missing)).is_err());

        fs::write(&missing, "uninstall_manager = false\n").unwrap();
        let settings = load_settings(Some(&missing)).unwrap();
        assert!(!settings.uninstall_manager);
    }
}
