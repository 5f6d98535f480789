//! Directory-backed backend.
//!
//! Stands in for the privileged installer when no real one is attached.
//! Manifests are read from JSON files instead of being fetched:
//!
//! - `backend.json`   install dir, default install dir, self-update flag
//! - `installed.json` the installed kit (absent = nothing installed)
//! - `available.json` kits offered for installation
//! - `components.json` components of the bundled toolkit (installer mode)
//!
//! Mutating requests (install, uninstall, upgrades) are appended to
//! `requests.jsonl` and never executed.

use crate::command::Command;
use crate::wire::{WireComponent, WireKit};
use crate::Backend;
use kitman_error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const BACKEND_FILE: &str = "backend.json";
pub const INSTALLED_FILE: &str = "installed.json";
pub const AVAILABLE_FILE: &str = "available.json";
pub const COMPONENTS_FILE: &str = "components.json";
pub const REQUESTS_FILE: &str = "requests.jsonl";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendInfo {
    pub install_dir: Option<String>,
    pub default_install_dir: Option<String>,
    pub manager_update_available: bool,
    pub manifest_version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DirBackend {
    root: PathBuf,
}

impl DirBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn requests_path(&self) -> PathBuf {
        self.root.join(REQUESTS_FILE)
    }

    /// All mutating requests recorded so far, oldest first.
    pub fn recorded_requests(&self) -> GatewayResult<Vec<Value>> {
        let path = self.requests_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(GatewayError::from))
            .collect()
    }

    fn info(&self) -> GatewayResult<BackendInfo> {
        Ok(self.read_json(BACKEND_FILE)?.unwrap_or_default())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, file: &str) -> GatewayResult<Option<T>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let parsed = serde_json::from_str(&content).map_err(|source| GatewayError::Malformed {
            command: file.to_string(),
            source,
        })?;
        Ok(Some(parsed))
    }

    fn record(&self, command: &Command) -> GatewayResult<()> {
        fs::create_dir_all(&self.root)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.requests_path())?;
        let line = json!({ "command": command.name(), "args": command.args() });
        writeln!(file, "{}", line)?;
        log::info!("recorded backend request `{}`", command.name());
        Ok(())
    }
}

impl Backend for DirBackend {
    fn invoke(&self, command: &Command) -> GatewayResult<Value> {
        match command {
            Command::GetInstallDir => Ok(json!(self.info()?.install_dir.unwrap_or_default())),
            Command::DefaultInstallDir => {
                Ok(json!(self.info()?.default_install_dir.unwrap_or_default()))
            }
            Command::GetInstalledKit { .. } => {
                let kit: Option<WireKit> = self.read_json(INSTALLED_FILE)?;
                Ok(serde_json::to_value(kit)?)
            }
            Command::GetAvailableKits { .. } => {
                let kits: Vec<WireKit> = self.read_json(AVAILABLE_FILE)?.unwrap_or_default();
                Ok(serde_json::to_value(kits)?)
            }
            Command::GetComponentList => {
                let components: Vec<WireComponent> =
                    self.read_json(COMPONENTS_FILE)?.unwrap_or_default();
                Ok(serde_json::to_value(components)?)
            }
            Command::LoadManifestAndRetVersion => {
                Ok(json!(self.info()?.manifest_version.unwrap_or_default()))
            }
            Command::CheckManagerVersion => Ok(json!(self.info()?.manager_update_available)),
            Command::MaybeSelfUpdate => {
                if self.info()?.manager_update_available {
                    log::info!("a newer manager version is available");
                }
                Ok(Value::Null)
            }
            Command::UpgradeManager
            | Command::InstallToolchain { .. }
            | Command::UninstallToolkit { .. } => {
                self.record(command)?;
                Ok(Value::Null)
            }
            Command::SelectFolder | Command::CloseWindow => Ok(Value::Null),
        }
    }
}
