//! Installer session: install path, the bundled toolkit's components and the
//! user's check marks, up to the `install_toolchain` request.

use crate::codec::{
    decode_components_value, decode_path_value, decode_version_value, encode_component,
};
use crate::grouping::{checked_values, group_items, installer_items, CheckGroup, CheckGroupItem};
use crate::model::Component;
use crate::path_cache::{self, PathCache};
use crate::progress::InstallProgress;
use crate::report::{LoadReport, StepStatus};
use anyhow::{Context, Result};
use kitman_error::{KitmanError, KitmanResult, ShapeError};
use kitman_gateway::{Backend, BackendEvent, Command, EventListeners, Gateway, ListenerId};
use serde_json::Value;
use std::path::PathBuf;

pub const STEP_MANIFEST: &str = "manifest";
pub const STEP_DEFAULT_PATH: &str = "default_path";
pub const STEP_COMPONENTS: &str = "components";

pub struct InstallConf<B> {
    gateway: Gateway<B>,
    path_cache: Option<PathBuf>,
    path: Option<String>,
    version: Option<String>,
    items: Vec<CheckGroupItem<Component>>,
    custom_install: bool,
    progress: InstallProgress,
    listeners: EventListeners,
}

impl<B: Backend> InstallConf<B> {
    pub fn new(gateway: Gateway<B>, path_cache: Option<PathBuf>) -> Self {
        Self {
            gateway,
            path_cache,
            path: None,
            version: None,
            items: Vec::new(),
            custom_install: false,
            progress: InstallProgress::new(),
            listeners: EventListeners::new(),
        }
    }

    pub fn gateway(&self) -> &Gateway<B> {
        &self.gateway
    }

    pub fn load_all(&mut self) -> LoadReport {
        log::info!("loading installer configuration");
        let mut report = LoadReport::new();
        let outcome = self.load_manifest();
        report.record(STEP_MANIFEST, outcome);
        let outcome = self.load_default_path();
        report.record(STEP_DEFAULT_PATH, outcome);
        let outcome = self.load_components();
        report.record(STEP_COMPONENTS, outcome);
        report
    }

    pub fn load_manifest(&mut self) -> Result<StepStatus> {
        let value = self
            .gateway
            .invoke(&Command::LoadManifestAndRetVersion)
            .context("load_manifest_and_ret_version failed")?;
        match decode_version_value(&value) {
            Ok(Some(version)) => {
                log::info!("toolkit version {}", version);
                self.version = Some(version);
                Ok(StepStatus::Completed)
            }
            Ok(None) => Ok(StepStatus::Unchanged),
            Err(err) => {
                log::warn!("ignoring manifest version: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    /// The cached path if there is one, otherwise the backend's default.
    pub fn load_default_path(&mut self) -> Result<StepStatus> {
        if let Some(cached) = self
            .path_cache
            .as_deref()
            .and_then(path_cache::cached_install_path)
        {
            log::debug!("using cached install path {}", cached);
            self.path = Some(cached);
            return Ok(StepStatus::Completed);
        }

        let value = self
            .gateway
            .invoke(&Command::DefaultInstallDir)
            .context("default_install_dir failed")?;
        match decode_path_value(&value) {
            Ok(Some(path)) => {
                self.path = Some(path);
                Ok(StepStatus::Completed)
            }
            Ok(None) => Ok(StepStatus::Unchanged),
            Err(err) => {
                log::warn!("ignoring default_install_dir response: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    pub fn load_components(&mut self) -> Result<StepStatus> {
        let value = self
            .gateway
            .invoke(&Command::GetComponentList)
            .context("get_component_list failed")?;
        match decode_components_value(value) {
            Ok(components) => {
                log::info!("{} component(s) in toolkit", components.len());
                self.set_components(components);
                Ok(StepStatus::Completed)
            }
            Err(err) => {
                log::warn!("ignoring get_component_list response: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_custom_install(&self) -> bool {
        self.custom_install
    }

    pub fn set_custom_install(&mut self, custom: bool) {
        self.custom_install = custom;
    }

    /// Replace the component list and reset the check marks to their defaults.
    pub fn set_components(&mut self, components: Vec<Component>) {
        self.items = installer_items(components);
    }

    pub fn items(&self) -> &[CheckGroupItem<Component>] {
        &self.items
    }

    pub fn groups(&self) -> Vec<CheckGroup<Component>> {
        group_items(self.items.clone(), |c| c.group_label().to_string())
    }

    pub fn checked_components(&self) -> Vec<Component> {
        self.items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.value.clone())
            .collect()
    }

    /// Apply check marks from a (possibly edited) set of groups.
    pub fn apply_selection(&mut self, groups: &[CheckGroup<Component>]) {
        let selected = checked_values(groups);
        for item in self.items.iter_mut().filter(|item| !item.disabled) {
            item.checked = selected.iter().any(|c| c.name == item.value.name);
        }
    }

    /// Toggle the first component called `name`. Returns its new state, or
    /// `None` when there is no such component.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        self.items
            .iter_mut()
            .find(|item| item.value.name == name)
            .map(CheckGroupItem::toggle)
    }

    pub fn progress(&self) -> &InstallProgress {
        &self.progress
    }

    /// Fold a backend push event into the session.
    pub fn handle_event(&mut self, event: &BackendEvent) {
        match event {
            BackendEvent::FolderSelected(path) if path.trim().is_empty() => {
                log::debug!("folder selection cancelled");
            }
            BackendEvent::FolderSelected(path) => self.set_path(path.clone()),
            other => {
                self.progress.apply(other);
            }
        }
    }

    /// Register a callback that sees every event after the session has folded it in.
    pub fn listen(&mut self, listener: impl FnMut(&BackendEvent) + 'static) -> ListenerId {
        self.listeners.listen(listener)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.unlisten(id)
    }

    /// Entry point for a raw backend event. Malformed payloads are logged and
    /// leave the session untouched.
    pub fn dispatch_event(&mut self, name: &str, payload: &Value) -> Result<(), ShapeError> {
        let event = BackendEvent::parse(name, payload).map_err(|err| {
            log::warn!("ignoring backend event `{}`: {}", name, err);
            err
        })?;
        self.handle_event(&event);
        self.listeners.dispatch(&event);
        Ok(())
    }

    /// Ask the backend to open its folder picker; the answer arrives as a
    /// `folder-selected` event.
    pub fn select_folder(&self) -> Result<()> {
        self.gateway
            .invoke(&Command::SelectFolder)
            .context("select_folder failed")?;
        Ok(())
    }

    pub fn install_request(&self) -> KitmanResult<Command> {
        let install_dir = self.path.clone().ok_or(KitmanError::MissingInstallDir)?;
        let components = self.checked_components();
        if components.is_empty() {
            return Err(KitmanError::NoKitSelected);
        }
        Ok(Command::InstallToolchain {
            components_list: components.iter().map(encode_component).collect(),
            install_dir,
        })
    }

    /// Send the installation request and remember the path for next time.
    pub fn install(&mut self) -> Result<Command> {
        let request = self.install_request()?;
        self.progress = InstallProgress::new();
        self.gateway
            .invoke(&request)
            .context("install_toolchain failed")?;

        if let (Some(cache), Some(path)) = (self.path_cache.as_deref(), self.path.as_ref()) {
            if let Err(err) =
                path_cache::save_cache_atomic(cache, &PathCache::new(Some(path.clone())))
            {
                log::warn!("could not save install path cache: {:#}", err);
            }
        }
        Ok(request)
    }
}
