//! Manager session: the catalog, the pending target and the backend they are
//! loaded from.
//!
//! One `ManagerConf` is built per session and passed by reference. Derived
//! values (display groups, installable kits) are computed on read; observers
//! are only told which slice changed.

use crate::catalog::CatalogStore;
use crate::codec::{
    decode_bool_value, decode_installed_kit_value, decode_kits_value, decode_path_value,
    encode_component,
};
use crate::grouping::{checked_values, manager_groups, CheckGroup};
use crate::kits;
use crate::model::{Component, Kit};
use crate::observers::{Invalidation, Observers, SubscriptionId};
use crate::path_cache::{self, PathCache};
use crate::report::{LoadReport, StepStatus};
use crate::settings::Settings;
use crate::target::{default_target_components, Operation, TargetResolver};
use anyhow::{Context, Result};
use kitman_error::{KitmanError, KitmanResult};
use kitman_gateway::{Backend, Command, Gateway};
use std::path::PathBuf;

pub const STEP_INSTALL_DIR: &str = "install_dir";
pub const STEP_INSTALLED_KIT: &str = "installed_kit";
pub const STEP_AVAILABLE_KITS: &str = "available_kits";
pub const STEP_SELF_UPDATE: &str = "self_update";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Passed as `reload` to the kit queries.
    pub reload: bool,
    pub self_update_check: bool,
    pub uninstall_manager: bool,
    /// Where the last-used install path is persisted. `None` disables the cache.
    pub path_cache: Option<PathBuf>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            reload: true,
            self_update_check: true,
            uninstall_manager: true,
            path_cache: None,
        }
    }
}

impl From<&Settings> for ManagerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            reload: settings.reload,
            self_update_check: settings.self_update_check,
            uninstall_manager: settings.uninstall_manager,
            path_cache: Some(settings.path_cache_path()),
        }
    }
}

pub struct ManagerConf<B> {
    gateway: Gateway<B>,
    options: ManagerOptions,
    path: Option<String>,
    catalog: CatalogStore,
    target: TargetResolver,
    uninstall_manager: bool,
    observers: Observers,
}

impl<B: Backend> ManagerConf<B> {
    pub fn new(gateway: Gateway<B>, options: ManagerOptions) -> Self {
        let path = options
            .path_cache
            .as_deref()
            .and_then(path_cache::cached_install_path);
        if let Some(path) = &path {
            log::debug!("starting with cached install path {}", path);
        }
        Self {
            gateway,
            path,
            catalog: CatalogStore::new(),
            target: TargetResolver::new(),
            uninstall_manager: options.uninstall_manager,
            observers: Observers::new(),
            options,
        }
    }

    pub fn gateway(&self) -> &Gateway<B> {
        &self.gateway
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Full reload: install dir, installed kit, available kits, self update.
    ///
    /// Steps run in that order and fail independently; a failed step leaves
    /// its slice as it was.
    pub fn load_conf(&mut self) -> LoadReport {
        log::info!("loading manager configuration");
        let mut report = LoadReport::new();
        let outcome = self.load_install_dir();
        report.record(STEP_INSTALL_DIR, outcome);
        report.extend(self.reload_kits());
        let outcome = self.maybe_self_update();
        report.record(STEP_SELF_UPDATE, outcome);

        for step in report.failed() {
            log::warn!(
                "step {} failed: {}",
                step.name,
                step.error.as_deref().unwrap_or("unknown error")
            );
        }
        report
    }

    /// Re-read the installed and available kits only.
    pub fn reload_kits(&mut self) -> LoadReport {
        let mut report = LoadReport::new();
        let outcome = self.load_installed_kit();
        report.record(STEP_INSTALLED_KIT, outcome);
        let outcome = self.load_available_kits();
        report.record(STEP_AVAILABLE_KITS, outcome);
        report
    }

    pub fn load_install_dir(&mut self) -> Result<StepStatus> {
        let value = self
            .gateway
            .invoke(&Command::GetInstallDir)
            .context("get_install_dir failed")?;

        match decode_path_value(&value) {
            Ok(Some(path)) => {
                log::info!("install dir: {}", path);
                self.persist_path(&path);
                self.set_path(path);
                Ok(StepStatus::Completed)
            }
            Ok(None) => {
                log::debug!("backend reported no install dir; keeping previous path");
                Ok(StepStatus::Unchanged)
            }
            Err(err) => {
                log::warn!("ignoring get_install_dir response: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    /// Loads the installed kit and resets the target from it.
    ///
    /// The default target is taken from the kit as received (installed or
    /// required components); the stored kit keeps installed components only.
    pub fn load_installed_kit(&mut self) -> Result<StepStatus> {
        let value = self
            .gateway
            .invoke(&Command::GetInstalledKit {
                reload: self.options.reload,
            })
            .context("get_installed_kit failed")?;

        let kit = match decode_installed_kit_value(value) {
            Ok(Some(kit)) => kit,
            Ok(None) => {
                log::info!("no installed kit");
                return Ok(StepStatus::Unchanged);
            }
            Err(err) => {
                log::warn!("ignoring get_installed_kit response: {}", err);
                return Ok(StepStatus::Unchanged);
            }
        };

        log::info!("installed kit: {} {}", kit.name, kit.version);
        self.target.set_components(default_target_components(&kit));
        self.target.set_operation(Operation::Update);
        self.observers.notify(Invalidation::Target);

        let installed = kit.retain_installed();
        self.set_installed(installed.clone());
        self.set_current(installed);
        Ok(StepStatus::Completed)
    }

    pub fn load_available_kits(&mut self) -> Result<StepStatus> {
        let value = self
            .gateway
            .invoke(&Command::GetAvailableKits {
                reload: self.options.reload,
            })
            .context("get_available_kits failed")?;

        match decode_kits_value(value) {
            Ok(kits) => {
                log::info!("{} kit(s) available", kits.len());
                self.set_kits(kits);
                Ok(StepStatus::Completed)
            }
            Err(err) => {
                log::warn!("ignoring get_available_kits response: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    /// Fire-and-forget; a failure is logged and otherwise ignored.
    pub fn maybe_self_update(&self) -> Result<StepStatus> {
        if !self.options.self_update_check {
            return Ok(StepStatus::Skipped);
        }
        match self.gateway.invoke(&Command::MaybeSelfUpdate) {
            Ok(_) => Ok(StepStatus::Completed),
            Err(err) => {
                log::warn!("self update check failed: {}", err);
                Ok(StepStatus::Unchanged)
            }
        }
    }

    /// Whether a newer manager is available.
    pub fn check_manager_version(&self) -> Result<bool> {
        let value = self
            .gateway
            .invoke(&Command::CheckManagerVersion)
            .context("check_manager_version failed")?;
        Ok(decode_bool_value(&value)?)
    }

    pub fn upgrade_manager(&self) -> Result<()> {
        self.gateway
            .invoke(&Command::UpgradeManager)
            .context("upgrade_manager failed")?;
        Ok(())
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
        self.observers.notify(Invalidation::InstallPath);
    }

    fn persist_path(&self, path: &str) {
        let Some(cache_path) = self.options.path_cache.as_deref() else {
            return;
        };
        let cache = PathCache::new(Some(path.to_string()));
        if let Err(err) = path_cache::save_cache_atomic(cache_path, &cache) {
            log::warn!("could not save install path cache: {:#}", err);
        }
    }

    pub fn kits(&self) -> &[Kit] {
        self.catalog.kits()
    }

    pub fn installed(&self) -> Option<&Kit> {
        self.catalog.installed()
    }

    pub fn current(&self) -> Option<&Kit> {
        self.catalog.current()
    }

    pub fn current_components(&self) -> Option<&[Component]> {
        self.catalog.current_components()
    }

    pub fn set_kits(&mut self, kits: impl IntoIterator<Item = Kit>) {
        self.catalog.set_kits(kits);
        self.observers.notify(Invalidation::Available);
    }

    pub fn set_installed(&mut self, kit: Kit) {
        self.catalog.set_installed(kit);
        self.observers.notify(Invalidation::Installed);
    }

    pub fn set_current(&mut self, kit: Kit) {
        self.catalog.set_current(kit);
        self.observers.notify(Invalidation::Current);
    }

    /// Display groups for the current kit, diffed against the installed kit.
    pub fn groups(&self) -> Vec<CheckGroup<Component>> {
        manager_groups(self.catalog.current(), self.catalog.installed())
    }

    pub fn installable_kits(&self) -> Vec<&Kit> {
        kits::installable_kits(self.catalog.kits(), self.catalog.installed())
    }

    pub fn latest_installable_kit(&self) -> Result<Option<&Kit>> {
        kits::latest_installable_kit(self.catalog.kits(), self.catalog.installed())
    }

    pub fn operation(&self) -> Operation {
        self.target.operation()
    }

    pub fn target_components(&self) -> &[Component] {
        self.target.target_components()
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.target.set_operation(operation);
        self.observers.notify(Invalidation::Target);
    }

    pub fn set_components(&mut self, components: impl IntoIterator<Item = Component>) {
        self.target.set_components(components);
        self.observers.notify(Invalidation::Target);
    }

    /// Replace the target components with the checked items of `groups`.
    pub fn apply_selection(&mut self, groups: &[CheckGroup<Component>]) {
        self.set_components(checked_values(groups));
    }

    pub fn is_uninstall_manager(&self) -> bool {
        self.uninstall_manager
    }

    pub fn set_uninstall_manager(&mut self, value: bool) {
        self.uninstall_manager = value;
    }

    pub fn subscribe(&mut self, observer: impl FnMut(Invalidation) + 'static) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// The backend request that carries out the current target.
    pub fn commit_request(&self, remove_self: bool) -> KitmanResult<Command> {
        match self.target.operation() {
            Operation::Uninstall => Ok(Command::UninstallToolkit { remove_self }),
            Operation::Update => {
                let components = self.target.target_components();
                if components.is_empty() {
                    return Err(KitmanError::NoKitSelected);
                }
                let install_dir = self.path.clone().ok_or(KitmanError::MissingInstallDir)?;
                Ok(Command::InstallToolchain {
                    components_list: components.iter().map(encode_component).collect(),
                    install_dir,
                })
            }
        }
    }

    pub fn commit(&self, remove_self: bool) -> Result<Command> {
        let request = self.commit_request(remove_self)?;
        log::info!(
            "committing {} ({} component(s))",
            self.target.operation(),
            self.target.target_components().len()
        );
        self.gateway
            .invoke(&request)
            .with_context(|| format!("{} failed", request.name()))?;
        Ok(request)
    }
}
