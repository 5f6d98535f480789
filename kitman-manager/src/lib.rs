//! kitman front end: drives the manager and installer sessions from the
//! command line against a file-backed backend.

pub mod cli;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use kitman_core::errors::KitmanError;
use kitman_core::settings::{self, Settings};
use kitman_core::{CheckGroup, Component, InstallConf, ManagerConf, ManagerOptions, Operation};
use kitman_gateway::{DirBackend, Gateway};
use serde_json::json;
use std::io::Write;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    kitman_core::logging::init_with(settings.log_file.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &settings, &mut out)
}

/// Settings from file (or defaults) with command-line overrides applied.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = settings::load_settings(cli.config.as_deref())?;
    if let Some(dir) = &cli.backend_dir {
        settings.backend_dir = Some(dir.clone());
    }
    if let Some(file) = &cli.log_file {
        settings.log_file = Some(file.clone());
    }
    if cli.no_self_update {
        settings.self_update_check = false;
    }
    Ok(settings)
}

pub fn execute(cli: &Cli, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Kits { json } => {
            let conf = load_manager(settings)?;
            list_kits(&conf, *json, out)?;
        }
        Command::Groups { kit } => {
            let mut conf = load_manager(settings)?;
            if let Some(version) = kit {
                select_kit(&mut conf, version)?;
            }
            render::groups(out, &conf.groups())?;
        }
        Command::Target { json } => {
            let conf = load_manager(settings)?;
            if *json {
                let target = json!({
                    "operation": conf.operation(),
                    "components": conf.target_components(),
                });
                serde_json::to_writer_pretty(&mut *out, &target)?;
                writeln!(out)?;
            } else {
                render::target(out, conf.operation(), conf.target_components())?;
            }
        }
        Command::Apply {
            operation,
            kit,
            only,
            remove_self,
        } => {
            let mut conf = load_manager(settings)?;
            let operation = Operation::from(*operation);
            if operation == Operation::Uninstall && !conf.is_uninstall_manager() {
                bail!("uninstalling is disabled (uninstall_manager = false)");
            }

            if let Some(version) = kit {
                select_kit(&mut conf, version)?;
            }
            if operation == Operation::Update && (kit.is_some() || !only.is_empty()) {
                let mut groups = conf.groups();
                if !only.is_empty() {
                    keep_only(&mut groups, only);
                }
                conf.apply_selection(&groups);
            }
            conf.set_operation(operation);

            let request = conf.commit(*remove_self)?;
            writeln!(
                out,
                "sent {} ({} component(s))",
                request.name(),
                conf.target_components().len()
            )?;
        }
        Command::Install { path, skip } => {
            install(settings, path.as_deref(), skip, out)?;
        }
        Command::Upgrade => {
            let conf = manager(settings)?;
            if conf.check_manager_version()? {
                conf.upgrade_manager()?;
                writeln!(out, "manager upgrade requested")?;
            } else {
                writeln!(out, "manager is up to date")?;
            }
        }
    }
    Ok(())
}

fn backend(settings: &Settings) -> Result<DirBackend> {
    let dir = settings.backend_dir.clone().ok_or_else(|| {
        KitmanError::InvalidConfig(
            "no backend directory (pass --backend-dir or set backend_dir)".into(),
        )
    })?;
    if !dir.is_dir() {
        return Err(KitmanError::InvalidConfig(format!(
            "backend directory does not exist: {}",
            dir.display()
        ))
        .into());
    }
    Ok(DirBackend::new(dir))
}

fn manager(settings: &Settings) -> Result<ManagerConf<DirBackend>> {
    let backend = backend(settings)?;
    Ok(ManagerConf::new(
        Gateway::new(backend),
        ManagerOptions::from(settings),
    ))
}

fn load_manager(settings: &Settings) -> Result<ManagerConf<DirBackend>> {
    let mut conf = manager(settings)?;
    log::info!("📦 Loading toolkit records...");
    let report = conf.load_conf();
    log::debug!("load report:\n{}", report);
    Ok(conf)
}

fn list_kits(conf: &ManagerConf<DirBackend>, as_json: bool, out: &mut dyn Write) -> Result<()> {
    if as_json {
        let kits = json!({
            "installed": conf.installed(),
            "available": conf.kits(),
        });
        serde_json::to_writer_pretty(&mut *out, &kits)?;
        writeln!(out)?;
        return Ok(());
    }

    match conf.installed() {
        Some(kit) => writeln!(out, "installed: {} {}", kit.name, kit.version)?,
        None => writeln!(out, "installed: none")?,
    }

    let installable = conf.installable_kits();
    let latest = match conf.latest_installable_kit() {
        Ok(latest) => latest,
        Err(err) => {
            log::warn!("could not compare kit versions: {:#}", err);
            None
        }
    };

    writeln!(out, "available:")?;
    for kit in conf.kits() {
        let mut marks = Vec::new();
        if !installable.iter().any(|k| std::ptr::eq(*k, kit)) {
            marks.push("installed");
        }
        if latest.is_some_and(|l| std::ptr::eq(l, kit)) {
            marks.push("latest");
        }
        let suffix = if marks.is_empty() {
            String::new()
        } else {
            format!(" ({})", marks.join(", "))
        };
        writeln!(out, "  {} {}{}", kit.name, kit.version, suffix)?;
    }
    Ok(())
}

fn select_kit(conf: &mut ManagerConf<DirBackend>, version: &str) -> Result<()> {
    let kit = conf
        .kits()
        .iter()
        .find(|kit| kit.version.trim() == version.trim())
        .cloned()
        .with_context(|| format!("no available kit with version {}", version))?;
    log::info!("viewing {} {}", kit.name, kit.version);
    conf.set_current(kit);
    Ok(())
}

/// Uncheck every selectable item whose name is not listed. Required items
/// keep their check mark.
fn keep_only(groups: &mut [CheckGroup<Component>], names: &[String]) {
    for name in names {
        let known = groups
            .iter()
            .flat_map(|g| g.items.iter())
            .any(|item| &item.value.name == name);
        if !known {
            log::warn!("unknown component `{}` ignored", name);
        }
    }

    for item in groups.iter_mut().flat_map(|g| g.items.iter_mut()) {
        let keep = names.contains(&item.value.name);
        if item.checked != keep {
            item.toggle();
        }
    }
}

fn install(
    settings: &Settings,
    path: Option<&str>,
    skip: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let backend = backend(settings)?;
    let mut conf = InstallConf::new(Gateway::new(backend), Some(settings.path_cache_path()));
    log::info!("📦 Loading toolkit components...");
    let report = conf.load_all();
    log::debug!("load report:\n{}", report);

    if let Some(path) = path {
        conf.set_path(path);
    }
    conf.set_custom_install(path.is_some() || !skip.is_empty());

    for name in skip {
        let state = conf
            .items()
            .iter()
            .find(|item| &item.value.name == name)
            .map(|item| (item.checked, item.disabled));
        match state {
            None => log::warn!("unknown component `{}` ignored", name),
            Some((_, true)) => log::warn!("`{}` is required and cannot be skipped", name),
            Some((true, false)) => {
                conf.toggle(name);
            }
            Some((false, false)) => {}
        }
    }

    if let Some(version) = conf.version() {
        writeln!(out, "toolkit {}", version)?;
    }
    render::groups(out, &conf.groups())?;

    let request = conf.install()?;
    writeln!(
        out,
        "sent {} ({} component(s)) to {}",
        request.name(),
        conf.checked_components().len(),
        conf.path().unwrap_or_default()
    )?;
    Ok(())
}
