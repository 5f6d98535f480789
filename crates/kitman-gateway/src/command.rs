//! The backend command surface.

use crate::wire::WireComponent;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetInstallDir,
    DefaultInstallDir,
    GetInstalledKit {
        reload: bool,
    },
    GetAvailableKits {
        reload: bool,
    },
    /// Component list of the toolkit bundled with the installer.
    GetComponentList,
    LoadManifestAndRetVersion,
    CheckManagerVersion,
    UpgradeManager,
    MaybeSelfUpdate,
    InstallToolchain {
        components_list: Vec<WireComponent>,
        install_dir: String,
    },
    UninstallToolkit {
        remove_self: bool,
    },
    SelectFolder,
    CloseWindow,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetInstallDir => "get_install_dir",
            Command::DefaultInstallDir => "default_install_dir",
            Command::GetInstalledKit { .. } => "get_installed_kit",
            Command::GetAvailableKits { .. } => "get_available_kits",
            Command::GetComponentList => "get_component_list",
            Command::LoadManifestAndRetVersion => "load_manifest_and_ret_version",
            Command::CheckManagerVersion => "check_manager_version",
            Command::UpgradeManager => "upgrade_manager",
            Command::MaybeSelfUpdate => "maybe_self_update",
            Command::InstallToolchain { .. } => "install_toolchain",
            Command::UninstallToolkit { .. } => "uninstall_toolkit",
            Command::SelectFolder => "select_folder",
            Command::CloseWindow => "close_window",
        }
    }

    /// Arguments as the backend receives them (snake_case keys).
    pub fn args(&self) -> Value {
        match self {
            Command::GetInstalledKit { reload } | Command::GetAvailableKits { reload } => {
                json!({ "reload": reload })
            }
            Command::InstallToolchain {
                components_list,
                install_dir,
            } => json!({
                "components_list": components_list,
                "install_dir": install_dir,
            }),
            Command::UninstallToolkit { remove_self } => json!({ "remove_self": remove_self }),
            _ => json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_flag_is_passed_through() {
        let cmd = Command::GetAvailableKits { reload: true };
        assert_eq!(cmd.name(), "get_available_kits");
        assert_eq!(cmd.args(), json!({ "reload": true }));
    }

    #[test]
    fn install_request_uses_snake_case_keys() {
        let cmd = Command::InstallToolchain {
            components_list: vec![WireComponent {
                name: "cargo".into(),
                ..WireComponent::default()
            }],
            install_dir: "/opt/rust".into(),
        };
        let args = cmd.args();
        assert_eq!(args["install_dir"], json!("/opt/rust"));
        assert_eq!(args["components_list"][0]["name"], json!("cargo"));
        assert_eq!(args["components_list"][0]["group_name"], json!(null));
    }

    #[test]
    fn argless_commands_send_empty_object() {
        assert_eq!(Command::GetInstallDir.args(), json!({}));
        assert_eq!(Command::CloseWindow.name(), "close_window");
    }
}
