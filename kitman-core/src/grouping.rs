//! Selection grouping: kit components -> checkbox groups.
//!
//! Pure derivations over catalog state. Nothing is cached; call again after
//! any store write.

use crate::model::{Component, Kit};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Old/new version pair shown next to a component name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionLabel {
    pub name: String,
    pub old_version: Option<String>,
    pub new_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckGroupItem<T> {
    pub label: String,
    pub checked: bool,
    pub required: bool,
    pub disabled: bool,
    pub focused: bool,
    pub value: T,
    /// Display-only; not used when resolving the target.
    pub version_label: Option<VersionLabel>,
}

impl<T> CheckGroupItem<T> {
    /// Flip the check mark. Disabled items never change.
    pub fn toggle(&mut self) -> bool {
        if !self.disabled {
            self.checked = !self.checked;
        }
        self.checked
    }

    pub fn symbol(&self) -> &'static str {
        if self.checked {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckGroup<T> {
    pub label: String,
    pub items: Vec<CheckGroupItem<T>>,
}

impl<T> CheckGroup<T> {
    pub fn checked_values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|i| i.checked).map(|i| &i.value)
    }
}

/// Values of every checked item, in display order.
pub fn checked_values<T: Clone>(groups: &[CheckGroup<T>]) -> Vec<T> {
    groups
        .iter()
        .flat_map(|g| g.checked_values().cloned())
        .collect()
}

/// `"(old -> new)"` when the installed version differs, `" (version)"` otherwise.
pub fn version_delta_label(installed_version: Option<&str>, version: &str) -> String {
    match installed_version.filter(|v| !v.is_empty()) {
        Some(old) if old != version => format!("({} -> {})", old, version),
        _ => format!(" ({})", version),
    }
}

/// Bucket items by group name, keeping first-seen group order.
pub fn group_items<T>(
    items: Vec<CheckGroupItem<T>>,
    group_of: impl Fn(&T) -> String,
) -> Vec<CheckGroup<T>> {
    let mut groups: Vec<CheckGroup<T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = group_of(&item.value);
        let slot = match index.get(&label) {
            Some(&slot) => slot,
            None => {
                groups.push(CheckGroup {
                    label: label.clone(),
                    items: Vec::new(),
                });
                index.insert(label, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].items.push(item);
    }

    groups
}

/// Checkbox items for the manager view of `current`, diffed against `installed`.
pub fn manager_items(current: &Kit, installed: Option<&Kit>) -> Vec<CheckGroupItem<Component>> {
    current
        .components
        .iter()
        .map(|item| {
            let installed_version = installed
                .and_then(|kit| kit.find_component(&item.name))
                .and_then(|c| c.version.clone());
            let version = item.version_str();
            let delta = version_delta_label(installed_version.as_deref(), version);

            CheckGroupItem {
                label: format!("{}{}", item.name, delta),
                checked: item.installed || item.required,
                required: item.required,
                disabled: item.required,
                focused: false,
                value: item.clone(),
                version_label: Some(VersionLabel {
                    name: item.name.clone(),
                    old_version: installed_version,
                    new_version: item.version.clone(),
                }),
            }
        })
        .collect()
}

/// Display groups for the manager. An unset current kit yields no groups.
pub fn manager_groups(
    current: Option<&Kit>,
    installed: Option<&Kit>,
) -> Vec<CheckGroup<Component>> {
    match current {
        Some(kit) => group_items(manager_items(kit, installed), |c| {
            c.group_label().to_string()
        }),
        None => Vec::new(),
    }
}

/// Installer ordering: required first, grouped before ungrouped, then by name.
pub fn installer_order(a: &Component, b: &Component) -> Ordering {
    b.required
        .cmp(&a.required)
        .then_with(|| b.is_grouped().cmp(&a.is_grouped()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Checkbox items for a fresh installation.
///
/// Required components are always checked and locked. Otherwise a component
/// starts checked when it is missing and not merely optional.
pub fn installer_items(mut components: Vec<Component>) -> Vec<CheckGroupItem<Component>> {
    components.sort_by(installer_order);
    components
        .into_iter()
        .map(|item| {
            let suffix = if item.installed {
                " (installed)"
            } else if item.required {
                " (required)"
            } else {
                ""
            };
            CheckGroupItem {
                label: format!("{}{}", item.name, suffix),
                checked: item.required || (!item.installed && !item.optional),
                required: item.required,
                disabled: item.required,
                focused: false,
                version_label: None,
                value: item,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OTHERS_GROUP;

    fn current_kit() -> Kit {
        Kit::new("Rust Toolkit", "1.81.0").with_components(vec![
            Component::new("rustc")
                .with_group("Rust")
                .with_version("1.81.0")
                .required(true),
            Component::new("mingw64").with_version("14.1"),
            Component::new("clippy")
                .with_group("Rust")
                .with_version("1.81.0")
                .optional(true),
            Component::new("vscode")
                .with_version("1.92")
                .with_group("IDE")
                .installed(true),
        ])
    }

    fn installed_kit() -> Kit {
        Kit::new("Rust Toolkit", "1.80.0").with_components(vec![
            Component::new("rustc")
                .with_version("1.80.0")
                .installed(true),
            Component::new("vscode")
                .with_version("1.92")
                .installed(true),
        ])
    }

    #[test]
    fn version_delta_label_formats() {
        assert_eq!(version_delta_label(Some("1.0"), "1.1"), "(1.0 -> 1.1)");
        assert_eq!(version_delta_label(Some("1.0"), "1.0"), " (1.0)");
        assert_eq!(version_delta_label(None, "1.0"), " (1.0)");
        assert_eq!(version_delta_label(Some(""), "2.0"), " (2.0)");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = manager_groups(Some(&current_kit()), Some(&installed_kit()));
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Rust", OTHERS_GROUP, "IDE"]);

        let rust: Vec<_> = groups[0]
            .items
            .iter()
            .map(|i| i.value.name.as_str())
            .collect();
        assert_eq!(rust, vec!["rustc", "clippy"]);
    }

    #[test]
    fn every_component_appears_exactly_once() {
        let kit = current_kit();
        let groups = manager_groups(Some(&kit), Some(&installed_kit()));
        let mut seen: Vec<Component> = groups
            .into_iter()
            .flat_map(|g| g.items.into_iter().map(|i| i.value))
            .collect();
        let mut expected = kit.components.clone();
        seen.sort_by(|a, b| a.name.cmp(&b.name));
        expected.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(seen, expected);
    }

    #[test]
    fn required_items_are_checked_and_locked() {
        let groups = manager_groups(Some(&current_kit()), None);
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            if item.required {
                assert!(item.checked && item.disabled, "{}", item.label);
            }
            assert!(!item.focused);
        }
    }

    #[test]
    fn checked_follows_installed_or_required() {
        let groups = manager_groups(Some(&current_kit()), Some(&installed_kit()));
        let state: HashMap<_, _> = groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|i| (i.value.name.as_str(), (i.checked, i.disabled)))
            .collect();
        assert_eq!(state["rustc"], (true, true));
        assert_eq!(state["vscode"], (true, false));
        assert_eq!(state["clippy"], (false, false));
        assert_eq!(state["mingw64"], (false, false));
    }

    #[test]
    fn labels_show_version_delta() {
        let groups = manager_groups(Some(&current_kit()), Some(&installed_kit()));
        let items: HashMap<_, _> = groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|i| (i.value.name.as_str(), i))
            .collect();

        assert_eq!(items["rustc"].label, "rustc(1.80.0 -> 1.81.0)");
        assert_eq!(items["vscode"].label, "vscode (1.92)");
        assert_eq!(items["clippy"].label, "clippy (1.81.0)");

        let meta = items["rustc"].version_label.as_ref().unwrap();
        assert_eq!(meta.old_version.as_deref(), Some("1.80.0"));
        assert_eq!(meta.new_version.as_deref(), Some("1.81.0"));
        assert!(items["clippy"]
            .version_label
            .as_ref()
            .unwrap()
            .old_version
            .is_none());
    }

    #[test]
    fn unset_current_kit_yields_nothing() {
        assert!(manager_groups(None, Some(&installed_kit())).is_empty());
    }

    #[test]
    fn derivation_is_idempotent() {
        let current = current_kit();
        let installed = installed_kit();
        assert_eq!(
            manager_groups(Some(&current), Some(&installed)),
            manager_groups(Some(&current), Some(&installed))
        );
    }

    #[test]
    fn disabled_items_ignore_toggle() {
        let mut groups = manager_groups(Some(&current_kit()), None);
        let rustc = &mut groups[0].items[0];
        assert!(rustc.toggle());
        assert_eq!(rustc.symbol(), "[x]");

        let clippy = &mut groups[0].items[1];
        assert!(clippy.toggle());
        assert!(!clippy.toggle());
        assert_eq!(clippy.symbol(), "[ ]");
    }

    #[test]
    fn checked_values_follow_display_order() {
        let groups = manager_groups(Some(&current_kit()), Some(&installed_kit()));
        let names: Vec<_> = checked_values(&groups)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["rustc", "vscode"]);
    }

    #[test]
    fn installer_items_sort_and_default() {
        let items = installer_items(vec![
            Component::new("zeta"),
            Component::new("docs").with_group("Docs").optional(true),
            Component::new("cargo").with_group("Rust").required(true),
            Component::new("gdb").with_group("Debug").installed(true),
        ]);
        let names: Vec<_> = items.iter().map(|i| i.value.name.as_str()).collect();
        assert_eq!(names, vec!["cargo", "docs", "gdb", "zeta"]);

        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["cargo (required)", "docs", "gdb (installed)", "zeta"]
        );

        let checked: Vec<_> = items.iter().map(|i| i.checked).collect();
        assert_eq!(checked, vec![true, false, false, true]);
        assert!(items[0].disabled);
        assert!(!items[2].disabled);
    }

    #[test]
    fn blank_group_sorts_with_ungrouped_components() {
        let items = installer_items(vec![
            Component::new("zeta"),
            Component::new("alpha").with_group(""),
            Component::new("gdb").with_group("Debug"),
        ]);
        let names: Vec<_> = items.iter().map(|i| i.value.name.as_str()).collect();
        assert_eq!(names, vec!["gdb", "alpha", "zeta"]);

        let groups = group_items(items, |c| c.group_label().to_string());
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Debug", OTHERS_GROUP]);
        assert_eq!(groups[1].items.len(), 2);
    }
}
