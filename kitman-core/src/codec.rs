//! Conversion between backend wire records and display records.
//!
//! Descriptions travel as one newline-joined string and are kept as a list of
//! lines on this side. The same separator is used for every outgoing payload,
//! installation requests included.
//!
//! The `decode_*_value` functions are the schema checks for raw backend
//! responses: a mismatch is returned as a [`ShapeError`] so callers can decide
//! to keep their previous state.

use crate::model::{Component, Kit, ToolInstaller, NO_VERSION};
use kitman_error::ShapeError;
use kitman_gateway::wire::{WireComponent, WireKit, WireToolInstaller};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DESC_SEPARATOR: &str = "\n";

fn split_desc(desc: &str) -> Vec<String> {
    if desc.is_empty() {
        return Vec::new();
    }
    desc.split(DESC_SEPARATOR).map(str::to_string).collect()
}

fn join_desc(lines: &[String]) -> String {
    lines.join(DESC_SEPARATOR)
}

fn decode_tool_installer(wire: &WireToolInstaller) -> ToolInstaller {
    ToolInstaller {
        required: wire.required,
        optional: wire.optional,
        version: wire.version.clone(),
        path: wire.path.clone(),
    }
}

fn encode_tool_installer(installer: &ToolInstaller) -> WireToolInstaller {
    WireToolInstaller {
        required: installer.required,
        optional: installer.optional,
        version: installer.version.clone(),
        path: installer.path.clone(),
    }
}

pub fn decode_component(wire: &WireComponent) -> Component {
    let version = wire
        .version
        .clone()
        .or_else(|| wire.tool_installer.as_ref().and_then(|t| t.version.clone()))
        .unwrap_or_else(|| NO_VERSION.to_string());

    Component {
        id: wire.id,
        name: wire.name.clone(),
        required: wire.required,
        optional: wire.optional,
        installed: wire.installed,
        version: Some(version),
        desc: split_desc(&wire.desc),
        group_name: wire.group_name.clone(),
        is_toolchain_component: wire.is_toolchain_component,
        tool_installer: wire.tool_installer.as_ref().map(decode_tool_installer),
    }
}

pub fn encode_component(component: &Component) -> WireComponent {
    WireComponent {
        id: component.id,
        group_name: component.group_name.clone(),
        name: component.name.clone(),
        version: component.version.clone(),
        desc: join_desc(&component.desc),
        required: component.required,
        optional: component.optional,
        tool_installer: component.tool_installer.as_ref().map(encode_tool_installer),
        is_toolchain_component: component.is_toolchain_component,
        installed: component.installed,
    }
}

pub fn decode_kit(wire: &WireKit) -> Kit {
    Kit {
        name: wire.name.clone(),
        version: wire.version.clone(),
        desc: wire.desc.clone(),
        date: wire.date.clone(),
        info: wire.info.clone(),
        kind: wire.kind.clone(),
        notes: wire.notes.clone(),
        manifest_url: wire.manifest_url.clone(),
        components: wire.components.iter().map(decode_component).collect(),
    }
}

pub fn encode_kit(kit: &Kit) -> WireKit {
    WireKit {
        name: kit.name.clone(),
        version: kit.version.clone(),
        desc: kit.desc.clone(),
        date: kit.date.clone(),
        info: kit.info.clone(),
        kind: kit.kind.clone(),
        notes: kit.notes.clone(),
        manifest_url: kit.manifest_url.clone(),
        components: kit.components.iter().map(encode_component).collect(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_value<T: DeserializeOwned>(
    expected: &'static str,
    value: Value,
) -> Result<T, ShapeError> {
    serde_json::from_value(value).map_err(|err| ShapeError::new(expected, err.to_string()))
}

/// A path response. Blank strings decode to `None`.
pub fn decode_path_value(value: &Value) -> Result<Option<String>, ShapeError> {
    match value {
        Value::String(path) if path.trim().is_empty() => Ok(None),
        Value::String(path) => Ok(Some(path.clone())),
        other => Err(ShapeError::new("string path", kind_of(other))),
    }
}

/// A version string response. Blank strings decode to `None`.
pub fn decode_version_value(value: &Value) -> Result<Option<String>, ShapeError> {
    match value {
        Value::String(ver) if ver.trim().is_empty() => Ok(None),
        Value::String(ver) => Ok(Some(ver.trim().to_string())),
        other => Err(ShapeError::new("version string", kind_of(other))),
    }
}

pub fn decode_bool_value(value: &Value) -> Result<bool, ShapeError> {
    value
        .as_bool()
        .ok_or_else(|| ShapeError::new("bool", kind_of(value)))
}

/// The installed kit response: `null` means nothing is installed.
pub fn decode_installed_kit_value(value: Value) -> Result<Option<Kit>, ShapeError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => {
            let wire: WireKit = decode_value("kit object", value)?;
            Ok(Some(decode_kit(&wire)))
        }
        other => Err(ShapeError::new("kit object or null", kind_of(&other))),
    }
}

pub fn decode_kits_value(value: Value) -> Result<Vec<Kit>, ShapeError> {
    if !value.is_array() {
        return Err(ShapeError::new("kit array", kind_of(&value)));
    }
    let wire: Vec<WireKit> = decode_value("kit array", value)?;
    Ok(wire.iter().map(decode_kit).collect())
}

pub fn decode_components_value(value: Value) -> Result<Vec<Component>, ShapeError> {
    if !value.is_array() {
        return Err(ShapeError::new("component array", kind_of(&value)));
    }
    let wire: Vec<WireComponent> = decode_value("component array", value)?;
    Ok(wire.iter().map(decode_component).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_component() -> Component {
        Component::new("rust-analyzer")
            .with_id(7)
            .with_version("2024-05-06")
            .with_group("IDE")
            .with_desc(["Language server", "for editors"])
            .optional(true)
            .with_tool_installer(ToolInstaller {
                required: false,
                optional: true,
                version: Some("2024-05-06".into()),
                path: Some("/packages/ra.vsix".into()),
            })
    }

    #[test]
    fn encode_then_decode_reproduces_component() {
        let comp = sample_component();
        assert_eq!(decode_component(&encode_component(&comp)), comp);

        let bare = Component::new("cargo")
            .with_version("1.80.0")
            .required(true);
        assert_eq!(decode_component(&encode_component(&bare)), bare);
    }

    #[test]
    fn desc_is_split_per_line_and_joined_with_newline() {
        let wire = encode_component(&sample_component());
        assert_eq!(wire.desc, "Language server\nfor editors");
        assert_eq!(wire.group_name.as_deref(), Some("IDE"));

        let decoded = decode_component(&WireComponent {
            desc: String::new(),
            ..WireComponent::default()
        });
        assert!(decoded.desc.is_empty());
    }

    #[test]
    fn missing_version_and_blank_desc_do_not_round_trip() {
        let unversioned = decode_component(&encode_component(&Component::new("docs")));
        assert_eq!(unversioned.version.as_deref(), Some(NO_VERSION));

        let blank_line = Component::new("docs").with_version("1.0").with_desc([""]);
        let decoded = decode_component(&encode_component(&blank_line));
        assert!(decoded.desc.is_empty());
        assert_ne!(decoded, blank_line);

        let one_line = Component::new("docs")
            .with_version("1.0")
            .with_desc(["User guide"]);
        assert_eq!(decode_component(&encode_component(&one_line)), one_line);
    }

    #[test]
    fn version_falls_back_to_tool_installer_then_literal() {
        let from_installer = decode_component(&WireComponent {
            name: "mingw".into(),
            tool_installer: Some(WireToolInstaller {
                version: Some("13.0".into()),
                ..WireToolInstaller::default()
            }),
            ..WireComponent::default()
        });
        assert_eq!(from_installer.version.as_deref(), Some("13.0"));

        let without = decode_component(&WireComponent {
            name: "docs".into(),
            tool_installer: Some(WireToolInstaller::default()),
            ..WireComponent::default()
        });
        assert_eq!(without.version.as_deref(), Some(NO_VERSION));
        assert!(without.tool_installer.is_some());

        let none = decode_component(&WireComponent::default());
        assert!(none.tool_installer.is_none());
    }

    #[test]
    fn kit_round_trips_through_wire() {
        let kit = Kit {
            name: "Rust Toolkit".into(),
            version: "stable 1.80.0".into(),
            desc: Some("Stable channel".into()),
            info: Some("release notes".into()),
            manifest_url: Some("https://example.com/m.toml".into()),
            components: vec![sample_component()],
            ..Kit::default()
        };
        assert_eq!(decode_kit(&encode_kit(&kit)), kit);
    }

    #[test]
    fn path_value_requires_string() {
        assert_eq!(
            decode_path_value(&json!("/opt/rust")).unwrap().as_deref(),
            Some("/opt/rust")
        );
        assert_eq!(decode_path_value(&json!("  ")).unwrap(), None);
        let err = decode_path_value(&json!(12)).unwrap_err();
        assert_eq!(err.expected, "string path");
        assert_eq!(err.reason, "number");
    }

    #[test]
    fn installed_kit_value_accepts_null_and_object() {
        assert_eq!(decode_installed_kit_value(json!(null)).unwrap(), None);
        let kit = decode_installed_kit_value(json!({
            "name": "kit",
            "version": "1.0",
            "components": [{ "name": "cargo", "installed": true, "desc": "a\nb" }],
        }))
        .unwrap()
        .unwrap();
        assert_eq!(kit.components[0].desc, vec!["a", "b"]);
        assert!(decode_installed_kit_value(json!([])).is_err());
    }

    #[test]
    fn kits_value_must_be_array() {
        assert!(decode_kits_value(json!({ "name": "kit" })).is_err());
        assert_eq!(decode_kits_value(json!([])).unwrap(), Vec::new());
        assert!(decode_kits_value(json!([{ "components": 3 }])).is_err());
    }

    #[test]
    fn bool_and_version_values() {
        assert!(decode_bool_value(&json!(true)).unwrap());
        assert!(decode_bool_value(&json!("yes")).is_err());
        assert_eq!(
            decode_version_value(&json!(" 1.81.0 ")).unwrap().as_deref(),
            Some("1.81.0")
        );
        assert_eq!(decode_version_value(&json!("")).unwrap(), None);
    }
}
