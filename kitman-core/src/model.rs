//! Catalog records in display form.
//!
//! These are what the rest of the crate works with. The backend's own
//! representation lives in `kitman_gateway::wire`; `codec` converts between
//! the two.

use serde::Serialize;

/// Version shown for a component whose record carries none.
pub const NO_VERSION: &str = "no version";

/// Display group for components without a group name.
pub const OTHERS_GROUP: &str = "Others";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInstaller {
    pub required: bool,
    pub optional: bool,
    pub version: Option<String>,
    pub path: Option<String>,
}

/// A single installable unit of a kit.
///
/// `required` and `optional` are never both set by the backend; nothing here
/// enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: u32,
    pub name: String,
    pub required: bool,
    pub optional: bool,
    pub installed: bool,
    pub version: Option<String>,
    /// One entry per description line.
    pub desc: Vec<String>,
    pub group_name: Option<String>,
    pub is_toolchain_component: bool,
    pub tool_installer: Option<ToolInstaller>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group_name = Some(group.into());
        self
    }

    pub fn with_desc<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desc = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    pub fn toolchain_component(mut self, is_toolchain: bool) -> Self {
        self.is_toolchain_component = is_toolchain;
        self
    }

    pub fn with_tool_installer(mut self, installer: ToolInstaller) -> Self {
        self.tool_installer = Some(installer);
        self
    }

    /// The display group this component belongs to.
    pub fn group_label(&self) -> &str {
        self.group_name
            .as_deref()
            .filter(|g| !g.is_empty())
            .unwrap_or(OTHERS_GROUP)
    }

    /// Whether the component is shown under a named group rather than "Others".
    pub fn is_grouped(&self) -> bool {
        self.group_label() != OTHERS_GROUP
    }

    pub fn version_str(&self) -> &str {
        self.version.as_deref().unwrap_or(NO_VERSION)
    }
}

/// A versioned bundle of components (one toolchain release).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub name: String,
    pub version: String,
    pub desc: Option<String>,
    pub date: Option<String>,
    pub info: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "manifestURL")]
    pub manifest_url: Option<String>,
    pub components: Vec<Component>,
}

impl Kit {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    /// Kits are the same release when name, version and manifest match.
    pub fn is_same_release(&self, other: &Kit) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.manifest_url == other.manifest_url
    }

    /// First component with the given name.
    pub fn find_component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Keep only the components that are actually present on disk.
    pub fn retain_installed(mut self) -> Self {
        self.components.retain(|c| c.installed);
        self
    }
}
