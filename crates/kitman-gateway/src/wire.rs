//! Backend record shapes (snake_case, description as one string).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireToolInstaller {
    pub required: bool,
    pub optional: bool,
    pub version: Option<String>,
    pub path: Option<String>,
}

/// A component record as the backend sends and expects it.
///
/// Every field is defaulted so a partial record still decodes; missing data
/// shows up as empty values rather than a failed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireComponent {
    pub id: u32,
    pub group_name: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub desc: String,
    pub required: bool,
    pub optional: bool,
    pub tool_installer: Option<WireToolInstaller>,
    pub is_toolchain_component: bool,
    pub installed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireKit {
    pub name: String,
    pub version: String,
    pub desc: Option<String>,
    pub date: Option<String>,
    pub info: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    #[serde(alias = "manifestURL")]
    pub manifest_url: Option<String>,
    pub components: Vec<WireComponent>,
}
