//! The pending operation and the components it applies to.

use crate::model::{Component, Kit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Update,
    Uninstall,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => write!(f, "update"),
            Operation::Uninstall => write!(f, "uninstall"),
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "update" => Ok(Operation::Update),
            "uninstall" => Ok(Operation::Uninstall),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Target {
    pub operation: Operation,
    pub components: Vec<Component>,
}

/// Holds exactly one full target snapshot. Selection changes replace the
/// component list wholesale.
#[derive(Debug, Clone, Default)]
pub struct TargetResolver {
    target: Target,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn operation(&self) -> Operation {
        self.target.operation
    }

    pub fn target_components(&self) -> &[Component] {
        &self.target.components
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.target.operation = operation;
    }

    pub fn set_components(&mut self, components: impl IntoIterator<Item = Component>) {
        self.target.components.clear();
        self.target.components.extend(components);
    }
}

/// Everything present or mandatory in `kit`, in kit order.
pub fn default_target_components(kit: &Kit) -> Vec<Component> {
    kit.components
        .iter()
        .filter(|c| c.installed || c.required)
        .cloned()
        .collect()
}
