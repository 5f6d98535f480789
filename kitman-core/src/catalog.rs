//! Catalog store: installed kit, available kits and the kit being viewed.
//!
//! A plain container. Callers enforce invariants (e.g. the installed kit only
//! listing installed components) before writing.

use crate::model::{Component, Kit};

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    installed: Option<Kit>,
    available: Vec<Kit>,
    current: Option<Kit>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(&self) -> Option<&Kit> {
        self.installed.as_ref()
    }

    pub fn kits(&self) -> &[Kit] {
        &self.available
    }

    pub fn current(&self) -> Option<&Kit> {
        self.current.as_ref()
    }

    pub fn current_components(&self) -> Option<&[Component]> {
        self.current.as_ref().map(|kit| kit.components.as_slice())
    }

    pub fn set_installed(&mut self, kit: Kit) {
        self.installed = Some(kit);
    }

    /// Replace all available kits in place.
    pub fn set_kits(&mut self, kits: impl IntoIterator<Item = Kit>) {
        self.available.clear();
        self.available.extend(kits);
    }

    pub fn set_current(&mut self, kit: Kit) {
        self.current = Some(kit);
    }
}
