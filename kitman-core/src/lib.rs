//! Kitman core library.
//!
//! `kitman-core` holds the component catalog model and the reconciliation
//! engine that sits between a toolkit manager front end and the privileged
//! installer backend: wire decoding, the catalog store, selection grouping,
//! target resolution and the load/commit facades.

pub mod catalog;
pub mod codec;
pub mod errors;
pub mod grouping;
pub mod install_conf;
pub mod kits;
pub mod logging;
pub mod manager_conf;
pub mod model;
pub mod observers;
pub mod path_cache;
pub mod progress;
pub mod report;
pub mod settings;
pub mod target;

pub use catalog::CatalogStore;
pub use grouping::{CheckGroup, CheckGroupItem, VersionLabel};
pub use install_conf::InstallConf;
pub use manager_conf::{ManagerConf, ManagerOptions};
pub use model::{Component, Kit, ToolInstaller, NO_VERSION, OTHERS_GROUP};
pub use target::{Operation, Target, TargetResolver};
