//! Picking kits to offer next to the installed one.

use crate::model::Kit;
use anyhow::{Context, Result};
use semver::Version;

/// Available kits that are not the installed release.
pub fn installable_kits<'a>(available: &'a [Kit], installed: Option<&Kit>) -> Vec<&'a Kit> {
    match installed {
        Some(installed) => available
            .iter()
            .filter(|kit| !kit.is_same_release(installed))
            .collect(),
        None => available.iter().collect(),
    }
}

/// Kit versions may carry a channel prefix ("stable 1.80.1").
pub fn parse_kit_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
    Version::parse(trimmed).with_context(|| format!("invalid kit version: {}", raw))
}

/// The newest kit of the installed product, if it is newer than what is installed.
///
/// Available kits are listed newest first; with nothing installed the first
/// one is offered.
pub fn latest_installable_kit<'a>(
    available: &'a [Kit],
    installed: Option<&Kit>,
) -> Result<Option<&'a Kit>> {
    let Some(installed) = installed else {
        return Ok(available.first());
    };
    let Some(candidate) = available.iter().find(|kit| kit.name == installed.name) else {
        return Ok(None);
    };

    let current = parse_kit_version(&installed.version)?;
    let target = parse_kit_version(&candidate.version)?;
    if target > current {
        Ok(Some(candidate))
    } else {
        Ok(None)
    }
}
