//! Persisted pinned-app list codec.
//!
//! The store keeps pinned apps as one flat string list where every entry
//! occupies three consecutive slots: name, icon, command.

use panelmenu_types::PinnedApp;
use tracing::warn;

use crate::{Error, Result};

const TRIPLE: usize = 3;

/// Parse a flat list, rejecting lengths that are not a multiple of three.
///
/// # Errors
///
/// Returns [`Error::InvalidPinnedList`] if the list would split an entry.
pub fn try_parse(flat: &[String]) -> Result<Vec<PinnedApp>> {
    if flat.len() % TRIPLE != 0 {
        return Err(Error::InvalidPinnedList(format!(
            "{} values is not a whole number of (name, icon, command) entries",
            flat.len()
        )));
    }
    Ok(flat
        .chunks_exact(TRIPLE)
        .map(|c| PinnedApp::new(&c[0], &c[1], &c[2]))
        .collect())
}

/// Parse a flat list, dropping a trailing partial entry.
#[must_use]
pub fn parse(flat: &[String]) -> Vec<PinnedApp> {
    let remainder = flat.len() % TRIPLE;
    if remainder != 0 {
        warn!(
            "Pinned list has {} trailing value(s) that do not form an entry; ignoring them",
            remainder
        );
    }
    flat.chunks_exact(TRIPLE)
        .map(|c| PinnedApp::new(&c[0], &c[1], &c[2]))
        .collect()
}

/// Flatten entries back into the persisted representation
#[must_use]
pub fn flatten(apps: &[PinnedApp]) -> Vec<String> {
    apps.iter()
        .flat_map(|app| [app.name.clone(), app.icon.clone(), app.command.clone()])
        .collect()
}

/// Append `app` unless its command is already pinned.
#[must_use]
pub fn pin(apps: &[PinnedApp], app: PinnedApp) -> Option<Vec<PinnedApp>> {
    if apps.iter().any(|p| p.command == app.command) {
        return None;
    }
    let mut next = apps.to_vec();
    next.push(app);
    Some(next)
}

/// Remove every entry running `command`.
#[must_use]
pub fn unpin(apps: &[PinnedApp], command: &str) -> Option<Vec<PinnedApp>> {
    let next: Vec<PinnedApp> = apps.iter().filter(|p| p.command != command).cloned().collect();
    (next.len() != apps.len()).then_some(next)
}
