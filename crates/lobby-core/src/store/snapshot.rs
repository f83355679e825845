//! Export of the persisted membership and pub state to a standalone file.
//!
//! The author slot is never included.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::{PersistentStore, Slot, StoreError};
use crate::constants::slots;

/// Collect every exportable slot that currently decodes as JSON.
///
/// Absent and undecodable slots are left out rather than repaired: exporting
/// must not change what is stored.
pub fn snapshot(store: &PersistentStore) -> Result<Map<String, Value>, StoreError> {
    let mut out = Map::new();
    for key in slots::EXPORTABLE {
        match store.read(key)? {
            Slot::Decoded(value) => {
                out.insert((*key).to_string(), value);
            }
            Slot::Undecodable => tracing::warn!("skipping undecodable slot `{}` in export", key),
            Slot::Absent => {}
        }
    }
    Ok(out)
}

/// Write [`snapshot`] as pretty JSON to `path`. Returns the number of slots
/// written.
pub fn export_snapshot(store: &PersistentStore, path: &Path) -> Result<usize, StoreError> {
    let snapshot = snapshot(store)?;
    let json = serde_json::to_string_pretty(&snapshot)?;

    let temp_file = path.with_extension("json.tmp");
    fs::write(&temp_file, json)?;
    if let Err(e) = fs::rename(&temp_file, path) {
        let _ = fs::remove_file(&temp_file);
        return Err(e.into());
    }

    tracing::info!("exported {} slot(s) to {}", snapshot.len(), path.display());
    Ok(snapshot.len())
}
