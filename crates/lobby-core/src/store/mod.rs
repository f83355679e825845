pub mod persistent;
pub mod schema;
pub mod snapshot;
pub mod substrate;

use crate::config::{Backend, CoreConfig};

pub use persistent::{PersistentStore, Slot};
pub use schema::Validated;
pub use snapshot::{export_snapshot, snapshot};
pub use substrate::{DurableSubstrate, JsonDirSubstrate, MemorySubstrate, SqliteSubstrate};

/// Failures of the durable substrate itself.
///
/// Absent or malformed slot content is never reported through this type; the
/// caches absorb those cases. Seeing one of these means the environment is
/// broken (disk gone, database locked, permissions).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

const SQLITE_FILE_NAME: &str = "slots.db";

/// Open the substrate selected by `config.backend` under `config.data_dir`.
pub fn open_store(config: &CoreConfig) -> Result<PersistentStore, StoreError> {
    let store = match config.backend {
        Backend::JsonDir => {
            PersistentStore::from_substrate(JsonDirSubstrate::open(&config.data_dir)?)
        }
        Backend::Sqlite => PersistentStore::from_substrate(SqliteSubstrate::open(
            config.data_dir.join(SQLITE_FILE_NAME),
        )?),
        Backend::Memory => PersistentStore::from_substrate(MemorySubstrate::new()),
    };

    tracing::debug!(
        "opened {} store at {}",
        config.backend.label(),
        config.data_dir.display()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_store_per_backend() {
        let dir = tempdir().unwrap();

        for backend in [Backend::JsonDir, Backend::Sqlite, Backend::Memory] {
            let config = CoreConfig::new(dir.path().join(backend.label())).with_backend(backend);
            let store = open_store(&config).unwrap();
            store.write("workspaces", &["+a.b"]).unwrap();
            assert!(matches!(store.read("workspaces").unwrap(), Slot::Decoded(_)));
        }

        assert!(dir.path().join("json").join("workspaces.json").exists());
        assert!(dir.path().join("sqlite").join(SQLITE_FILE_NAME).exists());
        assert!(!dir.path().join("memory").exists());
    }
}
