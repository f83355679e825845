//! Durable key/value substrates backing the persistent store.
//!
//! A substrate only moves raw strings in and out of named slots. Decoding,
//! validation and repair live one layer up in [`super::PersistentStore`].
//!
//! Each implementation serialises its own access, so a single `get` or `set`
//! is atomic. Sequences of calls are not: callers that read-modify-write get
//! last-writer-wins semantics.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::StoreError;

pub trait DurableSubstrate: Send + Sync {
    /// Raw content of `key`, or `None` when the slot was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Names of every slot currently holding a value, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

// =============================================================================
// MemorySubstrate
// =============================================================================

/// Process-local substrate. Used by tests and by `Backend::Memory`.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a substrate pre-populated with raw slot content.
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let slots = slots
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            slots: Mutex::new(slots),
        }
    }
}

impl DurableSubstrate for MemorySubstrate {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.slots.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

// =============================================================================
// JsonDirSubstrate
// =============================================================================

/// One `<key>.json` file per slot inside a directory.
///
/// Writes go to a uniquely named temp file first and are then renamed over the
/// slot file, so a crash mid-write leaves either the old or the new content,
/// never a truncated file.
pub struct JsonDirSubstrate {
    dir: PathBuf,
    // Serialises writers within this process
    write_lock: Mutex<()>,
}

const SLOT_EXTENSION: &str = "json";

impl JsonDirSubstrate {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, SLOT_EXTENSION))
    }
}

impl DurableSubstrate for JsonDirSubstrate {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 bytes are slot corruption, not an I/O failure
            Err(e) if e.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let slot_file = self.slot_path(key);
        let temp_file = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        fs::write(&temp_file, value)?;
        if let Err(e) = fs::rename(&temp_file, &slot_file) {
            let _ = fs::remove_file(&temp_file);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if !stem.starts_with('.') {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

// =============================================================================
// SqliteSubstrate
// =============================================================================

/// Slots stored as rows of a single SQLite table.
pub struct SqliteSubstrate {
    conn: Mutex<Connection>,
}

impl SqliteSubstrate {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DurableSubstrate for SqliteSubstrate {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .lock()
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT key FROM slots ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
