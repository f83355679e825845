//! Keyed read/validate/write-through wrapper over a durable substrate.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::schema::Validated;
use super::substrate::DurableSubstrate;
use super::StoreError;

/// Raw state of one slot after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Absent,
    /// Present but not parseable as JSON
    Undecodable,
    Decoded(Value),
}

/// Process-wide handle to the durable slots.
///
/// Cheap to clone; every clone talks to the same substrate. Construct one per
/// process (or per test, over a `MemorySubstrate`) and hand it to each cache.
#[derive(Clone)]
pub struct PersistentStore {
    substrate: Arc<dyn DurableSubstrate>,
}

impl PersistentStore {
    pub fn new(substrate: Arc<dyn DurableSubstrate>) -> Self {
        Self { substrate }
    }

    pub fn from_substrate<S: DurableSubstrate + 'static>(substrate: S) -> Self {
        Self::new(Arc::new(substrate))
    }

    pub fn substrate(&self) -> &Arc<dyn DurableSubstrate> {
        &self.substrate
    }

    /// Read and decode `key`. Missing or unparseable content is a normal
    /// outcome, not an error.
    pub fn read(&self, key: &str) -> Result<Slot, StoreError> {
        let Some(raw) = self.substrate.get(key)? else {
            return Ok(Slot::Absent);
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(Slot::Decoded(value)),
            Err(e) => {
                tracing::debug!("slot `{}` is not valid JSON: {}", key, e);
                Ok(Slot::Undecodable)
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value)?;
        self.substrate.set(key, &encoded)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.substrate.remove(key)
    }

    /// Read `key` and run it through `validate`. Never writes.
    pub fn read_validated<T, F>(&self, key: &str, validate: F) -> Result<Validated<T>, StoreError>
    where
        F: FnOnce(&Value) -> Validated<T>,
    {
        Ok(match self.read(key)? {
            Slot::Absent => Validated::Absent,
            Slot::Undecodable => Validated::Invalid,
            Slot::Decoded(value) => validate(&value),
        })
    }

    /// Read `key`, and when it is absent or fails `validate`, overwrite it
    /// with `default()` and return that instead.
    ///
    /// This is a read with a side effect: callers must expect the slot to
    /// change underneath them.
    pub fn read_or_repair<T, F, D>(&self, key: &str, validate: F, default: D) -> Result<T, StoreError>
    where
        T: Serialize,
        F: FnOnce(&Value) -> Validated<T>,
        D: FnOnce() -> T,
    {
        match self.read_validated(key, validate)? {
            Validated::Valid(value) => Ok(value),
            Validated::Absent => {
                tracing::debug!("seeding slot `{}` with its default", key);
                let value = default();
                self.write(key, &value)?;
                Ok(value)
            }
            Validated::Invalid => {
                tracing::warn!("slot `{}` held malformed content; repaired to default", key);
                let value = default();
                self.write(key, &value)?;
                Ok(value)
            }
        }
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}
