use std::sync::Arc;

use crate::constants::slots;
use crate::models::{AuthorKeypair, KeypairValidator, ShapeValidator};
use crate::store::{PersistentStore, Slot, StoreError};

/// Read-only view of the persisted author identity.
///
/// Writing the identity belongs to the identity layer; a bad slot is reported
/// as "no author" and left untouched.
pub struct PersistedAuthor {
    store: PersistentStore,
    validator: Arc<dyn KeypairValidator>,
}

impl PersistedAuthor {
    pub fn new(store: PersistentStore) -> Self {
        Self::with_validator(store, Arc::new(ShapeValidator))
    }

    pub fn with_validator(store: PersistentStore, validator: Arc<dyn KeypairValidator>) -> Self {
        Self { store, validator }
    }

    pub fn load(&self) -> Result<Option<AuthorKeypair>, StoreError> {
        let value = match self.store.read(slots::AUTHOR_KEYPAIR)? {
            Slot::Decoded(value) => value,
            Slot::Absent => return Ok(None),
            Slot::Undecodable => {
                tracing::warn!("author slot is not valid JSON; treating as signed out");
                return Ok(None);
            }
        };

        let keypair: AuthorKeypair = match serde_json::from_value(value) {
            Ok(keypair) => keypair,
            Err(e) => {
                tracing::warn!("author slot has the wrong shape: {}", e);
                return Ok(None);
            }
        };

        if !self.validator.is_valid_keypair(&keypair) {
            tracing::warn!("author {} failed keypair validation", keypair.address);
            return Ok(None);
        }

        Ok(Some(keypair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::author::fixtures;
    use crate::store::MemorySubstrate;

    fn author_with(raw: Option<String>) -> PersistedAuthor {
        let substrate = match raw {
            Some(raw) => MemorySubstrate::with_slots([(slots::AUTHOR_KEYPAIR, raw)]),
            None => MemorySubstrate::new(),
        };
        PersistedAuthor::new(PersistentStore::from_substrate(substrate))
    }

    #[test]
    fn test_absent_author_is_none() {
        assert_eq!(author_with(None).load().unwrap(), None);
    }

    #[test]
    fn test_valid_author_loads() {
        let kp = fixtures::keypair();
        let author = author_with(Some(serde_json::to_string(&kp).unwrap()));
        assert_eq!(author.load().unwrap(), Some(kp));
    }

    #[test]
    fn test_bad_author_is_none_and_not_repaired() {
        for raw in [
            "{nope".to_string(),
            "42".to_string(),
            "{\"address\": \"@suzy.bxyz\"}".to_string(),
            "{\"address\": \"bad\", \"secret\": \"bad\"}".to_string(),
        ] {
            let author = author_with(Some(raw.clone()));
            assert_eq!(author.load().unwrap(), None, "raw = {}", raw);
            assert_eq!(
                author.store.substrate().get(slots::AUTHOR_KEYPAIR).unwrap(),
                Some(raw)
            );
        }
    }

    #[test]
    fn test_injected_validator() {
        let raw = "{\"address\": \"bad\", \"secret\": \"bad\"}".to_string();
        let store = PersistentStore::from_substrate(MemorySubstrate::with_slots([(
            slots::AUTHOR_KEYPAIR,
            raw,
        )]));
        let author = PersistedAuthor::with_validator(store, Arc::new(|_: &AuthorKeypair| true));

        assert_eq!(author.load().unwrap().unwrap().address, "bad");
    }
}
