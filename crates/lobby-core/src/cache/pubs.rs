use crate::config::CoreConfig;
use crate::constants::slots;
use crate::models::PubMap;
use crate::store::schema::pub_map;
use crate::store::{PersistentStore, StoreError, Validated};

/// Which pubs each workspace syncs through.
///
/// Every mutation reads the whole map, changes it and writes the whole map
/// back. URLs are not de-duplicated within a workspace.
pub struct PubAssociations {
    store: PersistentStore,
    default_workspace: String,
    default_pub_url: String,
}

impl PubAssociations {
    pub fn new(
        store: PersistentStore,
        default_workspace: impl Into<String>,
        default_pub_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            default_workspace: default_workspace.into(),
            default_pub_url: default_pub_url.into(),
        }
    }

    pub fn from_config(store: PersistentStore, config: &CoreConfig) -> Self {
        Self::new(
            store,
            config.default_workspace.clone(),
            config.default_pub_url.clone(),
        )
    }

    fn default_map(&self) -> PubMap {
        PubMap::from([(
            self.default_workspace.clone(),
            vec![self.default_pub_url.clone()],
        )])
    }

    /// Current slot content without repairing it.
    pub fn read(&self) -> Result<Validated<PubMap>, StoreError> {
        self.store.read_validated(slots::PUBS, pub_map)
    }

    /// The pub map. When the slot is absent or is not a JSON object it is
    /// overwritten with the default single-entry map, which is then returned.
    pub fn read_or_repair(&self) -> Result<PubMap, StoreError> {
        self.store
            .read_or_repair(slots::PUBS, pub_map, || self.default_map())
    }

    /// Replace the whole map.
    pub fn set(&self, next: &PubMap) -> Result<(), StoreError> {
        self.store.write(slots::PUBS, next)?;
        tracing::debug!("stored pub map with {} workspace(s)", next.len());
        Ok(())
    }

    pub fn pubs_for(&self, workspace: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read_or_repair()?
            .remove(workspace)
            .unwrap_or_default())
    }

    pub fn add_pub(&self, workspace: &str, url: &str) -> Result<PubMap, StoreError> {
        let mut next = self.read_or_repair()?;
        next.entry(workspace.to_string())
            .or_default()
            .push(url.to_string());
        self.set(&next)?;
        Ok(next)
    }

    /// Drop every occurrence of `url` from `workspace`. The workspace entry is
    /// kept even when its list becomes empty.
    pub fn remove_pub(&self, workspace: &str, url: &str) -> Result<PubMap, StoreError> {
        let mut next = self.read_or_repair()?;
        if let Some(urls) = next.get_mut(workspace) {
            urls.retain(|u| u != url);
        }
        self.set(&next)?;
        Ok(next)
    }

    /// Remove the workspace's entry entirely.
    pub fn forget_workspace(&self, workspace: &str) -> Result<PubMap, StoreError> {
        let mut next = self.read_or_repair()?;
        if next.remove(workspace).is_some() {
            tracing::info!("forgot pubs for workspace {}", workspace);
        }
        self.set(&next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySubstrate, Slot};
    use serde_json::json;

    const WS: &str = "+lobbydev.a1";
    const PUB: &str = "https://pub.example";

    fn pubs_with(raw: Option<&str>) -> PubAssociations {
        let substrate = match raw {
            Some(raw) => MemorySubstrate::with_slots([(slots::PUBS, raw)]),
            None => MemorySubstrate::new(),
        };
        PubAssociations::new(PersistentStore::from_substrate(substrate), WS, PUB)
    }

    fn stored(pubs: &PubAssociations) -> Slot {
        pubs.store.read(slots::PUBS).unwrap()
    }

    #[test]
    fn test_non_object_slot_repairs_to_default() {
        for raw in [None, Some("42"), Some("[\"x\"]"), Some("null"), Some("{broken")] {
            let pubs = pubs_with(raw);
            let map = pubs.read_or_repair().unwrap();

            assert_eq!(map, PubMap::from([(WS.to_string(), vec![PUB.to_string()])]));
            assert_eq!(stored(&pubs), Slot::Decoded(json!({ WS: [PUB] })));
        }
    }

    #[test]
    fn test_object_slot_is_trusted_shallowly() {
        let pubs = pubs_with(Some("{\"+a.b\": \"oops\", \"+c.d\": [\"https://c\"]}"));
        let map = pubs.read_or_repair().unwrap();

        assert!(map["+a.b"].is_empty());
        assert_eq!(map["+c.d"], vec!["https://c"]);
        // A valid object is not rewritten on read
        assert_eq!(
            stored(&pubs),
            Slot::Decoded(json!({"+a.b": "oops", "+c.d": ["https://c"]}))
        );
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let pubs = pubs_with(None);
        pubs.read_or_repair().unwrap();

        let next = PubMap::from([("+other.z9".to_string(), vec!["https://z".to_string()])]);
        pubs.set(&next).unwrap();

        assert_eq!(pubs.read_or_repair().unwrap(), next);
        assert!(pubs.pubs_for(WS).unwrap().is_empty());
    }

    #[test]
    fn test_add_pub_tolerates_duplicates() {
        let pubs = pubs_with(None);
        pubs.add_pub(WS, PUB).unwrap();
        let map = pubs.add_pub("+new.a1", "https://n").unwrap();

        assert_eq!(map[WS], vec![PUB, PUB]);
        assert_eq!(pubs.pubs_for("+new.a1").unwrap(), vec!["https://n"]);
    }

    #[test]
    fn test_remove_pub_and_forget() {
        let pubs = pubs_with(None);
        pubs.add_pub(WS, "https://second").unwrap();
        pubs.add_pub(WS, PUB).unwrap();

        let map = pubs.remove_pub(WS, PUB).unwrap();
        assert_eq!(map[WS], vec!["https://second"]);

        let map = pubs.remove_pub("+unknown.a1", PUB).unwrap();
        assert!(!map.contains_key("+unknown.a1"));

        let map = pubs.forget_workspace(WS).unwrap();
        assert!(map.is_empty());
        assert_eq!(stored(&pubs), Slot::Decoded(json!({})));
    }

    #[test]
    fn test_read_does_not_repair() {
        let pubs = pubs_with(Some("7"));
        assert_eq!(pubs.read().unwrap(), Validated::Invalid);
        assert_eq!(stored(&pubs), Slot::Decoded(json!(7)));
    }
}
