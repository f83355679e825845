use crate::config::CoreConfig;
use crate::constants::slots;
use crate::store::schema::string_list;
use crate::store::{PersistentStore, StoreError, Validated};

/// The ordered, duplicate-free list of workspaces the user has joined.
pub struct WorkspaceMembership {
    store: PersistentStore,
    default_workspace: String,
}

impl WorkspaceMembership {
    pub fn new(store: PersistentStore, default_workspace: impl Into<String>) -> Self {
        Self {
            store,
            default_workspace: default_workspace.into(),
        }
    }

    pub fn from_config(store: PersistentStore, config: &CoreConfig) -> Self {
        Self::new(store, config.default_workspace.clone())
    }

    fn default_list(&self) -> Vec<String> {
        vec![self.default_workspace.clone()]
    }

    /// Current slot content without repairing it.
    pub fn read(&self) -> Result<Validated<Vec<String>>, StoreError> {
        self.store.read_validated(slots::WORKSPACES, string_list)
    }

    /// Joined workspaces. When the slot is absent or does not hold a list of
    /// strings it is overwritten with the single default workspace, which is
    /// then returned.
    pub fn read_or_repair(&self) -> Result<Vec<String>, StoreError> {
        self.store
            .read_or_repair(slots::WORKSPACES, string_list, || self.default_list())
    }

    pub fn contains(&self, address: &str) -> Result<bool, StoreError> {
        Ok(self.read_or_repair()?.iter().any(|ws| ws == address))
    }

    /// Join `address`. Joining twice is a no-op; existing order is kept.
    pub fn add(&self, address: &str) -> Result<Vec<String>, StoreError> {
        let mut next = self.read_or_repair()?;
        next.push(address.to_string());
        let next = dedup_first_seen(next);

        self.store.write(slots::WORKSPACES, &next)?;
        tracing::info!("joined workspace {} ({} total)", address, next.len());
        Ok(next)
    }

    /// Leave `address`. Leaving a workspace that was never joined leaves the
    /// list unchanged.
    pub fn remove(&self, address: &str) -> Result<Vec<String>, StoreError> {
        let current = self.read_or_repair()?;
        let before = current.len();
        let next: Vec<String> = current.into_iter().filter(|ws| ws != address).collect();

        self.store.write(slots::WORKSPACES, &next)?;
        if next.len() != before {
            tracing::info!("left workspace {} ({} remaining)", address, next.len());
        }
        Ok(next)
    }
}

/// Order-preserving de-duplication; the first occurrence wins.
fn dedup_first_seen(list: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(list.len());
    list.into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
