//! Command handlers behind the `lobby` binary.
//!
//! Each handler returns a JSON value; `main` decides how to print it.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde_json::{json, Value};

use lobby_core::store::export_snapshot;
use lobby_core::timeline::TimelineGroup;
use lobby_core::{
    group_by_date, open_store, Alert, CoreConfig, Document, PersistedAuthor, PersistentStore,
    PubAssociations, PubMap, WorkspaceMembership,
};

/// Opened store plus the config it came from.
pub struct Session {
    pub config: CoreConfig,
    pub store: PersistentStore,
}

impl Session {
    pub fn open(config: CoreConfig) -> Result<Self> {
        let store = open_store(&config)
            .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
        Ok(Self { config, store })
    }

    fn membership(&self) -> WorkspaceMembership {
        WorkspaceMembership::from_config(self.store.clone(), &self.config)
    }

    fn pubs(&self) -> PubAssociations {
        PubAssociations::from_config(self.store.clone(), &self.config)
    }

    pub fn list_workspaces(&self) -> Result<Value> {
        Ok(json!(self.membership().read_or_repair()?))
    }

    pub fn add_workspace(&self, address: &str) -> Result<Value> {
        Ok(json!(self.membership().add(address)?))
    }

    pub fn remove_workspace(&self, address: &str) -> Result<Value> {
        Ok(json!(self.membership().remove(address)?))
    }

    pub fn list_pubs(&self, workspace: Option<&str>) -> Result<Value> {
        let pubs = self.pubs();
        match workspace {
            Some(ws) => Ok(json!(pubs.pubs_for(ws)?)),
            None => Ok(json!(pubs.read_or_repair()?)),
        }
    }

    pub fn add_pub(&self, workspace: &str, url: &str) -> Result<Value> {
        Ok(json!(self.pubs().add_pub(workspace, url)?))
    }

    pub fn remove_pub(&self, workspace: &str, url: &str) -> Result<Value> {
        Ok(json!(self.pubs().remove_pub(workspace, url)?))
    }

    pub fn forget_pubs(&self, workspace: &str) -> Result<Value> {
        Ok(json!(self.pubs().forget_workspace(workspace)?))
    }

    /// Replace the whole pub map with the contents of a JSON file.
    pub fn set_pubs_from_file(&self, path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let next: PubMap = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a workspace -> [url] object", path.display()))?;
        self.pubs().set(&next)?;
        Ok(json!(next))
    }

    /// Signed-in author's address, never the secret.
    pub fn author(&self) -> Result<Value> {
        let author = PersistedAuthor::new(self.store.clone()).load()?;
        Ok(match author {
            Some(kp) => json!({ "address": kp.address, "shortname": kp.shortname() }),
            None => Value::Null,
        })
    }

    pub fn export(&self, path: &Path) -> Result<Value> {
        let written = export_snapshot(&self.store, path)?;
        Ok(json!({ "path": path.display().to_string(), "slots": written }))
    }
}

/// Group a JSON array of documents by day.
pub fn timeline_from_file(path: &Path, utc: bool) -> Result<Value> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of documents", path.display()))?;

    let groups = if utc {
        group_by_date(documents, &Utc)
    } else {
        group_by_date(documents, &Local)
    };
    Ok(Value::Array(groups.iter().map(group_json).collect()))
}

fn group_json(group: &TimelineGroup<Document>) -> Value {
    json!({
        "key": group.date_key,
        "label": group.label(),
        "documents": group.documents.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
    })
}

/// Show `message` on an alert, then wait out the delay and show what the
/// alert falls back to. Returns both frames.
pub async fn flash(config: &CoreConfig, default_message: &str, message: &str) -> Value {
    let alert = Alert::new(default_message, config.transient_delay);
    alert.set(message);
    let showing = alert.text();

    let mut rx = alert.channel().subscribe();
    while rx.borrow_and_update().is_some() {
        if rx.changed().await.is_err() {
            break;
        }
    }

    json!({ "showing": showing, "after": alert.text() })
}
