pub mod cache;
pub mod config;
pub mod constants;
pub mod models;
pub mod store;
pub mod timeline;
pub mod transient;

// Re-export the common entry points at crate root for convenience
pub use cache::{PersistedAuthor, PubAssociations, WorkspaceMembership};
pub use config::{Backend, CoreConfig};
pub use models::{AuthorKeypair, Document, PubMap};
pub use store::{open_store, PersistentStore, StoreError, Validated};
pub use timeline::{group_by_date, group_by_local_date, TimelineGroup};
pub use transient::{Alert, TransientChannel};
