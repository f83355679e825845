//! Caches over the persisted slots.
//!
//! Each cache owns a clone of the process-wide [`PersistentStore`] and reads
//! through to it on every call; nothing is memoised in between. Mutations are
//! whole-value read-modify-write with last-writer-wins semantics.
//!
//! [`PersistentStore`]: crate::store::PersistentStore

pub mod author;
pub mod membership;
pub mod pubs;

pub use author::PersistedAuthor;
pub use membership::WorkspaceMembership;
pub use pubs::PubAssociations;
