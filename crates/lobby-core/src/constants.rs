//! Application-wide constants
//!
//! Slot names and well-known defaults shared by the caches, the config layer
//! and the CLI.

/// Workspace every fresh install joins
pub const DEFAULT_WORKSPACE: &str = "+lobbydev.a1";

/// Pub the default workspace syncs through
pub const DEFAULT_PUB_URL: &str = "https://earthstar-demo-pub-v5-a.glitch.me";

/// How long a transient status message stays visible (milliseconds)
pub const DEFAULT_TRANSIENT_DELAY_MS: u64 = 3000;

/// Directory name used under the platform data dir
pub const APP_DIR_NAME: &str = "lobby";

/// Fallback data dir when the platform has none
pub const FALLBACK_DATA_DIR: &str = "lobby_data";

// Durable slot names
pub mod slots {
    /// Persisted author identity (read-only from this crate)
    pub const AUTHOR_KEYPAIR: &str = "authorKeypair";
    /// Joined workspace addresses
    pub const WORKSPACES: &str = "workspaces";
    /// Workspace address -> pub URLs
    pub const PUBS: &str = "pubs";

    /// Slots included in an exported snapshot. The author slot holds a secret
    /// and is never exported.
    pub const EXPORTABLE: &[&str] = &[WORKSPACES, PUBS];
}
