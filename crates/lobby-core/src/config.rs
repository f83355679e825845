use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    APP_DIR_NAME, DEFAULT_PUB_URL, DEFAULT_TRANSIENT_DELAY_MS, DEFAULT_WORKSPACE,
    FALLBACK_DATA_DIR,
};

/// Which durable substrate backs the persistent store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// One `<slot>.json` file per slot inside the data dir
    #[default]
    JsonDir,
    /// A single `slots.db` SQLite file inside the data dir
    Sqlite,
    /// Volatile, process-local. Nothing survives a restart.
    Memory,
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::JsonDir => "json",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "json-dir" => Ok(Self::JsonDir),
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown backend `{}` (expected json, sqlite or memory)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub transient_delay: Duration,
    pub default_workspace: String,
    pub default_pub_url: String,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            backend: Backend::default(),
            transient_delay: Duration::from_millis(DEFAULT_TRANSIENT_DELAY_MS),
            default_workspace: DEFAULT_WORKSPACE.to_string(),
            default_pub_url: DEFAULT_PUB_URL.to_string(),
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Default config overridden by `LOBBY_DATA_DIR`, `LOBBY_BACKEND` and
    /// `LOBBY_ALERT_MS`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = get("LOBBY_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(raw) = get("LOBBY_BACKEND") {
            match raw.parse() {
                Ok(backend) => config.backend = backend,
                Err(e) => tracing::warn!("ignoring LOBBY_BACKEND: {}", e),
            }
        }

        if let Some(raw) = get("LOBBY_ALERT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.transient_delay = Duration::from_millis(ms),
                Err(e) => tracing::warn!("ignoring LOBBY_ALERT_MS={:?}: {}", raw, e),
            }
        }

        config
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));
        Self::new(data_dir)
    }
}
