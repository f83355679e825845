use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lobby_cli::commands::{flash, timeline_from_file, Session};
use lobby_cli::tracing_setup::init_tracing;
use lobby_core::{Backend, CoreConfig};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lobby")]
#[command(about = "Inspect and edit the lobby client's persisted state")]
struct Cli {
    /// Data directory (defaults to LOBBY_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend: json, sqlite or memory
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Joined workspaces
    Workspaces {
        #[command(subcommand)]
        action: WorkspaceAction,
    },

    /// Pub URLs per workspace
    Pubs {
        #[command(subcommand)]
        action: PubAction,
    },

    /// Show the signed-in author's address
    Author,

    /// Group a JSON array of documents by day, newest first
    Timeline {
        /// File holding `[{ "id": ..., "timestamp": <micros>, ... }]`
        file: PathBuf,
        /// Use UTC day boundaries instead of local time
        #[arg(long)]
        utc: bool,
    },

    /// Write workspaces and pubs to a JSON file
    Export {
        path: PathBuf,
    },

    /// Show a transient message until it expires
    Flash {
        message: String,
        /// Text shown when no transient message is active
        #[arg(long, default_value = "Welcome to the lobby")]
        default: String,
    },
}

#[derive(Subcommand)]
enum WorkspaceAction {
    List,
    Add { address: String },
    Remove { address: String },
}

#[derive(Subcommand)]
enum PubAction {
    /// Whole map, or one workspace's pubs
    List { workspace: Option<String> },
    Add { workspace: String, url: String },
    Remove { workspace: String, url: String },
    /// Drop a workspace's entry entirely
    Forget { workspace: String },
    /// Replace the whole map from a JSON file
    Set { file: PathBuf },
}

fn build_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    config
}

fn run_workspaces(session: &Session, action: &WorkspaceAction) -> Result<Value> {
    match action {
        WorkspaceAction::List => session.list_workspaces(),
        WorkspaceAction::Add { address } => session.add_workspace(address),
        WorkspaceAction::Remove { address } => session.remove_workspace(address),
    }
}

fn run_pubs(session: &Session, action: &PubAction) -> Result<Value> {
    match action {
        PubAction::List { workspace } => session.list_pubs(workspace.as_deref()),
        PubAction::Add { workspace, url } => session.add_pub(workspace, url),
        PubAction::Remove { workspace, url } => session.remove_pub(workspace, url),
        PubAction::Forget { workspace } => session.forget_pubs(workspace),
        PubAction::Set { file } => session.set_pubs_from_file(file),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = build_config(&cli);

    let output = match &cli.command {
        Commands::Timeline { file, utc } => timeline_from_file(file, *utc)?,
        Commands::Flash { message, default } => flash(&config, default, message).await,
        Commands::Workspaces { action } => run_workspaces(&Session::open(config)?, action)?,
        Commands::Pubs { action } => run_pubs(&Session::open(config)?, action)?,
        Commands::Author => Session::open(config)?.author()?,
        Commands::Export { path } => Session::open(config)?.export(path)?,
    };

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}
