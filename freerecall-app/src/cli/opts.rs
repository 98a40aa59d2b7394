use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use freerecall_client::DEFAULT_BASE_URL;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StoreArg {
    Memory,
    Sqlite,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "freerecall", version, about = "FreeRecall study aid: CLI, TUI and reference server")]
pub struct Cli {
    /// Server to talk to (upload/due/recall/history/tui)
    #[arg(long, global = true, env = "FREERECALL_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Upload study material for a topic
    Upload(UploadCmd),
    /// List topics due for review
    Due,
    /// Submit a free recall for a topic and show the score
    Recall(RecallCmd),
    /// Show past recall attempts for a topic
    History(HistoryCmd),
    /// Launch Terminal UI
    Tui,
    /// Run the reference HTTP server
    Serve(ServeCmd),
}

#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["content", "file"])))]
pub struct UploadCmd {
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub content: Option<String>,
    /// Read content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
pub struct RecallCmd {
    pub topic: String,
    #[arg(long)]
    pub text: Option<String>,
    /// Read the recall text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct HistoryCmd {
    pub topic: String,
    /// Show feedback and recall text for every record
    #[arg(long)]
    pub expand: bool,
}

/// Flags override the matching FREERECALL_* environment variables.
#[derive(Debug, Args, Clone)]
pub struct ServeCmd {
    /// Bind address (host:port)
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    #[arg(long, value_enum)]
    pub store: Option<StoreArg>,
    /// SQLite DB path when --store sqlite (defaults to app data dir)
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
