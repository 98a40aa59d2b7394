mod cli;
pub mod tui;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use freerecall_client::HttpStudyApi;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use cli::commands::run_cli;
use cli::opts::{Cli, Command};
use tui::app::TuiApp;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.cmd);

    match &args.cmd {
        // Run TUI on its own thread/runtime (no nested Tokio)
        Command::Tui => {
            let rt = Arc::new(Runtime::new()?);
            let api = Arc::new(HttpStudyApi::new(&args.base_url));
            let mut app = TuiApp::new(api, rt);
            app.run()
        }
        // Everything else uses a single runtime here
        _ => {
            let rt = Runtime::new()?;
            rt.block_on(run_cli(args))
        }
    }
}

/// RUST_LOG wins. Otherwise the server logs at info, one-shot commands only
/// warn, and the TUI stays quiet so nothing is drawn over the screen.
fn init_tracing(cmd: &Command) {
    let default = match cmd {
        Command::Serve(_) => "info,tower_http=debug",
        Command::Tui => "off",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
