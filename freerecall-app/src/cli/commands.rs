use crate::cli::opts::*;

use anyhow::{bail, Context, Result};
use freerecall_client::{
    DueView, HistoryView, HttpStudyApi, RecallView, UploadField, UploadView,
};
use freerecall_core::Topic;
use freerecall_server::{ServerConfig, StoreKind};
use std::path::PathBuf;

pub async fn run_cli(args: Cli) -> Result<()> {
    let api = HttpStudyApi::new(&args.base_url);
    match args.cmd {
        Command::Upload(cmd) => upload_cmd(&api, cmd).await,
        Command::Due => due_cmd(&api).await,
        Command::Recall(cmd) => recall_cmd(&api, cmd).await,
        Command::History(cmd) => history_cmd(&api, cmd).await,
        Command::Serve(cmd) => serve_cmd(cmd).await,
        Command::Tui => bail!("the TUI runs on its own runtime; start it from main"),
    }
}

async fn upload_cmd(api: &HttpStudyApi, cmd: UploadCmd) -> Result<()> {
    let content = read_source(cmd.content, cmd.file)?;
    let mut view = UploadView::new();
    view.set(UploadField::Topic, cmd.topic);
    view.set(UploadField::Content, content);
    view.submit(api).await;
    match view.message() {
        Some(msg) if view.phase().success().is_some() => println!("{msg}"),
        Some(msg) => bail!(msg),
        None => bail!("topic and content must not be empty"),
    }
    Ok(())
}

async fn due_cmd(api: &HttpStudyApi) -> Result<()> {
    let mut view = DueView::new();
    view.load(api).await;
    if let Some(msg) = view.empty_message() {
        println!("{msg}");
        return Ok(());
    }
    for link in view.links() {
        println!("{}\t{}", link.label, link.href);
    }
    Ok(())
}

async fn recall_cmd(api: &HttpStudyApi, cmd: RecallCmd) -> Result<()> {
    let text = read_source(cmd.text, cmd.file)?;
    let mut view = RecallView::new(Topic::new(cmd.topic));
    view.text_mut().push_str(&text);
    view.submit(api).await;
    if view.result().is_none() {
        match view.result_lines().first() {
            Some(msg) => bail!(msg.clone()),
            None => bail!("recall text must not be empty"),
        }
    }
    println!("{}", view.title());
    for line in view.result_lines() {
        println!("{line}");
    }
    Ok(())
}

async fn history_cmd(api: &HttpStudyApi, cmd: HistoryCmd) -> Result<()> {
    let mut view = HistoryView::new();
    view.topic_mut().push_str(&cmd.topic);
    view.load(api).await;
    if cmd.expand {
        for i in 0..view.records().len() {
            view.toggle(i);
        }
    }
    for line in view.lines() {
        println!("{line}");
    }
    Ok(())
}

async fn serve_cmd(cmd: ServeCmd) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = cmd.addr {
        config.addr = addr;
    }
    if let Some(store) = cmd.store {
        config.store = match store {
            StoreArg::Memory => StoreKind::Memory,
            StoreArg::Sqlite => StoreKind::Sqlite,
        };
    }
    if let Some(p) = cmd.db_path {
        config.db_path = p;
    }
    freerecall_server::run(config).await
}

/// Inline text wins; otherwise read the whole file.
fn read_source(inline: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(s), _) => Ok(s),
        (None, Some(p)) => {
            std::fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))
        }
        (None, None) => bail!("nothing to send"),
    }
}
