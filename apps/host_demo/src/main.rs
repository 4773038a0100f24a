use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use widget_api::{ChatWindow, WebChatApi};
use widget_store::WidgetStore;

mod config;
mod render;
mod script;

use config::load_settings;
use render::spawn_render_loops;
use script::run_script;

/// Drives the chat widget the way an embedding page would.
#[derive(Parser, Debug)]
struct Args {
    /// Widget settings file; defaults to ./widget.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON-lines action script; reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let store = WidgetStore::new();
    settings.apply_to(&store).await;

    let window = ChatWindow::new(Arc::clone(&store));
    let render_loops = spawn_render_loops(&store, &window);
    let api = WebChatApi::new(Arc::clone(&store), window);
    let title = store.title().await;
    info!(%title, "widget initialized");

    let stdout = io::stdout();
    let summary = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script '{}'", path.display()))?;
            run_script(&api, BufReader::new(file), stdout.lock()).await?
        }
        None => run_script(&api, io::stdin().lock(), stdout.lock()).await?,
    };

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        "script finished"
    );

    // Dropping the last senders closes the channels so the loops drain and exit.
    drop(api);
    drop(store);
    for handle in render_loops {
        handle.await.context("render loop panicked")?;
    }
    Ok(())
}
