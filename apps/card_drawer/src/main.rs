use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use deck_client::{DeckService, DeckSessionController, HttpDeckService, SessionEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{dispatch, Command, Flow, HELP};
use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Draw cards from a remote shuffled deck")]
struct Args {
    /// Base URL of the deck service, e.g. https://deckofcardsapi.com/api/deck
    #[arg(long)]
    api_base_url: Option<String>,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, default_value = "card_drawer.toml")]
    config: PathBuf,
}

fn spawn_renderer(mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Changed(view)) => println!("{}", render::render(&view)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "renderer lagged behind session events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(&args.config)
        .finish(args.api_base_url, args.timeout_secs)
        .context("invalid card drawer configuration")?;
    info!(api_base_url = %settings.api_base_url, "starting card drawer");

    let service = HttpDeckService::new(&settings.api_base_url, settings.request_timeout())
        .context("failed to build deck service client")?;
    let controller = DeckSessionController::new(Arc::new(service) as Arc<dyn DeckService>);
    let renderer = spawn_renderer(controller.subscribe());
    controller.spawn_initialize();
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read command")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match dispatch(&controller, cmd).await {
            Flow::Continue => {}
            Flow::Render => println!("{}", render::render(&controller.view().await)),
            Flow::Help => println!("{HELP}"),
            Flow::NothingToRetry => println!("nothing to retry: the deck is loading or loaded"),
            Flow::Quit => break,
        }
    }

    controller.teardown().await;
    renderer.abort();
    info!("card drawer stopped");
    Ok(())
}
