use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{dispatch_intent, DispatchError, HttpRemoteStore, Intent, SyncController};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod terminal;

use commands::{parse_command, Command, HELP};
use config::{load_settings, normalize_base_url};
use terminal::TerminalPresentation;

const INTENT_QUEUE_CAPACITY: usize = 16;

#[derive(Parser, Debug)]
struct Args {
    /// TOML file with connection settings; missing files are skipped.
    #[arg(long, default_value = "todo.toml")]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Render the list once and exit.
    #[arg(long)]
    once: bool,
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

    let mut settings = load_settings(&args.config)?;
    if let Some(base_url) = &args.base_url {
        settings.base_url = normalize_base_url(base_url)?;
    }
    if args.page_size.is_some() {
        settings.page_size = args.page_size.filter(|size| *size > 0);
    }
    tracing::info!(base_url = %settings.base_url, "using remote collection");

    let remote = HttpRemoteStore::with_timeout(settings.endpoints(), settings.request_timeout())?;
    let presentation = TerminalPresentation::new(std::io::stdout());
    let mut controller =
        SyncController::new(remote, presentation).with_page_size(settings.page_size);

    if controller.start().await.is_err() {
        bail!("initial load failed");
    }
    if args.once {
        return Ok(());
    }

    println!("{HELP}");
    let (intent_tx, intent_rx) = mpsc::channel(INTENT_QUEUE_CAPACITY);
    let reader = tokio::spawn(forward_commands(intent_tx));
    controller.run(intent_rx).await;
    reader.await??;
    Ok(())
}

/// Reads stdin until `quit` or EOF; dropping the sender ends the controller loop.
async fn forward_commands(intent_tx: mpsc::Sender<Intent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Intent(intent)) => match dispatch_intent(&intent_tx, intent) {
                Ok(()) => {}
                Err(err @ DispatchError::QueueFull(_)) => eprintln!("{err}"),
                Err(err @ DispatchError::Disconnected(_)) => {
                    tracing::error!(error = %err, "stopping input");
                    break;
                }
            },
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}
