//! `kindlepost` - sends a local file to a Kindle address as an email
//! attachment, speaking SMTP directly to the recipient domain's mail
//! exchanger.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use kindlepost_mime::{Attachment, MessageBuilder};
use kindlepost_smtp::deliver;

/// Sends a file to a Kindle address as an email attachment.
///
/// The file is base64-encoded into a single-attachment MIME message and
/// handed to the recipient domain's mail exchanger over plain SMTP.
#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    /// Recipient address, e.g. ds8vKv8V7fkM@kindle.com
    recipient: String,

    /// File to send
    file: PathBuf,

    /// Configuration file (default: $HOME/.kindlepost.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kindlepost=info,kindlepost_smtp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    send(&args, &config).await
}

async fn send(args: &Args, config: &Config) -> Result<()> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("file path has no base name: {}", args.file.display()))?;

    let attachment = Attachment::new(file_name, content);
    info!(
        "Sending {file_name} ({} bytes) to {}",
        attachment.content.len(),
        args.recipient
    );

    let message = MessageBuilder::new()
        .from(config.sender.clone())
        .subject(config.subject.clone())
        .build(&args.recipient, &attachment);

    deliver(&args.recipient, &message, &config.delivery())
        .await
        .with_context(|| format!("delivering to {}", args.recipient))?;

    info!("Sent {file_name} to {}", args.recipient);
    Ok(())
}
