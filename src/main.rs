use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gmail_transcript::auth::token_manager::TokenManager;
use gmail_transcript::config::load_config;
use gmail_transcript::gmail::GmailClient;
use gmail_transcript::resolve::{Selector, resolve};
use gmail_transcript::transcript::assemble;

/// Export Gmail thread(s) to a plain-text transcript.
#[derive(Parser)]
#[command(name = "gmail_transcript")]
#[command(about = "Export Gmail thread(s) to plain text", long_about = None)]
struct Cli {
    /// Gmail message ID; its owning thread is exported
    #[arg(long)]
    message_id: Option<String>,

    /// Gmail thread ID
    #[arg(long)]
    thread_id: Option<String>,

    /// Gmail web URL; the trailing segment is treated as a message ID
    #[arg(long)]
    url: Option<String>,

    /// Gmail search query (uses first match unless --expand)
    #[arg(long)]
    query: Option<String>,

    /// Max threads to search (default 1)
    #[arg(long, default_value_t = 1)]
    max: u32,

    /// Output file
    #[arg(long, default_value = "thread.txt")]
    out: PathBuf,

    /// Fall back to the first text/html part when text/plain is missing
    #[arg(long)]
    html_fallback: bool,

    /// Export every query match (up to --max) instead of just the first
    #[arg(long)]
    expand: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let selector = Selector {
        thread_id: cli.thread_id,
        message_id: cli.message_id,
        url: cli.url,
        query: cli.query,
    };
    // Usage errors must fire before any network work, token refresh included.
    selector.require_any()?;

    let cfg = load_config().context("Configuration error")?;
    let token = TokenManager::from_config(&cfg).get_access_token()?;
    let client = GmailClient::new(token);

    let thread_ids = resolve(&client, &selector, cli.max, cli.expand)?;
    let document = assemble(&client, &thread_ids, cli.html_fallback)?;

    fs::write(&cli.out, document)
        .with_context(|| format!("could not write {}", cli.out.display()))?;
    println!(
        "Wrote {} thread(s) to {}",
        thread_ids.len(),
        cli.out.display()
    );
    Ok(())
}
