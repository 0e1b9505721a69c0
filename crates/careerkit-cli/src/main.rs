//! careerkit — drives the core guardrails from a terminal.
//!
//! Each stdin line is a chat message or a slash command (see `/help`).
//! Toasts print as they appear and expire; logs go to stderr.

mod app;
mod input;
mod render;

use std::path::Path;
use std::time::Duration;

use careerkit_core::{AppContext, Config, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{dispatch, Flow};
use crate::render::expired_line;

/// How often pending toast expiries are checked.
const EXPIRY_POLL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careerkit=info,careerkit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    let cleanup_every = config.rate_limit.cleanup_interval().max(Duration::from_secs(1));
    let subject = std::env::var("USER").unwrap_or_else(|_| "anonymous".to_string());

    let mut ctx = AppContext::new(config, SystemClock::shared());
    if !ctx.audit_origin() {
        tracing::warn!(
            "origin {} is not served over HTTPS",
            ctx.config().security.origin_url
        );
    }

    println!("careerkit ready as {subject}; /help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut expiry = tokio::time::interval(EXPIRY_POLL);
    let mut cleanup = tokio::time::interval(cleanup_every);
    // Skip the immediate first tick
    cleanup.tick().await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match input::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("error: {e:#}");
                        continue;
                    }
                };
                let (flow, output) = dispatch(&mut ctx, &subject, command)?;
                for line in output {
                    println!("{line}");
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            _ = expiry.tick() => {
                for toast in ctx.tick() {
                    println!("{}", expired_line(&toast));
                }
            }
            _ = cleanup.tick() => {
                let dropped = ctx.cleanup()?;
                tracing::debug!(dropped, "rate limit keys cleaned up");
            }
        }
    }

    Ok(())
}
