//! Roomlink replay binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay a script, printing render instructions
//! roomlink-replay session.ndjson
//!
//! # Read the script from stdin and show outgoing requests too
//! cat session.ndjson | roomlink-replay --emits -
//! ```

use std::{
    io::{self, BufWriter, Read},
    path::PathBuf,
    time::Duration,
};

use clap::Parser;
use roomlink_app::{ReconnectPolicy, Runtime};
use roomlink_client::{DEFAULT_PAGE_SIZE, DEFAULT_ROOM, LocalUser, Session, SessionConfig};
use roomlink_replay::ScriptDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Roomlink session replay
#[derive(Parser, Debug)]
#[command(name = "roomlink-replay")]
#[command(about = "Replay a scripted chat session through the roomlink runtime")]
#[command(version)]
struct Args {
    /// Script to replay (NDJSON), or `-` for stdin
    script: PathBuf,

    /// ID of the local user
    #[arg(long, default_value = "1")]
    user_id: u64,

    /// Display name of the local user
    #[arg(long, default_value = "me")]
    username: String,

    /// Room shown after login
    #[arg(long, default_value = DEFAULT_ROOM)]
    default_room: String,

    /// Messages requested per history page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Reconnect attempts before giving up
    #[arg(long, default_value = "5")]
    reconnect_attempts: u32,

    /// Pause before each reconnect attempt, in milliseconds
    #[arg(long, default_value = "1000")]
    reconnect_delay_ms: u64,

    /// Also print requests sent to the server
    #[arg(long)]
    emits: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Stdout carries the replay output.
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let text = if args.script.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(&args.script)?
    };
    let steps = roomlink_replay::parse(&text)?;
    tracing::info!(steps = steps.len(), script = %args.script.display(), "replaying");

    let config = SessionConfig::new(LocalUser::new(args.user_id, args.username))
        .with_default_room(args.default_room)
        .with_page_size(args.page_size);
    let policy = ReconnectPolicy::new(
        args.reconnect_attempts,
        Duration::from_millis(args.reconnect_delay_ms),
    );
    let driver = ScriptDriver::new(steps, BufWriter::new(io::stdout())).with_emits(args.emits);

    let mut runtime = Runtime::new(driver, Session::new(config), policy);
    roomlink_replay::run_to_end(&mut runtime).await?;
    Ok(())
}
