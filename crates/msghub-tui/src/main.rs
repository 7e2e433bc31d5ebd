//! msghub terminal client entry point.

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use msghub_app::{Runtime, RuntimeConfig};
use msghub_client::{Client, HttpConfig, HttpTransport};
use msghub_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// msghub terminal client
#[derive(Parser, Debug)]
#[command(name = "msghub-tui")]
#[command(about = "Terminal client for msghub chat servers")]
#[command(version)]
struct Args {
    /// Base URL of the hub
    #[arg(short, long, default_value = "http://localhost:8001")]
    server: String,

    /// Interval between polls, in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,

    /// Delay before the room list is refreshed after a room is created or
    /// destroyed, in milliseconds
    #[arg(long, default_value_t = 500)]
    refresh_delay_ms: u64,

    /// Per-request timeout in milliseconds. Requests are unbounded if unset.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level, used when `RUST_LOG` is unset
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// File to write logs to. The terminal belongs to the UI, so nothing is
    /// logged unless this is set.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    }

    tracing::info!(server = %args.server, "msghub client starting");

    let transport = HttpTransport::new(&HttpConfig {
        base_url: args.server,
        timeout: args.timeout_ms.map(Duration::from_millis),
    })?;
    let config = RuntimeConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        list_refresh_delay: Duration::from_millis(args.refresh_delay_ms),
    };

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::start(driver, Client::new(transport), config).await?;
    runtime.run().await?;

    Ok(())
}
