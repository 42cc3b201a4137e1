//! Bluff terminal client.
//!
//! # Usage
//!
//! ```bash
//! bluff --server 127.0.0.1:3001 --name Alice
//! RUST_LOG=debug bluff --room room-xyz 2> bluff.log
//! ```

use std::time::Duration;

use bluff_app::Runtime;
use bluff_cli::{SystemEnv, TerminalDriver, stdin_lines};
use bluff_client::{ClientConfig, DEFAULT_ROOM};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Bluff card game client
#[derive(Parser, Debug)]
#[command(name = "bluff")]
#[command(about = "Terminal client for the Bluff card game")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3001")]
    server: String,

    /// Room to join
    #[arg(short, long, default_value = DEFAULT_ROOM)]
    room: String,

    /// Display name announced when joining
    #[arg(short, long, default_value = "")]
    name: String,

    /// How long revealed cards stay visible, in milliseconds
    #[arg(long, default_value_t = 3000)]
    reveal_ms: u64,

    /// How long server messages stay visible, in milliseconds
    #[arg(long, default_value_t = 4000)]
    message_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            reveal_window: Duration::from_millis(self.reveal_ms),
            message_window: Duration::from_millis(self.message_ms),
            ..ClientConfig::for_room(&self.room).with_name(&self.name)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so they never interleave with the screen
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    tracing::info!(server = %args.server, room = %args.room, "bluff client starting");

    let driver = TerminalDriver::new(stdin_lines(), std::io::stdout(), args.room.clone());
    let runtime = Runtime::new(driver, SystemEnv::new(), args.config(), args.server.clone());

    Ok(runtime.run().await?)
}
