//! Clipbridge CLI - clipboard relay for sandboxed environments.

mod commands;
mod process;
mod ui;

use clap::{Parser, Subcommand};
use clipbridge_core::protocol::constants::DEFAULT_PORT;
use clipbridge_core::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clipbridge")]
#[command(about = "Clipboard relay for sandboxed environments", long_about = None)]
struct Cli {
    /// Loopback TCP port to listen on (host) or connect to (client)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Record debug-level entries in the status log
    #[arg(long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the client session (connects to the host, default)
    Run,
    /// Run the host session (serves the OS clipboard)
    Host,
    /// Copy text (argument or stdin) to the remote clipboard
    Copy { text: Option<String> },
    /// Print the remote clipboard to stdout
    Paste,
    /// Check the connection to the host
    Ping,
    /// Show protocol info
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("clipbridge_core=info".parse()?)
                .add_directive("clipbridge_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        port: cli.port,
        debug: cli.debug,
        ..Default::default()
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run_client(config).await?,
        Commands::Host => commands::run_host(config).await?,
        Commands::Copy { text } => commands::copy(config, text).await?,
        Commands::Paste => commands::paste(config).await?,
        Commands::Ping => commands::ping(config).await?,
        Commands::Info => commands::show_info(&config),
    }

    Ok(())
}
