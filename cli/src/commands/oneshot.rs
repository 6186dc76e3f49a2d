//! One-shot request commands.
//!
//! Each command starts a short-lived client session, waits for it to come
//! online, performs a single request against the host, and exits. This is
//! the sandboxed side's scripting surface (`clipbridge copy | paste`).

use std::io::Read;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clipbridge_core::{
    ClientHandle, ClientSession, Config, LogLevel, StatusEvent, SystemClipboard, SystemLauncher,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Copy text (argument or stdin) to the remote clipboard.
pub async fn copy(config: Config, text: Option<String>) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let handle = connect(&config).await?;
    handle.write_remote(text).await?;
    handle.shutdown();
    Ok(())
}

/// Print the remote clipboard to stdout.
pub async fn paste(config: Config) -> anyhow::Result<()> {
    let handle = connect(&config).await?;
    let text = handle.read_remote().await?;
    handle.shutdown();
    print!("{text}");
    Ok(())
}

/// Check the connection to the host.
pub async fn ping(config: Config) -> anyhow::Result<()> {
    let handle = connect(&config).await?;
    let start = Instant::now();
    handle.ping("clipbridge").await?;
    handle.shutdown();
    println!("host replied in {:?}", start.elapsed());
    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<ClientHandle> {
    let session = ClientSession::new(
        config,
        Box::new(SystemClipboard::new()),
        Box::new(SystemLauncher::new()),
    );
    let (events, handle) = session.start();
    wait_online(events).await?;
    Ok(handle)
}

/// Consume status events until the session is online, or fail on the
/// first error-level entry (version mismatch, refused connection).
async fn wait_online(mut events: mpsc::UnboundedReceiver<StatusEvent>) -> anyhow::Result<()> {
    timeout(CONNECT_TIMEOUT, async {
        while let Some(event) = events.recv().await {
            match event {
                StatusEvent::Status { online: true, .. } => return Ok(()),
                StatusEvent::Log(entry) if entry.level == LogLevel::Error => {
                    bail!("{}", entry.message)
                }
                _ => {}
            }
        }
        bail!("session ended before connecting")
    })
    .await
    .context("timed out connecting to the host")?
}
