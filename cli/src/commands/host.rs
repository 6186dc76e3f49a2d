//! Host daemon command implementation.

use clipbridge_core::{Config, HostSession, LogBuffer, StatusEvent, SystemClipboard};

use crate::process::kill_stale_hosts;
use crate::ui::{print_banner, print_recent_activity, print_status};

/// Run the host session until Ctrl+C.
pub async fn run_host(config: Config) -> anyhow::Result<()> {
    kill_stale_hosts();
    print_banner();

    let host = HostSession::bind(&config, Box::new(SystemClipboard::new())).await?;

    println!("\x1b[1mListening on:\x1b[0m 127.0.0.1:{}", host.port());
    println!("\x1b[2mPress Ctrl+C to stop.\x1b[0m\n");

    let (mut events, handle) = host.start();

    let mut log = LogBuffer::new();
    log.set_debug(config.debug);

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);
    ctrlc::set_handler(move || {
        let _ = tx.blocking_send(());
    })?;

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                match event {
                    StatusEvent::Status { message, online } => print_status(&message, online),
                    StatusEvent::Log(entry) => log.push(entry),
                }
            }
            _ = rx.recv() => {
                println!("\n\x1b[1;33mShutting down...\x1b[0m");
                break;
            }
        }
    }

    handle.shutdown();
    print_recent_activity(&log);

    Ok(())
}
