//! Client daemon command implementation.

use clipbridge_core::{ClientSession, Config, LogBuffer, StatusEvent, SystemClipboard, SystemLauncher};

use crate::ui::{print_banner, print_recent_activity, print_status};

/// Run the client session until Ctrl+C.
pub async fn run_client(config: Config) -> anyhow::Result<()> {
    print_banner();

    let session = ClientSession::new(
        &config,
        Box::new(SystemClipboard::new()),
        Box::new(SystemLauncher::new()),
    );
    let (mut events, handle) = session.start();

    println!("\x1b[1mConnecting to:\x1b[0m 127.0.0.1:{}", config.port);
    println!("\x1b[2mPress Ctrl+C to stop.\x1b[0m\n");

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
