//! UI utilities for terminal output.

mod banner;

pub use banner::print_banner;

use clipbridge_core::LogBuffer;

/// Print a connection status line with an online/offline indicator.
pub fn print_status(message: &str, online: bool) {
    let indicator = if online {
        "\x1b[1;32m⬤\x1b[0m"
    } else {
        "\x1b[1;31m⬤\x1b[0m"
    };
    println!("{indicator} {message}");
}

/// Dump the buffered log entries, newest first.
pub fn print_recent_activity(log: &LogBuffer) {
    if log.is_empty() {
        return;
    }

    println!("\n\x1b[1mRecent activity:\x1b[0m");
    for entry in log.entries() {
        println!("  \x1b[2m{}\x1b[0m {}", entry.time(), entry.message);
    }
}
