//! Info command implementation.

use clipbridge_core::protocol::constants::PROTOCOL_VERSION;
use clipbridge_core::Config;

/// Display protocol and endpoint information.
pub fn show_info(config: &Config) {
    println!("\n\x1b[1mClipbridge Info\x1b[0m");
    println!("═══════════════════════════════════════");
    println!("\x1b[1mProtocol version:\x1b[0m {}", PROTOCOL_VERSION);
    println!("\x1b[1mEndpoint:\x1b[0m         127.0.0.1:{}", config.port);
    println!("\x1b[1mRetry delay:\x1b[0m      {:?}", config.retry_delay);
    println!();
}
