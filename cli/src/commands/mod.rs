//! CLI command implementations.

mod client;
mod host;
mod info;
mod oneshot;

pub use client::run_client;
pub use host::run_host;
pub use info::show_info;
pub use oneshot::{copy, paste, ping};
