//! URL-open capability
//!
//! The client side of the relay can be asked to open a URL on behalf of the
//! sandboxed peer (`U` frames). Only http and https URLs are accepted; the
//! payload comes from the other end of an unauthenticated socket, so schemes
//! like `javascript:` or `file:` are refused outright.

use url::Url;

use crate::{Error, Result};

/// Capability to open a URL in the local environment
pub trait UrlLauncher: Send {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform handler after validating the scheme
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlLauncher for SystemLauncher {
    fn open(&mut self, url: &str) -> Result<()> {
        let parsed = validate(url)?;

        opener_command(parsed.as_str())
            .spawn()
            .map_err(|e| Error::Launcher(format!("{}: {e}", parsed)))?;

        Ok(())
    }
}

/// Parse and check the URL; only http/https pass.
pub fn validate(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::Launcher(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::Launcher(format!(
            "refusing to open {scheme:?} URL"
        ))),
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("xdg-open");
    command.arg(url);
    command
}
