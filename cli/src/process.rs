//! Process management utilities.

use std::process::Command;

/// Kill any previously running clipbridge host.
///
/// The relay uses one fixed port, so a stale host left over from an
/// earlier session would make the bind fail.
pub fn kill_stale_hosts() {
    let my_pid = std::process::id();

    if let Ok(output) = Command::new("pgrep").args(["-f", "clipbridge host"]).output() {
        let pids = String::from_utf8_lossy(&output.stdout);
        for pid_str in pids.lines() {
            if let Ok(pid) = pid_str.trim().parse::<u32>() {
                if pid != my_pid {
                    let _ = Command::new("kill").args(["-9", &pid.to_string()]).output();
                }
            }
        }
    }

    // Brief pause to let the OS release the port
    std::thread::sleep(std::time::Duration::from_millis(100));
}
