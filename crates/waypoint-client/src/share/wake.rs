//! Keep the machine awake while sharing.
//!
//! - Linux: holds a `systemd-inhibit` idle/sleep lock.
//! - macOS: runs `caffeinate -i`.
//! - Other platforms: no lock, sharing continues.

use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use super::session::WakeLock;

/// A wake lock held by a helper process. Killing the helper releases it.
pub struct InhibitorLock {
    child: Child,
}

impl InhibitorLock {
    /// Take the platform's idle inhibitor. `None` when the platform has
    /// none or the helper cannot be started.
    pub fn acquire(reason: &str) -> Option<Self> {
        let Some(command) = platform_command(reason) else {
            info!("No wake lock on this platform");
            return None;
        };
        Self::spawn(command)
    }

    /// Hold `command` as the lock. Its stdin is a pipe we close on release.
    pub fn spawn(mut command: Command) -> Option<Self> {
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match command.spawn() {
            Ok(child) => {
                debug!(pid = child.id(), "Wake lock held");
                Some(Self { child })
            }
            Err(e) => {
                warn!(error = %e, "Could not keep the device awake");
                None
            }
        }
    }

    /// Whether the helper process is still running.
    pub fn is_held(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl WakeLock for InhibitorLock {
    fn release(&mut self) {
        drop(self.child.stdin.take());
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "Wake lock helper already gone");
        }
        let _ = self.child.wait();
        debug!("Wake lock released");
    }
}

// `cat` exits when our end of its stdin closes, so the inhibitor also ends
// if this process dies without releasing.
#[cfg(target_os = "linux")]
fn platform_command(reason: &str) -> Option<Command> {
    let mut command = Command::new("systemd-inhibit");
    command
        .arg("--what=idle:sleep")
        .arg("--who=waypoint")
        .arg(format!("--why={reason}"))
        .arg("--mode=block")
        .arg("cat");
    Some(command)
}

#[cfg(target_os = "macos")]
fn platform_command(_reason: &str) -> Option<Command> {
    let mut command = Command::new("caffeinate");
    command
        .arg("-i")
        .arg("-w")
        .arg(std::process::id().to_string());
    Some(command)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn platform_command(_reason: &str) -> Option<Command> {
    None
}
