//! Opening the finished image in the platform's default viewer.

use std::{path::Path, process::Command};

/// Hand `path` to the default viewer without waiting for it. Failing to open a
/// viewer is not an error: the image has already been written.
pub fn show(path: &Path) {
    match viewer_command(path).spawn() {
        Ok(_) => tracing::info!("Opened {} in the default viewer", path.display()),
        Err(e) => tracing::warn!("Could not open {}: {e}", path.display()),
    }
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    // The empty argument is the window title `start` expects before a quoted path.
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
