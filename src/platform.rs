//! Host desktop integration.

use std::{
    io,
    path::Path,
    process::{Child, Command},
};

/// Program that shows a directory in the host's file browser.
pub fn file_browser_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn spawn_file_browser(directory: &Path) -> io::Result<Child> {
    Command::new(file_browser_command()).arg(directory).spawn()
}

/// Show `directory` in the file browser without waiting for it.
///
/// Best effort: headless machines and missing launchers are only logged.
pub fn open_in_file_browser(directory: &Path) {
    match spawn_file_browser(directory) {
        Ok(_) => log::debug!(
            "Opened {} with {}",
            directory.display(),
            file_browser_command()
        ),
        Err(error) => log::warn!(
            "Could not open {} in the file browser ({}): {error}",
            directory.display(),
            file_browser_command()
        ),
    }
}
