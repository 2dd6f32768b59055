//! "Open containing folder" through the host platform's file manager.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Openers tried in order on Linux and the BSDs.
const UNIX_OPENERS: &[&str] = &["xdg-open", "gio"];

/// Opens `dir` in the platform file manager.
///
/// The launcher is spawned and not waited on.
pub fn open_folder(dir: &Path) -> Result<(), ShellError> {
    if !dir.is_dir() {
        return Err(ShellError::NotAFolder(dir.to_path_buf()));
    }

    let mut command = opener_command()?;
    command.arg(dir);

    log::info!("[SHELL] Opening {} with {:?}", dir.display(), command.get_program());

    command
        .spawn()
        .map(|_| ())
        .map_err(|e| ShellError::Launch(e.to_string()))
}

#[cfg(target_os = "macos")]
fn opener_command() -> Result<Command, ShellError> {
    Ok(Command::new("open"))
}

#[cfg(target_os = "windows")]
fn opener_command() -> Result<Command, ShellError> {
    Ok(Command::new("explorer"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command() -> Result<Command, ShellError> {
    let program = find_opener(UNIX_OPENERS).ok_or(ShellError::NoOpener)?;
    let mut command = Command::new(&program);
    // gio needs an explicit verb
    if program.file_stem().is_some_and(|s| s == "gio") {
        command.arg("open");
    }
    Ok(command)
}

/// First of `candidates` found on `PATH`.
#[cfg_attr(any(target_os = "macos", target_os = "windows"), allow(dead_code))]
fn find_opener(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| which::which(name).ok())
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{0} is not an existing folder")]
    NotAFolder(PathBuf),

    #[error("No folder opener found (tried {})", UNIX_OPENERS.join(", "))]
    NoOpener,

    #[error("Failed to launch folder opener: {0}")]
    Launch(String),
}
