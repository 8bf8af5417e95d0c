mod config;
pub mod log;

pub use config::{Config, ConfigStore, Subject, Task, DEFAULT_THEME_COLOR};
pub use log::{RenameField, Session, SessionLog, GENERAL_TASK};

use std::path::PathBuf;

/// Returns `~/.config/focusdeck[-dev]/` based on FOCUSDECK_ENV.
///
/// Set FOCUSDECK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusdeck-dev")
    } else {
        base_dir.join("focusdeck")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write `content` to `path` via a temp file in the same directory followed
/// by a rename, so a crash mid-write never leaves a half-written file at
/// `path`. Used by every persisted store in this crate.
pub fn atomic_write(path: &std::path::Path, content: &str) -> Result<(), std::io::Error> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
