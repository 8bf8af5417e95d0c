//! Core error types for focusdeck-core.
//!
//! Every failure in this library is recoverable: operations return one of
//! these typed errors to the caller, which decides how to surface it. No
//! operation is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session log errors
    #[error("Session log error: {0}")]
    Log(#[from] LogError),

    /// Timer state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Reporting errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A subject or task with this name already exists
    #[error("Name already in use: '{name}'")]
    DuplicateName { name: String },

    /// Referenced subject does not exist in the tree
    #[error("Unknown subject: '{name}'")]
    UnknownSubject { name: String },

    /// Referenced task does not exist under the given subject
    #[error("Unknown task '{name}' under subject '{subject}'")]
    UnknownTask { subject: String, name: String },

    /// Persisted config exists but cannot be parsed
    #[error("Corrupt configuration at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Rejected value (empty name, non-positive target, ...)
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Failed to read or write the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the config tree
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Session log errors.
///
/// A missing log file is not an error: reads treat it as empty and the
/// first append creates it.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timer state machine errors.
#[derive(Error, Debug)]
pub enum TimerError {
    /// Cannot start a session while the subject tree is empty
    #[error("No subject selected: configure at least one subject first")]
    NoSubjectSelected,

    /// Action is not legal in the current state
    #[error("Cannot {action} while timer is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

/// Reporting errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// No sessions in the requested window
    #[error("No session data in the requested window")]
    NoData,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
