//! # FocusDeck Core Library
//!
//! This library provides the core business logic for the FocusDeck study
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any dashboard frontend being a
//! thin presentation layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer**: A wall-clock-based state machine for a single study session
//!   (`Idle -> Running -> PendingReview -> Idle`)
//! - **Storage**: CSV-based session log and TOML-based subject configuration
//! - **Goals**: Progress computation against per-subject/per-task hour targets
//! - **Reports**: Windowed aggregates (today/week/month/year) with
//!   prior-window comparison
//!
//! ## Key Components
//!
//! - [`Timer`]: Core timer state machine
//! - [`ConfigStore`]: Subject/task tree and theme persistence
//! - [`SessionLog`]: Append-only log of completed sessions
//! - [`report::Window`]: Calendar window derivation for reporting

pub mod error;
pub mod goal;
pub mod palette;
pub mod report;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, LogError, ReportError, TimerError};
pub use goal::GoalProgress;
pub use report::{Comparison, Summary, Window};
pub use storage::{Config, ConfigStore, RenameField, Session, SessionLog, Subject, Task};
pub use timer::{Timer, TimerState};
