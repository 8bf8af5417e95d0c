//! CSV-based session log.
//!
//! An append-only flat file of completed study sessions, one row each:
//!
//! ```text
//! timestamp,parent_subject,child_subject,duration_minutes,focus_score
//! ```
//!
//! The file is created with its header on first append; reads treat a
//! missing file as an empty log. Rows are immutable once written, with one
//! deliberate exception: [`SessionLog::rename_references`] rewrites names in
//! historical rows so charts stay consistent after a subject or task rename.
//!
//! Reads are lenient: a malformed numeric field is coerced to 0 instead of
//! failing the whole read, so a single bad row cannot take down the
//! dashboard. Rows with an unparseable timestamp are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{atomic_write, data_dir};
use crate::error::LogError;

/// Task-name sentinel for sessions logged against a subject with no tasks.
pub const GENERAL_TASK: &str = "General";

const HEADER: &str = "timestamp,parent_subject,child_subject,duration_minutes,focus_score";

/// One completed, timed study interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Instant the session ended.
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub task: String,
    /// Fractional minutes, two decimal places.
    pub duration_minutes: f64,
    /// 1-5, user-supplied or bucketed from duration.
    pub focus_score: u8,
}

/// Which log column a rename cascade targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameField {
    Subject,
    Task,
}

/// Append-only store of completed sessions.
///
/// Holds only the file path; every operation opens, reads or appends, and
/// closes. Reads are restartable and side-effect free.
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Open the log at `~/.config/focusdeck/learning_logs.csv`.
    pub fn open() -> Result<Self, LogError> {
        Ok(Self::open_at(data_dir()?.join("learning_logs.csv")))
    }

    /// Open the log at an explicit path. The file is not touched until the
    /// first append.
    pub fn open_at(path: PathBuf) -> Self {
        SessionLog { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one session, creating the file with its header first if
    /// needed. The row is flushed before this returns.
    pub fn append(&self, session: &Session) -> Result<(), LogError> {
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(file, "{}", encode_row(session))?;
        file.flush()?;
        Ok(())
    }

    /// Rewrite `old` to `new` in the given column of every historical row.
    /// Returns the number of rows changed. A no-op when the names are equal
    /// or the file does not exist yet; idempotent.
    ///
    /// This is the only mutation of existing rows the log supports, used as
    /// a cascade from config renames. The rewrite goes through a temp file
    /// and a rename, so a crash leaves either the old log or the new one.
    pub fn rename_references(
        &self,
        field: RenameField,
        old: &str,
        new: &str,
    ) -> Result<usize, LogError> {
        if old == new || !self.path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let mut changed = 0;
        let mut out = String::with_capacity(content.len());
        out.push_str(HEADER);
        out.push('\n');
        for line in content.lines().skip(1) {
            if line.is_empty() {
                continue;
            }
            let mut fields = split_row(line);
            let idx = match field {
                RenameField::Subject => 1,
                RenameField::Task => 2,
            };
            if fields.len() == 5 && fields[idx] == old {
                fields[idx] = new.to_string();
                changed += 1;
                out.push_str(&join_row(&fields));
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
        if changed > 0 {
            atomic_write(&self.path, &out)?;
        }
        Ok(changed)
    }

    /// The full session sequence in file order. Missing file reads as empty.
    pub fn all(&self) -> Result<Vec<Session>, LogError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(content
            .lines()
            .skip(1)
            .filter(|l| !l.is_empty())
            .filter_map(decode_row)
            .collect())
    }

    /// Sessions with `timestamp` in the half-open window `[start, end)`.
    pub fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, LogError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|s| s.timestamp >= start && s.timestamp < end)
            .collect())
    }
}

fn encode_row(session: &Session) -> String {
    join_row(&[
        session.timestamp.to_rfc3339(),
        session.subject.clone(),
        session.task.clone(),
        format!("{:.2}", session.duration_minutes),
        session.focus_score.to_string(),
    ])
}

fn decode_row(line: &str) -> Option<Session> {
    let fields = split_row(line);
    if fields.len() != 5 {
        return None;
    }
    let timestamp = DateTime::parse_from_rfc3339(&fields[0])
        .ok()?
        .with_timezone(&Utc);
    Some(Session {
        timestamp,
        subject: fields[1].clone(),
        task: fields[2].clone(),
        // Lenient-parsing policy: bad numerics become 0, not an error.
        duration_minutes: fields[3].parse().unwrap_or(0.0),
        focus_score: fields[4].parse().unwrap_or(0),
    })
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV line, honoring quoted fields with doubled inner quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
