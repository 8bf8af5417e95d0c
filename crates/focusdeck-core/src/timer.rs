//! Session timer implementation.
//!
//! The timer is a wall-clock-based state machine. It owns at most one
//! in-flight session and holds no threads - the caller drives every
//! transition.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> PendingReview --save/discard--> Idle
//! ```
//!
//! While `Running` the (subject, task) pair is immutable: one subject per
//! session is a domain rule, not a UI convenience. `stop` computes the
//! duration and a default focus score; `save` may override the score with an
//! explicit user rating before the session is promoted into the log.
//!
//! Every public command has an `*_at` variant taking an explicit instant so
//! callers (and tests) can drive the machine on simulated time; the plain
//! methods use `Utc::now()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::storage::{Config, Session, GENERAL_TASK};

/// Map a session duration to a default 1-5 focus score.
///
/// Buckets: under 5 minutes scores 1, up to 15 scores 2, up to 30 scores 3,
/// up to 45 scores 4, anything longer scores 5.
pub fn focus_score(minutes: f64) -> u8 {
    if minutes < 5.0 {
        1
    } else if minutes <= 15.0 {
        2
    } else if minutes <= 30.0 {
        3
    } else if minutes <= 45.0 {
        4
    } else {
        5
    }
}

/// A finished-but-unsaved session awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingSession {
    pub subject: String,
    pub task: String,
    pub duration_minutes: f64,
    /// Bucketed default; an explicit rating at save time wins.
    pub default_score: u8,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running {
        subject: String,
        task: String,
        started_at: DateTime<Utc>,
    },
    PendingReview { pending: PendingSession },
}

impl TimerState {
    fn name(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running { .. } => "running",
            TimerState::PendingReview { .. } => "pending review",
        }
    }
}

/// Single-session stopwatch.
///
/// One `Timer` value per user context; there is no process-wide singleton
/// and no support for concurrent sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timer {
    state: TimerState,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            state: TimerState::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TimerState::Idle)
    }

    /// Elapsed minutes of the running session at `now`, if running.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> Option<f64> {
        match &self.state {
            TimerState::Running { started_at, .. } => {
                Some((now - *started_at).num_milliseconds().max(0) as f64 / 60_000.0)
            }
            _ => None,
        }
    }

    /// The unsaved session awaiting review, if any.
    pub fn pending(&self) -> Option<&PendingSession> {
        match &self.state {
            TimerState::PendingReview { pending } => Some(pending),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session against `subject` (and optionally one of its tasks).
    ///
    /// # Errors
    /// `NoSubjectSelected` when the config holds no subjects;
    /// `InvalidTransition` unless the timer is idle.
    pub fn start(
        &mut self,
        config: &Config,
        subject: &str,
        task: Option<&str>,
    ) -> Result<(), TimerError> {
        self.start_at(Utc::now(), config, subject, task)
    }

    pub fn start_at(
        &mut self,
        now: DateTime<Utc>,
        config: &Config,
        subject: &str,
        task: Option<&str>,
    ) -> Result<(), TimerError> {
        if !self.is_idle() {
            return Err(TimerError::InvalidTransition {
                from: self.state.name(),
                action: "start",
            });
        }
        if config.subjects.is_empty() {
            return Err(TimerError::NoSubjectSelected);
        }
        let task = task.unwrap_or(GENERAL_TASK);
        self.state = TimerState::Running {
            subject: subject.to_string(),
            task: task.to_string(),
            started_at: now,
        };
        Ok(())
    }

    /// End the running session and move to review.
    ///
    /// Duration keeps two decimal places and is never floored to zero for a
    /// nonzero elapsed interval: a sub-minute session still records its
    /// fractional minutes.
    pub fn stop(&mut self) -> Result<&PendingSession, TimerError> {
        self.stop_at(Utc::now())
    }

    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<&PendingSession, TimerError> {
        let (subject, task, started_at) = match &self.state {
            TimerState::Running {
                subject,
                task,
                started_at,
            } => (subject.clone(), task.clone(), *started_at),
            other => {
                return Err(TimerError::InvalidTransition {
                    from: other.name(),
                    action: "stop",
                })
            }
        };
        let elapsed_ms = (now - started_at).num_milliseconds().max(0);
        let mut duration_minutes = round2(elapsed_ms as f64 / 60_000.0);
        if elapsed_ms > 0 && duration_minutes == 0.0 {
            duration_minutes = 0.01;
        }
        self.state = TimerState::PendingReview {
            pending: PendingSession {
                subject,
                task,
                duration_minutes,
                default_score: focus_score(duration_minutes),
                ended_at: now,
            },
        };
        match &self.state {
            TimerState::PendingReview { pending } => Ok(pending),
            _ => unreachable!(),
        }
    }

    /// Promote the pending session to a permanent [`Session`], returning it
    /// for the caller to append to the log. An explicit `score` (clamped to
    /// 1-5) overrides the bucketed default.
    pub fn save(&mut self, score: Option<u8>) -> Result<Session, TimerError> {
        let pending = match &self.state {
            TimerState::PendingReview { pending } => pending.clone(),
            other => {
                return Err(TimerError::InvalidTransition {
                    from: other.name(),
                    action: "save",
                })
            }
        };
        let focus_score = score
            .map(|s| s.clamp(1, 5))
            .unwrap_or(pending.default_score);
        self.state = TimerState::Idle;
        Ok(Session {
            timestamp: pending.ended_at,
            subject: pending.subject,
            task: pending.task,
            duration_minutes: pending.duration_minutes,
            focus_score,
        })
    }

    /// Drop the pending session without writing anything.
    pub fn discard(&mut self) -> Result<(), TimerError> {
        match &self.state {
            TimerState::PendingReview { .. } => {
                self.state = TimerState::Idle;
                Ok(())
            }
            other => Err(TimerError::InvalidTransition {
                from: other.name(),
                action: "discard",
            }),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
