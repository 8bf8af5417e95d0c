//! Goal progress computation.
//!
//! Pure functions of the config tree and a slice of sessions: no I/O, no
//! clock. Callers pick the session window (usually via [`crate::report::Window`])
//! and pass the filtered slice in.

use serde::Serialize;

use crate::storage::{Session, Subject, Task};

/// Floor applied to targets so a malformed or zero target can never produce
/// a division by zero.
const TARGET_EPSILON: f64 = 0.1;

/// Hours logged against a goal, the goal itself, and the capped percentage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalProgress {
    pub current_hours: f64,
    pub target_hours: f64,
    /// 0-100, capped at 100.
    pub percent: f64,
}

fn progress_of(current_hours: f64, target_hours: f64) -> GoalProgress {
    let target_hours = target_hours.max(TARGET_EPSILON);
    GoalProgress {
        current_hours,
        target_hours,
        percent: (current_hours / target_hours * 100.0).min(100.0),
    }
}

/// Progress toward a subject's effective target over the given sessions.
///
/// `sessions` should already be filtered to the reporting window; matching
/// here is by subject name only.
pub fn progress(name: &str, subject: &Subject, sessions: &[Session]) -> GoalProgress {
    let minutes: f64 = sessions
        .iter()
        .filter(|s| s.subject == name)
        .map(|s| s.duration_minutes)
        .sum();
    progress_of(minutes / 60.0, subject.effective_target())
}

/// Progress toward a single task's target, filtered by subject and task name.
pub fn task_progress(
    subject_name: &str,
    task_name: &str,
    task: &Task,
    sessions: &[Session],
) -> GoalProgress {
    let minutes: f64 = sessions
        .iter()
        .filter(|s| s.subject == subject_name && s.task == task_name)
        .map(|s| s.duration_minutes)
        .sum();
    progress_of(minutes / 60.0, task.target_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn session(subject: &str, task: &str, minutes: f64) -> Session {
        Session {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap(),
            subject: subject.to_string(),
            task: task.to_string(),
            duration_minutes: minutes,
            focus_score: 3,
        }
    }

    fn leaf_subject(target: f64) -> Subject {
        Subject {
            target_hours: target,
            children: BTreeMap::new(),
        }
    }

    #[test]
    fn progress_sums_matching_sessions_only() {
        let sessions = vec![
            session("Engineering", "Algorithms", 90.0),
            session("Engineering", "System Design", 30.0),
            session("Design", "General", 600.0),
        ];
        let p = progress("Engineering", &leaf_subject(10.0), &sessions);
        assert_eq!(p.current_hours, 2.0);
        assert_eq!(p.target_hours, 10.0);
        assert_eq!(p.percent, 20.0);
    }

    #[test]
    fn percent_caps_at_one_hundred() {
        let sessions = vec![session("Design", "General", 600.0)];
        let p = progress("Design", &leaf_subject(5.0), &sessions);
        assert_eq!(p.current_hours, 10.0);
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn zero_target_never_divides_by_zero() {
        let sessions = vec![session("Design", "General", 60.0)];
        let p = progress("Design", &leaf_subject(0.0), &sessions);
        assert_eq!(p.target_hours, 0.1);
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn subject_with_tasks_uses_children_sum() {
        let mut children = BTreeMap::new();
        children.insert("Algorithms".to_string(), Task { target_hours: 6.0 });
        children.insert("System Design".to_string(), Task { target_hours: 4.0 });
        let subject = Subject {
            target_hours: 99.0, // inert once children exist
            children,
        };
        let sessions = vec![session("Engineering", "Algorithms", 300.0)];
        let p = progress("Engineering", &subject, &sessions);
        assert_eq!(p.target_hours, 10.0);
        assert_eq!(p.percent, 50.0);
    }

    #[test]
    fn task_progress_filters_both_names() {
        let sessions = vec![
            session("Engineering", "Algorithms", 120.0),
            session("Engineering", "System Design", 60.0),
            session("Design", "Algorithms", 60.0),
        ];
        let p = task_progress(
            "Engineering",
            "Algorithms",
            &Task { target_hours: 4.0 },
            &sessions,
        );
        assert_eq!(p.current_hours, 2.0);
        assert_eq!(p.percent, 50.0);
    }

    #[test]
    fn empty_window_is_zero_progress() {
        let p = progress("Engineering", &leaf_subject(10.0), &[]);
        assert_eq!(p.current_hours, 0.0);
        assert_eq!(p.percent, 0.0);
    }
}
