//! Windowed session reporting.
//!
//! Aggregates a slice of sessions into the summary numbers the dashboard
//! shows: totals, top subject, average focus, and growth against the
//! immediately preceding window. Window derivation is a pure function of a
//! reference instant - weeks start Monday, months and years sit on calendar
//! boundaries, and every window is half-open `[start, end)`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ReportError;
use crate::storage::Session;

/// Reporting window kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Today,
    Week,
    Month,
    Year,
}

impl Window {
    /// The half-open `[start, end)` window containing `now`.
    pub fn range(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let day = day_start(now);
        match self {
            Window::Today => (day, day + Duration::days(1)),
            Window::Week => {
                let start = day - Duration::days(now.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(7))
            }
            Window::Month => {
                let start = month_start(now.year(), now.month());
                (start, next_month_start(now.year(), now.month()))
            }
            Window::Year => (year_start(now.year()), year_start(now.year() + 1)),
        }
    }

    /// The window of equal kind immediately preceding [`range`](Self::range):
    /// yesterday, last week, the prior calendar month, the prior year.
    pub fn previous_range(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let (start, _) = self.range(now);
        match self {
            Window::Today => (start - Duration::days(1), start),
            Window::Week => (start - Duration::days(7), start),
            Window::Month => {
                let prev = start.date_naive() - Duration::days(1);
                (month_start(prev.year(), prev.month()), start)
            }
            Window::Year => (year_start(now.year() - 1), start),
        }
    }

    /// Display ceiling for the progress gauge, in hours.
    pub fn gauge_max_hours(self) -> f64 {
        match self {
            Window::Today => 6.0,
            Window::Week => 40.0,
            Window::Month => 160.0,
            Window::Year => 1800.0,
        }
    }
}

fn day_start(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    // Valid by construction: day 1 exists in every month.
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn next_month_start(year: i32, month: u32) -> DateTime<Utc> {
    if month == 12 {
        month_start(year + 1, 1)
    } else {
        month_start(year, month + 1)
    }
}

fn year_start(year: i32) -> DateTime<Utc> {
    month_start(year, 1)
}

/// Headline numbers for one window of sessions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub total_hours: f64,
    pub active_subject_count: usize,
    pub average_focus_score: f64,
}

/// Totals, distinct subjects, and mean focus. All zeros on empty input.
pub fn summarize(sessions: &[Session]) -> Summary {
    if sessions.is_empty() {
        return Summary {
            total_hours: 0.0,
            active_subject_count: 0,
            average_focus_score: 0.0,
        };
    }
    let total_minutes: f64 = sessions.iter().map(|s| s.duration_minutes).sum();
    let subjects: std::collections::BTreeSet<&str> =
        sessions.iter().map(|s| s.subject.as_str()).collect();
    let score_sum: u64 = sessions.iter().map(|s| s.focus_score as u64).sum();
    Summary {
        total_hours: total_minutes / 60.0,
        active_subject_count: subjects.len(),
        average_focus_score: score_sum as f64 / sessions.len() as f64,
    }
}

/// The subject with the largest summed duration.
///
/// # Errors
/// `NoData` on empty input; the caller decides between an error and a
/// placeholder.
pub fn top_subject(sessions: &[Session]) -> Result<String, ReportError> {
    let mut by_subject: BTreeMap<&str, f64> = BTreeMap::new();
    for s in sessions {
        *by_subject.entry(s.subject.as_str()).or_insert(0.0) += s.duration_minutes;
    }
    by_subject
        .into_iter()
        // Strictly-greater keeps the first (alphabetical) subject on ties.
        .fold(None::<(&str, f64)>, |best, (name, minutes)| match best {
            Some((_, top)) if minutes <= top => best,
            _ => Some((name, minutes)),
        })
        .map(|(name, _)| name.to_string())
        .ok_or(ReportError::NoData)
}

/// Growth of the current window against the previous one.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Comparison {
    pub current_hours: f64,
    pub previous_hours: f64,
    /// Percent change; with an empty previous window this is 100 when any
    /// current hours exist, 0 otherwise. Never NaN.
    pub percent_growth: f64,
}

pub fn compare(current: &[Session], previous: &[Session]) -> Comparison {
    let current_hours: f64 = current.iter().map(|s| s.duration_minutes).sum::<f64>() / 60.0;
    let previous_hours: f64 = previous.iter().map(|s| s.duration_minutes).sum::<f64>() / 60.0;
    let percent_growth = if previous_hours > 0.0 {
        (current_hours - previous_hours) / previous_hours * 100.0
    } else if current_hours > 0.0 {
        100.0
    } else {
        0.0
    };
    Comparison {
        current_hours,
        previous_hours,
        percent_growth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn session(ts: DateTime<Utc>, subject: &str, minutes: f64, score: u8) -> Session {
        Session {
            timestamp: ts,
            subject: subject.to_string(),
            task: "General".to_string(),
            duration_minutes: minutes,
            focus_score: score,
        }
    }

    #[test]
    fn today_window_is_midnight_to_midnight() {
        let now = at(2026, 3, 10, 15); // a Tuesday
        let (start, end) = Window::Today.range(now);
        assert_eq!(start, at(2026, 3, 10, 0));
        assert_eq!(end, at(2026, 3, 11, 0));

        let (pstart, pend) = Window::Today.previous_range(now);
        assert_eq!(pstart, at(2026, 3, 9, 0));
        assert_eq!(pend, start);
    }

    #[test]
    fn week_starts_monday() {
        let now = at(2026, 3, 12, 8); // Thursday
        let (start, end) = Window::Week.range(now);
        assert_eq!(start, at(2026, 3, 9, 0)); // Monday the 9th
        assert_eq!(end, at(2026, 3, 16, 0));

        // A Monday is its own week start.
        let (mstart, _) = Window::Week.range(at(2026, 3, 9, 0));
        assert_eq!(mstart, at(2026, 3, 9, 0));
    }

    #[test]
    fn month_and_year_use_calendar_boundaries() {
        let now = at(2026, 1, 20, 12);
        let (mstart, mend) = Window::Month.range(now);
        assert_eq!(mstart, at(2026, 1, 1, 0));
        assert_eq!(mend, at(2026, 2, 1, 0));

        // Previous month crosses the year boundary.
        let (pstart, pend) = Window::Month.previous_range(now);
        assert_eq!(pstart, at(2025, 12, 1, 0));
        assert_eq!(pend, mstart);

        let (ystart, yend) = Window::Year.range(now);
        assert_eq!(ystart, at(2026, 1, 1, 0));
        assert_eq!(yend, at(2027, 1, 1, 0));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let now = at(2026, 12, 5, 10);
        let (_, mend) = Window::Month.range(now);
        assert_eq!(mend, at(2027, 1, 1, 0));
    }

    #[test]
    fn window_and_previous_are_adjacent_and_disjoint() {
        let now = at(2026, 3, 12, 8);
        for window in [Window::Today, Window::Week, Window::Month, Window::Year] {
            let (start, _) = window.range(now);
            let (pstart, pend) = window.previous_range(now);
            assert_eq!(pend, start);
            assert!(pstart < pend);
        }
    }

    #[test]
    fn summarize_empty_is_all_zeros() {
        let s = summarize(&[]);
        assert_eq!(s.total_hours, 0.0);
        assert_eq!(s.active_subject_count, 0);
        assert_eq!(s.average_focus_score, 0.0);
    }

    #[test]
    fn summarize_counts_distinct_subjects() {
        let now = at(2026, 3, 10, 9);
        let sessions = vec![
            session(now, "Engineering", 90.0, 4),
            session(now, "Engineering", 30.0, 2),
            session(now, "Design", 60.0, 3),
        ];
        let s = summarize(&sessions);
        assert_eq!(s.total_hours, 3.0);
        assert_eq!(s.active_subject_count, 2);
        assert_eq!(s.average_focus_score, 3.0);
    }

    #[test]
    fn top_subject_by_summed_duration() {
        let now = at(2026, 3, 10, 9);
        let sessions = vec![
            session(now, "Design", 50.0, 3),
            session(now, "Engineering", 30.0, 3),
            session(now, "Engineering", 30.0, 3),
        ];
        assert_eq!(top_subject(&sessions).unwrap(), "Engineering");
        assert!(matches!(top_subject(&[]), Err(ReportError::NoData)));
    }

    #[test]
    fn compare_handles_zero_previous_without_nan() {
        let now = at(2026, 3, 10, 9);
        let current = vec![session(now, "Design", 300.0, 3)];

        let c = compare(&current, &[]);
        assert_eq!(c.current_hours, 5.0);
        assert_eq!(c.percent_growth, 100.0);

        let empty = compare(&[], &[]);
        assert_eq!(empty.percent_growth, 0.0);
    }

    #[test]
    fn compare_computes_signed_growth() {
        let now = at(2026, 3, 10, 9);
        let current = vec![session(now, "Design", 60.0, 3)];
        let previous = vec![session(now, "Design", 120.0, 3)];
        let c = compare(&current, &previous);
        assert_eq!(c.percent_growth, -50.0);
    }
}
