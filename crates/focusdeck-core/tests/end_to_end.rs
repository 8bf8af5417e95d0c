//! End-to-end flows across the config store, timer, log and reports.

use chrono::{Duration, TimeZone, Utc};
use focusdeck_core::{goal, report, ConfigStore, SessionLog, Timer, Window};
use tempfile::TempDir;

fn stores(dir: &TempDir) -> (ConfigStore, SessionLog) {
    let config = ConfigStore::open_at(dir.path().join("config.toml")).unwrap();
    let log = SessionLog::open_at(dir.path().join("learning_logs.csv"));
    (config, log)
}

#[test]
fn ninety_second_session_lands_in_the_log() {
    let dir = TempDir::new().unwrap();
    let (config, log) = stores(&dir);
    assert!(log.all().unwrap().is_empty());

    let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
    let mut timer = Timer::new();
    timer
        .start_at(t0, config.config(), "Engineering", Some("Algorithms"))
        .unwrap();
    timer.stop_at(t0 + Duration::seconds(90)).unwrap();
    let session = timer.save(None).unwrap();
    log.append(&session).unwrap();

    let rows = log.all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "Engineering");
    assert_eq!(rows[0].task, "Algorithms");
    assert!((rows[0].duration_minutes - 1.5).abs() < 0.01);
    assert_eq!(rows[0].focus_score, 1); // 1.5 min < 5
}

#[test]
fn subject_rename_cascades_into_history() {
    let dir = TempDir::new().unwrap();
    let (mut config, log) = stores(&dir);

    let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
    let mut timer = Timer::new();
    for i in 0..3 {
        timer
            .start_at(
                t0 + Duration::hours(i),
                config.config(),
                "Engineering",
                Some("Algorithms"),
            )
            .unwrap();
        timer
            .stop_at(t0 + Duration::hours(i) + Duration::minutes(20))
            .unwrap();
        log.append(&timer.save(None).unwrap()).unwrap();
    }
    let hours_before: f64 = log.all().unwrap().iter().map(|s| s.duration_minutes).sum();

    config
        .rename_subject("Engineering", "Software", &log)
        .unwrap();

    let rows = log.all().unwrap();
    assert!(rows.iter().all(|s| s.subject == "Software"));
    assert_eq!(rows.iter().filter(|s| s.subject == "Engineering").count(), 0);
    let hours_after: f64 = rows.iter().map(|s| s.duration_minutes).sum();
    assert_eq!(hours_before, hours_after);

    // Config agrees with the log.
    assert!(config.subject("Engineering").is_none());
    assert!(config.subject("Software").is_some());

    // Reopening from disk sees the renamed tree.
    let reopened = ConfigStore::open_at(dir.path().join("config.toml")).unwrap();
    assert!(reopened.subject("Software").is_some());
}

#[test]
fn deleted_task_leaves_history_queryable() {
    let dir = TempDir::new().unwrap();
    let (mut config, log) = stores(&dir);

    let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
    let mut timer = Timer::new();
    timer
        .start_at(t0, config.config(), "Engineering", Some("Algorithms"))
        .unwrap();
    timer.stop_at(t0 + Duration::minutes(30)).unwrap();
    log.append(&timer.save(None).unwrap()).unwrap();

    config.delete_task("Engineering", "Algorithms").unwrap();

    // Gone from goal computation targets...
    let subject = config.subject("Engineering").unwrap();
    assert!(!subject.children.contains_key("Algorithms"));

    // ...but the row is still there, under its original name.
    let rows = log.all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task, "Algorithms");
}

#[test]
fn windowed_report_matches_goal_progress() {
    let dir = TempDir::new().unwrap();
    let (config, log) = stores(&dir);

    let now = Utc.with_ymd_and_hms(2026, 3, 12, 18, 0, 0).unwrap(); // Thursday
    let mut timer = Timer::new();

    // Two sessions this week, one last week.
    for start in [
        now - Duration::hours(2),
        now - Duration::days(1),
        now - Duration::days(8),
    ] {
        timer
            .start_at(start, config.config(), "Engineering", Some("Algorithms"))
            .unwrap();
        timer.stop_at(start + Duration::minutes(60)).unwrap();
        log.append(&timer.save(Some(4)).unwrap()).unwrap();
    }

    let (start, end) = Window::Week.range(now);
    let this_week = log.query_range(start, end).unwrap();
    assert_eq!(this_week.len(), 2);

    let summary = report::summarize(&this_week);
    assert_eq!(summary.total_hours, 2.0);
    assert_eq!(summary.active_subject_count, 1);
    assert_eq!(summary.average_focus_score, 4.0);
    assert_eq!(report::top_subject(&this_week).unwrap(), "Engineering");

    let (prev_start, prev_end) = Window::Week.previous_range(now);
    let last_week = log.query_range(prev_start, prev_end).unwrap();
    let comparison = report::compare(&this_week, &last_week);
    assert_eq!(comparison.current_hours, 2.0);
    assert_eq!(comparison.previous_hours, 1.0);
    assert_eq!(comparison.percent_growth, 100.0);

    // Goal progress over the same window: 2h against the 100h children sum
    // (40 + 60) of the default Engineering subject.
    let subject = config.subject("Engineering").unwrap();
    let progress = goal::progress("Engineering", subject, &this_week);
    assert_eq!(progress.current_hours, 2.0);
    assert_eq!(progress.target_hours, 100.0);
    assert_eq!(progress.percent, 2.0);
}
