use chrono::Utc;
use clap::Subcommand;
use focusdeck_core::storage::{atomic_write, data_dir};
use focusdeck_core::{Timer, TimerState};
use std::path::Path;

use super::open_stores;

const TIMER_FILE: &str = "timer.json";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a session against a subject (and optionally one of its tasks)
    Start {
        subject: String,
        /// Task under the subject; defaults to the "General" sentinel
        #[arg(long)]
        task: Option<String>,
    },
    /// End the running session and move it to review
    Stop,
    /// Save the reviewed session to the log
    Save {
        /// Explicit 1-5 focus rating; omits to keep the bucketed default
        #[arg(long)]
        score: Option<u8>,
    },
    /// Drop the pending session without logging it
    Discard,
    /// Print current timer state as JSON
    Status,
}

fn load_timer_at(dir: &Path) -> Timer {
    match std::fs::read_to_string(dir.join(TIMER_FILE)) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|_| Timer::new()),
        Err(_) => Timer::new(),
    }
}

fn load_timer() -> Timer {
    match data_dir() {
        Ok(dir) => load_timer_at(&dir),
        Err(_) => Timer::new(),
    }
}

/// Persist the timer between invocations. Goes through the same
/// temp-then-rename write as the other stores, so a crash mid-write cannot
/// corrupt a pending session.
fn save_timer_at(dir: &Path, timer: &Timer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(timer)?;
    atomic_write(&dir.join(TIMER_FILE), &json)?;
    Ok(())
}

fn save_timer(timer: &Timer) -> Result<(), Box<dyn std::error::Error>> {
    save_timer_at(&data_dir()?, timer)
}

fn print_status(timer: &Timer) -> Result<(), Box<dyn std::error::Error>> {
    let elapsed = timer.elapsed_minutes(Utc::now());
    let status = serde_json::json!({
        "timer": timer.state(),
        "elapsed_minutes": elapsed,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = load_timer();

    match action {
        TimerAction::Start { subject, task } => {
            let (config, _) = open_stores()?;
            timer.start(config.config(), &subject, task.as_deref())?;
            save_timer(&timer)?;
            print_status(&timer)?;
        }
        TimerAction::Stop => {
            timer.stop()?;
            save_timer(&timer)?;
            print_status(&timer)?;
        }
        TimerAction::Save { score } => {
            let (_, log) = open_stores()?;
            let session = timer.save(score)?;
            log.append(&session)?;
            save_timer(&timer)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        TimerAction::Discard => {
            timer.discard()?;
            save_timer(&timer)?;
            print_status(&timer)?;
        }
        TimerAction::Status => {
            if let TimerState::PendingReview { pending } = timer.state() {
                println!("{}", serde_json::to_string_pretty(pending)?);
            } else {
                print_status(&timer)?;
            }
        }
    }
    Ok(())
}
