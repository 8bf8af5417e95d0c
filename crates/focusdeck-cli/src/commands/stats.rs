use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use focusdeck_core::{goal, report, Window};

use super::open_stores;

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Today,
    Week,
    Month,
    Year,
}

impl From<WindowArg> for Window {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Today => Window::Today,
            WindowArg::Week => Window::Week,
            WindowArg::Month => Window::Month,
            WindowArg::Year => Window::Year,
        }
    }
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, active subjects and mean focus for a window
    Summary {
        #[arg(long, value_enum, default_value = "today")]
        window: WindowArg,
    },
    /// Subject with the most logged time in a window
    Top {
        #[arg(long, value_enum, default_value = "today")]
        window: WindowArg,
    },
    /// Growth of a window against its predecessor
    Compare {
        #[arg(long, value_enum, default_value = "week")]
        window: WindowArg,
    },
    /// Goal progress per subject (and per task) in a window
    Progress {
        /// Restrict to one subject
        subject: Option<String>,
        #[arg(long, value_enum, default_value = "week")]
        window: WindowArg,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, log) = open_stores()?;
    let now = Utc::now();

    match action {
        StatsAction::Summary { window } => {
            let window: Window = window.into();
            let (start, end) = window.range(now);
            let sessions = log.query_range(start, end)?;
            let summary = report::summarize(&sessions);
            let out = serde_json::json!({
                "window": window,
                "summary": summary,
                "gauge_max_hours": window.gauge_max_hours(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Top { window } => {
            let (start, end) = Window::from(window).range(now);
            let sessions = log.query_range(start, end)?;
            match report::top_subject(&sessions) {
                Ok(name) => println!("{name}"),
                Err(_) => println!("None"),
            }
        }
        StatsAction::Compare { window } => {
            let window: Window = window.into();
            let (start, end) = window.range(now);
            let (prev_start, prev_end) = window.previous_range(now);
            let comparison = report::compare(
                &log.query_range(start, end)?,
                &log.query_range(prev_start, prev_end)?,
            );
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        StatsAction::Progress { subject, window } => {
            let (start, end) = Window::from(window).range(now);
            let sessions = log.query_range(start, end)?;
            let mut out = Vec::new();
            for (name, subj) in &config.config().subjects {
                if let Some(only) = &subject {
                    if only != name {
                        continue;
                    }
                }
                let tasks: serde_json::Map<String, serde_json::Value> = subj
                    .children
                    .iter()
                    .map(|(task_name, task)| {
                        let p = goal::task_progress(name, task_name, task, &sessions);
                        (task_name.clone(), serde_json::json!(p))
                    })
                    .collect();
                out.push(serde_json::json!({
                    "subject": name,
                    "progress": goal::progress(name, subj, &sessions),
                    "tasks": tasks,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
