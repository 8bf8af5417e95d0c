use clap::Subcommand;

use super::open_stores;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task under a subject
    Add {
        subject: String,
        name: String,
        #[arg(long)]
        target_hours: f64,
    },
    /// Rename a task, rewriting its historical log rows
    Rename {
        subject: String,
        old: String,
        new: String,
    },
    /// Delete a task (historical sessions are kept under the old name)
    Delete { subject: String, name: String },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, log) = open_stores()?;

    match action {
        TaskAction::Add {
            subject,
            name,
            target_hours,
        } => {
            config.add_task(&subject, &name, target_hours)?;
            eprintln!("Task added: {subject}/{name}");
        }
        TaskAction::Rename { subject, old, new } => {
            config.rename_task(&subject, &old, &new, &log)?;
            eprintln!("Task renamed: {subject}/{old} -> {subject}/{new}");
        }
        TaskAction::Delete { subject, name } => {
            config.delete_task(&subject, &name)?;
            eprintln!("Task deleted: {subject}/{name}");
        }
    }
    Ok(())
}
