use clap::Subcommand;

use super::open_stores;

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject with a target-hours budget
    Add {
        name: String,
        #[arg(long)]
        target_hours: f64,
    },
    /// Rename a subject, rewriting its historical log rows
    Rename { old: String, new: String },
    /// Delete a subject (historical sessions are kept under the old name)
    Delete { name: String },
    /// Print the subject tree with effective targets as JSON
    List,
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, log) = open_stores()?;

    match action {
        SubjectAction::Add { name, target_hours } => {
            config.add_subject(&name, target_hours)?;
            eprintln!("Subject added: {name}");
        }
        SubjectAction::Rename { old, new } => {
            config.rename_subject(&old, &new, &log)?;
            eprintln!("Subject renamed: {old} -> {new}");
        }
        SubjectAction::Delete { name } => {
            config.delete_subject(&name)?;
            eprintln!("Subject deleted: {name}");
        }
        SubjectAction::List => {
            let tree: Vec<serde_json::Value> = config
                .config()
                .subjects
                .iter()
                .map(|(name, subject)| {
                    serde_json::json!({
                        "name": name,
                        "target_hours": subject.target_hours,
                        "effective_target": subject.effective_target(),
                        "tasks": subject.children,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }
    Ok(())
}
