//! Task completion commands for CLI.

use bandplan_core::SessionStore;
use chrono::Utc;
use clap::Subcommand;

use super::{load_session, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Mark a timetable task completed
    Complete {
        /// Task ID (e.g. "Listening-2026-10-15" or "review-2026-10-18")
        id: String,
    },
    /// List completed tasks
    Log {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let store = SessionStore::open_default()?;
    let mut session = load_session(&store)?;

    match action {
        TaskAction::Complete { id } => {
            let task = session.complete_task(&id, Utc::now())?;
            println!(
                "Completed {} ({:.1}h, predicted impact +{:.3})",
                task.id, task.duration_hours, task.predicted_impact
            );
            store.save(&session)?;
        }
        TaskAction::Log { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&session.log)?);
                return Ok(());
            }
            if session.log.is_empty() {
                println!("No completed tasks yet.");
                return Ok(());
            }
            for task in session.log.tasks() {
                let when = task
                    .completed_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{when:<16}  {:<24} {:<10} {:>4.1}h  +{:.3}",
                    task.id,
                    task.skill.as_str(),
                    task.duration_hours,
                    task.predicted_impact
                );
            }
            println!(
                "{} tasks, {:.1}h total",
                session.log.len(),
                session.log.total_hours()
            );
        }
    }
    Ok(())
}
