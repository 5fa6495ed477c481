use bandplan_core::weights::CompletionStats;
use bandplan_core::{Config, DailySchedule, DayKind, SessionStore, Skill};
use clap::Subcommand;
use serde::Serialize;

use super::{load_session, recalculate, today, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show upcoming days of the timetable
    Show {
        /// Number of days (default from config `upcoming_days`)
        #[arg(long)]
        days: Option<usize>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Regenerate the timetable from today using the completion history
    Recalculate,
    /// Show the skill weights the next regeneration would use
    Weights {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct WeightRow {
    skill: Skill,
    weight: f64,
    seen: u32,
    completed: u32,
    struggle_factor: f64,
}

pub fn run(action: PlanAction) -> CliResult {
    let store = SessionStore::open_default()?;
    let mut session = load_session(&store)?;
    let today = today();

    match action {
        PlanAction::Show { days, json } => {
            let config = Config::load_or_default();
            let days = days.unwrap_or(config.upcoming_days);
            let upcoming = session.upcoming(today, days);

            if json {
                println!("{}", serde_json::to_string_pretty(upcoming)?);
            } else if upcoming.is_empty() {
                if session.generated_on.map_or(true, |d| d < today) {
                    println!("No upcoming days. Run `bandplan plan recalculate` to regenerate.");
                } else {
                    println!("No upcoming days before the exam.");
                }
            } else {
                for day in upcoming {
                    print_day(day);
                }
            }
        }
        PlanAction::Recalculate => {
            let config = Config::load()?;
            let catalog = config.catalog()?;
            recalculate(&mut session, &config, &catalog);
            store.save(&session)?;
            println!(
                "Timetable regenerated: {} days, {} tasks",
                session.timetable.len(),
                session
                    .timetable
                    .iter()
                    .map(|d| d.tasks.len())
                    .sum::<usize>()
            );
        }
        PlanAction::Weights { json } => {
            let history = session.history(today);
            let stats = CompletionStats::from_history(&history);
            let weights = session.weights(today);
            let rows: Vec<WeightRow> = Skill::ALL
                .into_iter()
                .map(|skill| {
                    let tally = stats.tally(skill);
                    WeightRow {
                        skill,
                        weight: weights.get(skill),
                        seen: tally.seen,
                        completed: tally.completed,
                        struggle_factor: stats.struggle_factor(skill),
                    }
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!(
                    "{:<10} {:>7} {:>5} {:>9} {:>8}",
                    "Skill", "Weight", "Seen", "Completed", "Struggle"
                );
                for row in rows {
                    println!(
                        "{:<10} {:>7.3} {:>5} {:>9} {:>8.2}",
                        row.skill.as_str(),
                        row.weight,
                        row.seen,
                        row.completed,
                        row.struggle_factor
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_day(day: &DailySchedule) {
    let label = match day.kind() {
        DayKind::Rest => "rest",
        DayKind::Study => "study",
        DayKind::Review => "review",
        DayKind::MockTest => "mock test",
    };
    println!(
        "{} {}  [{label}] {:.1}h",
        day.date,
        day.date.format("%a"),
        day.total_hours()
    );
    for task in &day.tasks {
        let mark = if task.is_completed { "x" } else { " " };
        println!(
            "  [{mark}] {:<24} {:<10} {:>4.1}h  {}",
            task.id,
            task.skill.as_str(),
            task.duration_hours,
            task.description
        );
        if let Some(guide) = &task.study_guide {
            println!("      {guide}");
        }
        if let Some(link) = &task.resource_link {
            println!("      {link}");
        }
    }
}
