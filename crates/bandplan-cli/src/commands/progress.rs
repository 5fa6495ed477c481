use bandplan_core::{ProgressReport, SessionStore};

use super::{load_session, today, CliResult};

/// Forecast rows printed in text mode.
const FORECAST_ROWS: usize = 8;

pub fn run(json: bool) -> CliResult {
    let store = SessionStore::open_default()?;
    let session = load_session(&store)?;
    let report = ProgressReport::build(&session.profile, &session.log, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Tasks completed: {}", report.tasks_completed);
    println!("Hours studied:   {:.1}", report.total_hours);
    println!(
        "Band average:    {:.2} now, {:.2} target, +{:.3} predicted so far",
        report.current_average,
        report.target_average,
        report.predicted_gain()
    );

    if !report.hours_by_skill.is_empty() {
        println!();
        println!("Hours by skill:");
        for (skill, hours) in &report.hours_by_skill {
            println!("  {:<10} {hours:>5.1}", skill.as_str());
        }
    }

    println!();
    println!("{:<10} {:>9} {:>7}", "Date", "Projected", "Actual");
    let step = report.forecast.len().div_ceil(FORECAST_ROWS).max(1);
    let last = report.forecast.len().saturating_sub(1);
    for (i, point) in report.forecast.iter().enumerate() {
        if i % step == 0 || i == last {
            println!(
                "{:<10} {:>9.2} {:>7.2}",
                point.date, point.projected, point.actual
            );
        }
    }
    Ok(())
}
