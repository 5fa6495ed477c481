use bandplan_core::profile::{parse_weekday, weekday_name};
use bandplan_core::{
    Availability, Config, LearningStyle, PlanSession, Profile, SessionStore, Skill, SkillScores,
    ValidationError,
};
use chrono::{NaiveDate, Weekday};
use clap::Subcommand;

use super::{load_session, recalculate, today, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create the learner profile and generate the first timetable
    Init {
        /// Current band scores as "listening,reading,writing,speaking"
        #[arg(long)]
        current: String,
        /// Target band scores in the same order
        #[arg(long)]
        target: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam: NaiveDate,
        /// Focus level 1-5
        #[arg(long, default_value = "3")]
        focus: u8,
        /// Visual, auditory, kinesthetic or read/write
        #[arg(long, default_value = "visual")]
        style: LearningStyle,
        /// Weekly availability, repeatable (e.g. "Monday=18-20" or "Sat=8-12,14-18")
        #[arg(long = "available", value_name = "DAY=START-END[,START-END]")]
        available: Vec<String>,
        /// Replace an existing profile and discard its log
        #[arg(long)]
        force: bool,
    },
    /// Show the learner profile
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update one current band score and regenerate the timetable
    SetScore {
        /// Listening, reading, writing or speaking
        skill: Skill,
        /// New band score (0.0-9.0, step 0.5)
        score: f64,
    },
}

pub fn run(action: ProfileAction) -> CliResult {
    let store = SessionStore::open_default()?;

    match action {
        ProfileAction::Init {
            current,
            target,
            exam,
            focus,
            style,
            available,
            force,
        } => {
            if store.exists() && !force {
                return Err("profile already exists, pass --force to replace it".into());
            }

            let mut availability = Availability::new();
            for window in &available {
                let (weekday, boundaries) = parse_availability(window)?;
                availability.set(weekday, boundaries);
            }

            let profile = Profile {
                current_scores: parse_scores("current", &current)?,
                target_scores: parse_scores("target", &target)?,
                exam_date: exam,
                availability,
                focus_level: focus,
                learning_style: style,
            };
            profile.validate()?;

            let config = Config::load()?;
            let catalog = config.catalog()?;
            let mut session = PlanSession::new(profile);
            recalculate(&mut session, &config, &catalog);
            store.save(&session)?;

            println!(
                "Profile created: {} days until exam, {} study days scheduled",
                session.timetable.len(),
                session
                    .timetable
                    .iter()
                    .filter(|d| !d.tasks.is_empty())
                    .count()
            );
        }
        ProfileAction::Show { json } => {
            let session = load_session(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&session.profile)?);
            } else {
                print_profile(&session.profile, today());
            }
        }
        ProfileAction::SetScore { skill, score } => {
            let mut session = load_session(&store)?;
            session.update_score(skill, score)?;

            let config = Config::load()?;
            let catalog = config.catalog()?;
            recalculate(&mut session, &config, &catalog);
            store.save(&session)?;
            println!("{skill} score set to {score:.1}, timetable regenerated");
        }
    }
    Ok(())
}

/// Parse "6,6.5,5.5,6" into scores in listening, reading, writing, speaking order.
fn parse_scores(field: &str, raw: &str) -> Result<SkillScores, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    };

    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("'{}': {e}", part.trim())))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    match values.as_slice() {
        [listening, reading, writing, speaking] => {
            Ok(SkillScores::new(*listening, *reading, *writing, *speaking))
        }
        _ => Err(invalid(format!("expected 4 scores, got {}", values.len()))),
    }
}

/// Parse "Monday=18-20,21-22" into a weekday and its flat hour boundaries.
fn parse_availability(raw: &str) -> Result<(Weekday, Vec<u8>), ValidationError> {
    let invalid = |message: String| ValidationError::InvalidAvailability {
        weekday: raw.to_string(),
        message,
    };

    let (day, windows) = raw
        .split_once('=')
        .ok_or_else(|| invalid("expected DAY=START-END".to_string()))?;
    let weekday =
        parse_weekday(day).ok_or_else(|| ValidationError::UnknownWeekday(day.trim().to_string()))?;

    let mut boundaries = Vec::new();
    for window in windows.split(',').filter(|w| !w.trim().is_empty()) {
        let (start, end) = window
            .split_once('-')
            .ok_or_else(|| invalid(format!("window '{window}' is not START-END")))?;
        for hour in [start, end] {
            let hour = hour
                .trim()
                .parse::<u8>()
                .map_err(|e| invalid(format!("hour '{}': {e}", hour.trim())))?;
            boundaries.push(hour);
        }
    }
    Ok((weekday, boundaries))
}

fn print_profile(profile: &Profile, today: NaiveDate) {
    let days_left = (profile.exam_date - today).num_days();
    println!("Exam date:      {} ({days_left} days left)", profile.exam_date);
    println!("Focus level:    {}", profile.focus_level);
    println!("Learning style: {}", profile.learning_style);
    println!();
    println!("{:<10} {:>7} {:>7} {:>5}", "Skill", "Current", "Target", "Gap");
    for skill in Skill::ALL {
        println!(
            "{:<10} {:>7.1} {:>7.1} {:>5.1}",
            skill.as_str(),
            profile.current_scores.get(skill),
            profile.target_scores.get(skill),
            profile.gap(skill)
        );
    }
    println!();
    println!("Availability ({:.1}h per week):", profile.availability.weekly_hours());
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        let windows: Vec<String> = profile
            .availability
            .boundaries(weekday)
            .chunks_exact(2)
            .map(|pair| format!("{:02}-{:02}", pair[0], pair[1]))
            .collect();
        if windows.is_empty() {
            continue;
        }
        println!(
            "  {:<10} {} ({:.1}h)",
            weekday_name(weekday),
            windows.join(", "),
            profile.availability.hours_on(weekday)
        );
    }
}
