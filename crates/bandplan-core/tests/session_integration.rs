//! Integration tests for the plan session lifecycle: generate, complete,
//! persist, recalculate, report.

use bandplan_core::{
    Availability, Config, LearningStyle, PlanSession, Profile, ProgressReport, SessionStore,
    Skill, SkillScores, TaskSkill, TimetableGenerator,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc, Weekday};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

fn weekday_evenings() -> Availability {
    let mut availability = Availability::new();
    for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri] {
        availability.add_window(day, 18, 22);
    }
    availability
}

fn make_profile() -> Profile {
    Profile {
        current_scores: SkillScores::new(6.0, 6.0, 6.0, 6.0),
        target_scores: SkillScores::new(7.0, 7.0, 7.0, 7.0),
        exam_date: monday() + Duration::days(21),
        availability: weekday_evenings(),
        focus_level: 5,
        learning_style: LearningStyle::Visual,
    }
}

#[test]
fn test_full_session_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));
    let config = Config::default();
    let catalog = config.catalog().unwrap();
    let generator = TimetableGenerator::with_config(&catalog, config.planner.clone());
    let mut rng = Pcg64::seed_from_u64(123);

    let profile = make_profile();
    profile.validate().unwrap();
    let mut session = PlanSession::new(profile);
    session.recalculate(&generator, monday(), &mut rng);
    assert_eq!(session.timetable.len(), 21);
    store.save(&session).unwrap();

    // Monday: complete everything but speaking
    let mut session = store.load().unwrap().unwrap();
    let evening = Utc.from_utc_datetime(&monday().and_hms_opt(21, 0, 0).unwrap());
    for skill in ["Listening", "Reading", "Writing"] {
        session
            .complete_task(&format!("{skill}-2026-10-12"), evening)
            .unwrap();
    }
    store.save(&session).unwrap();

    // Tuesday: recalculation sees speaking as missed
    let tuesday = monday() + Duration::days(1);
    let mut session = store.load().unwrap().unwrap();
    assert_eq!(session.log.len(), 3);
    let weights = session.weights(tuesday);
    assert!(weights.get(Skill::Speaking) > weights.get(Skill::Reading));

    session.recalculate(&generator, tuesday, &mut rng);
    assert_eq!(session.timetable.len(), 20);
    assert_eq!(session.timetable[0].date, tuesday);
    let speaking = session.timetable[0]
        .tasks
        .iter()
        .find(|t| t.skill == TaskSkill::Speaking)
        .unwrap();
    assert!(speaking.duration_hours > 1.0);

    // The log survives recalculation
    assert_eq!(session.log.len(), 3);
    assert!(session.log.contains("Writing-2026-10-12"));

    let report = ProgressReport::build(&session.profile, &session.log, tuesday);
    assert_eq!(report.tasks_completed, 3);
    assert!((report.total_hours - 3.0).abs() < 1e-9);
    // 3 hours at focus 5: 3 * 0.01 * 1.5
    assert!((report.predicted_gain() - 0.045).abs() < 1e-9);
    assert_eq!(report.forecast.len(), 21);
}

#[test]
fn test_score_update_then_recalculate() {
    let catalog = Config::default().catalog().unwrap();
    let generator = TimetableGenerator::new(&catalog);
    let mut session = PlanSession::new(make_profile());
    session.recalculate(&generator, monday(), &mut Pcg64::seed_from_u64(5));

    // Listening reaches target: no more listening tasks
    session.update_score(Skill::Listening, 7.0).unwrap();
    session.recalculate(&generator, monday(), &mut Pcg64::seed_from_u64(5));
    assert!(session
        .timetable
        .iter()
        .flat_map(|d| d.tasks.iter())
        .all(|t| t.skill != TaskSkill::Listening));
}
