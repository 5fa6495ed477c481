//! Progress metrics over the completed-task log.
//!
//! Produces the numbers behind a progress view: totals, hours per skill and a
//! projected-versus-actual band forecast up to the exam date. Rendering is
//! left to the caller.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::profile::{Profile, TaskSkill};
use crate::task::LearningLog;

/// One point of the band forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Straight line from the current average to the target average
    pub projected: f64,
    /// Current average plus cumulative predicted impact of completed tasks
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub total_hours: f64,
    pub tasks_completed: usize,
    pub current_average: f64,
    pub target_average: f64,
    pub hours_by_skill: BTreeMap<TaskSkill, f64>,
    pub forecast: Vec<ForecastPoint>,
}

impl ProgressReport {
    pub fn build(profile: &Profile, log: &LearningLog, today: NaiveDate) -> Self {
        let current_average = profile.current_scores.average();
        let target_average = profile.target_scores.average();

        let mut hours_by_skill = BTreeMap::new();
        for task in log.tasks() {
            *hours_by_skill.entry(task.skill).or_insert(0.0) += task.duration_hours;
        }

        Self {
            total_hours: log.total_hours(),
            tasks_completed: log.len(),
            current_average,
            target_average,
            hours_by_skill,
            forecast: forecast(profile, log, today, current_average, target_average),
        }
    }

    /// Cumulative predicted gain so far.
    pub fn predicted_gain(&self) -> f64 {
        self.forecast
            .last()
            .map(|p| p.actual - self.current_average)
            .unwrap_or(0.0)
    }
}

fn forecast(
    profile: &Profile,
    log: &LearningLog,
    today: NaiveDate,
    current: f64,
    target: f64,
) -> Vec<ForecastPoint> {
    let span = (profile.exam_date - today).num_days().max(1);

    // Impact completed before today counts from the first point
    let mut cumulative: f64 = log
        .tasks()
        .iter()
        .filter(|t| t.completed_on().is_some_and(|d| d <= today))
        .map(|t| t.predicted_impact)
        .sum();

    (0..=span)
        .map(|i| {
            let date = today + Duration::days(i);
            if i > 0 {
                cumulative += log
                    .tasks()
                    .iter()
                    .filter(|t| t.completed_on() == Some(date))
                    .map(|t| t.predicted_impact)
                    .sum::<f64>();
            }
            ForecastPoint {
                date,
                projected: current + (target - current) * (i as f64 / span as f64),
                actual: current + cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Availability, LearningStyle, SkillScores};
    use crate::task::StudyTask;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn make_profile(days_left: i64) -> Profile {
        Profile {
            current_scores: SkillScores::new(6.0, 6.5, 5.5, 6.0),
            target_scores: SkillScores::new(7.5, 7.5, 7.0, 7.0),
            exam_date: today() + Duration::days(days_left),
            availability: Availability::new(),
            focus_level: 3,
            learning_style: LearningStyle::Kinesthetic,
        }
    }

    fn completed(id: &str, skill: TaskSkill, hours: f64, impact: f64, on: NaiveDate) -> StudyTask {
        let mut task = StudyTask::new(id, skill, "d", hours).with_impact(impact);
        task.mark_completed(Utc.from_utc_datetime(&on.and_hms_opt(19, 0, 0).unwrap()));
        task
    }

    #[test]
    fn test_empty_log() {
        let report = ProgressReport::build(&make_profile(10), &LearningLog::new(), today());
        assert_eq!(report.total_hours, 0.0);
        assert_eq!(report.tasks_completed, 0);
        assert!((report.current_average - 6.0).abs() < 1e-12);
        assert!((report.target_average - 7.25).abs() < 1e-12);
        assert_eq!(report.forecast.len(), 11);
        assert_eq!(report.predicted_gain(), 0.0);
        let last = report.forecast.last().unwrap();
        assert!((last.projected - 7.25).abs() < 1e-12);
    }

    #[test]
    fn test_hours_by_skill_and_totals() {
        let mut log = LearningLog::new();
        log.add_task(completed("a", TaskSkill::Writing, 1.2, 0.01, today()));
        log.add_task(completed("b", TaskSkill::Writing, 0.6, 0.01, today()));
        log.add_task(completed("c", TaskSkill::Review, 2.0, 0.02, today()));

        let report = ProgressReport::build(&make_profile(5), &log, today());
        assert_eq!(report.tasks_completed, 3);
        assert!((report.total_hours - 3.8).abs() < 1e-9);
        assert!((report.hours_by_skill[&TaskSkill::Writing] - 1.8).abs() < 1e-9);
        assert_eq!(report.hours_by_skill[&TaskSkill::Review], 2.0);
        assert!(!report.hours_by_skill.contains_key(&TaskSkill::Speaking));
    }

    #[test]
    fn test_actual_curve_accumulates_by_completion_date() {
        let mut log = LearningLog::new();
        log.add_task(completed("past", TaskSkill::Reading, 1.0, 0.05, today() - Duration::days(2)));
        log.add_task(completed("later", TaskSkill::Reading, 1.0, 0.1, today() + Duration::days(2)));

        let report = ProgressReport::build(&make_profile(4), &log, today());
        let actual: Vec<f64> = report.forecast.iter().map(|p| p.actual - 6.0).collect();
        let expected = [0.05, 0.05, 0.15, 0.15, 0.15];
        for (got, want) in actual.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
        assert!((report.predicted_gain() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_exam_passed_still_has_one_step() {
        let report = ProgressReport::build(&make_profile(-3), &LearningLog::new(), today());
        assert_eq!(report.forecast.len(), 2);
    }
}
