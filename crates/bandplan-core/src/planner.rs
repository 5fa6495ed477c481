//! Timetable generator.
//!
//! Walks the dates from today up to (not including) the exam date and decides
//! for each day whether it is a review day, a mock test day or a regular
//! study day:
//! - Day offset `n` (1-based) divisible by the review interval: one review task
//! - Else divisible by the mock test interval: one full mock test
//! - Else: available hours split across skills by the current weights
//!
//! The review check runs first by default. With the default intervals of 7
//! and 14 every mock test day is also a review day, so no mock test is ever
//! scheduled. [`CheckpointPrecedence::MockFirst`] flips the order.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{TaskCatalog, Tier, MOCK_TEST_CATEGORY, REVIEW_CATEGORY};
use crate::impact::ImpactModel;
use crate::profile::{Profile, Skill, TaskSkill};
use crate::task::{DailySchedule, StudyTask};
use crate::weights::{compute_weights, SkillWeights};

/// Which checkpoint wins when a day qualifies for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointPrecedence {
    #[default]
    ReviewFirst,
    MockFirst,
}

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Every n-th day is a review day (0 disables)
    #[serde(default = "default_review_interval")]
    pub review_interval_days: u32,
    /// Every n-th day is a mock test day (0 disables)
    #[serde(default = "default_mock_test_interval")]
    pub mock_test_interval_days: u32,
    /// Sessions shorter than this are not scheduled (hours)
    #[serde(default = "default_min_session_hours")]
    pub min_session_hours: f64,
    #[serde(default = "default_review_hours")]
    pub review_hours: f64,
    #[serde(default = "default_mock_test_hours")]
    pub mock_test_hours: f64,
    #[serde(default)]
    pub checkpoint_precedence: CheckpointPrecedence,
    #[serde(default)]
    pub impact: ImpactModel,
}

fn default_review_interval() -> u32 {
    7
}
fn default_mock_test_interval() -> u32 {
    14
}
fn default_min_session_hours() -> f64 {
    0.5
}
fn default_review_hours() -> f64 {
    2.0
}
fn default_mock_test_hours() -> f64 {
    3.5
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            review_interval_days: default_review_interval(),
            mock_test_interval_days: default_mock_test_interval(),
            min_session_hours: default_min_session_hours(),
            review_hours: default_review_hours(),
            mock_test_hours: default_mock_test_hours(),
            checkpoint_precedence: CheckpointPrecedence::default(),
            impact: ImpactModel::default(),
        }
    }
}

/// Task-assignment path for one day. Exactly one applies per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPlan {
    Review,
    MockTest,
    Regular,
}

/// Round to one decimal place.
pub fn round_to_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Stateless timetable generator over a task catalog.
pub struct TimetableGenerator<'a> {
    catalog: &'a TaskCatalog,
    config: PlannerConfig,
}

impl<'a> TimetableGenerator<'a> {
    /// Create a generator with default config
    pub fn new(catalog: &'a TaskCatalog) -> Self {
        Self {
            catalog,
            config: PlannerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(catalog: &'a TaskCatalog, config: PlannerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate the full timetable.
    ///
    /// # Arguments
    /// * `profile` - Learner snapshot, assumed valid
    /// * `history` - Tasks tagged completed or not, consumed in full by
    ///   weight revision
    /// * `today` - First date of the timetable
    /// * `rng` - Source for catalog and guide selection
    ///
    /// # Returns
    /// One entry per date in `[today, exam_date)`, empty when the exam is
    /// today or earlier.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        history: &[StudyTask],
        today: NaiveDate,
        rng: &mut R,
    ) -> Vec<DailySchedule> {
        let total_days = (profile.exam_date - today).num_days();
        if total_days <= 0 {
            tracing::info!(%today, exam_date = %profile.exam_date, "exam date reached, nothing to schedule");
            return Vec::new();
        }

        let weights = compute_weights(profile, history);

        let timetable: Vec<DailySchedule> = (0..total_days)
            .map(|day_index| {
                let date = today + Duration::days(day_index);
                self.build_day(profile, &weights, day_index, date, rng)
            })
            .collect();

        tracing::info!(
            days = timetable.len(),
            tasks = timetable.iter().map(|d| d.tasks.len()).sum::<usize>(),
            history = history.len(),
            "generated timetable"
        );
        timetable
    }

    /// Decide the assignment path for 1-based day offset `n`.
    pub fn plan_for_day(&self, n: u32) -> DayPlan {
        let review = divides(self.config.review_interval_days, n);
        let mock = divides(self.config.mock_test_interval_days, n);
        match self.config.checkpoint_precedence {
            CheckpointPrecedence::ReviewFirst if review => DayPlan::Review,
            CheckpointPrecedence::ReviewFirst if mock => DayPlan::MockTest,
            CheckpointPrecedence::MockFirst if mock => DayPlan::MockTest,
            CheckpointPrecedence::MockFirst if review => DayPlan::Review,
            _ => DayPlan::Regular,
        }
    }

    fn build_day<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        weights: &SkillWeights,
        day_index: i64,
        date: NaiveDate,
        rng: &mut R,
    ) -> DailySchedule {
        let mut day = DailySchedule::new(date);
        let n = u32::try_from(day_index + 1).unwrap_or(u32::MAX);

        match self.plan_for_day(n) {
            DayPlan::Review => {
                day.is_buffer_day = true;
                day.tasks.push(self.checkpoint_task(
                    format!("review-{}", date.format("%Y-%m-%d")),
                    TaskSkill::Review,
                    REVIEW_CATEGORY,
                    self.config.review_hours,
                    profile,
                    rng,
                ));
                tracing::debug!(%date, n, "review day");
            }
            DayPlan::MockTest => {
                day.tasks.push(self.checkpoint_task(
                    format!("mock-{}", date.format("%Y-%m-%d")),
                    TaskSkill::MockTest,
                    MOCK_TEST_CATEGORY,
                    self.config.mock_test_hours,
                    profile,
                    rng,
                ));
                tracing::debug!(%date, n, "mock test day");
            }
            DayPlan::Regular => {
                let available = profile.availability.hours_on(date.weekday());
                if available > 0.0 {
                    day.tasks = self.allocate(profile, weights, date, available, rng);
                }
                tracing::debug!(%date, n, available, tasks = day.tasks.len(), "study day");
            }
        }

        day
    }

    /// Split `available_hours` across the primary skills by weight.
    ///
    /// A skill whose share is below the minimum session length gets no task.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        weights: &SkillWeights,
        date: NaiveDate,
        available_hours: f64,
        rng: &mut R,
    ) -> Vec<StudyTask> {
        let mut tasks = Vec::new();
        for skill in Skill::ALL {
            let skill_hours = available_hours * weights.get(skill);
            if skill_hours < self.config.min_session_hours {
                continue;
            }
            let duration = round_to_tenth(skill_hours);
            let entry = self.catalog.pick_entry(skill.as_str(), rng);
            let tier = Tier::for_score(*profile.current_scores.get(skill));
            let guide = self.catalog.pick_guide(skill.as_str(), tier, rng);
            let task_skill = TaskSkill::from(skill);

            tasks.push(
                StudyTask::new(
                    format!("{skill}-{}", date.format("%Y-%m-%d")),
                    task_skill,
                    entry.description,
                    duration,
                )
                .with_impact(self.config.impact.predict(task_skill, duration, profile.focus_level))
                .with_resource_link(entry.resource_link)
                .with_study_guide(guide),
            );
        }
        tasks
    }

    /// Review and mock test tasks use a mid-tier guide regardless of scores.
    fn checkpoint_task<R: Rng + ?Sized>(
        &self,
        id: String,
        skill: TaskSkill,
        category: &str,
        hours: f64,
        profile: &Profile,
        rng: &mut R,
    ) -> StudyTask {
        let entry = self.catalog.pick_entry(category, rng);
        let guide = self.catalog.pick_guide(category, Tier::Intermediate, rng);
        StudyTask::new(id, skill, entry.description, hours)
            .with_impact(self.config.impact.predict(skill, hours, profile.focus_level))
            .with_resource_link(entry.resource_link)
            .with_study_guide(guide)
    }
}

fn divides(interval: u32, n: u32) -> bool {
    interval > 0 && n % interval == 0
}
