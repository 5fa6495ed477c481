//! Study tasks, day entries and the completed-task log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::TaskSkill;

/// A single generated study assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTask {
    /// `{skill}-{iso-date}` for regular tasks, `review-{iso-date}` /
    /// `mock-{iso-date}` for checkpoints. Stable across regenerations
    pub id: String,
    pub skill: TaskSkill,
    pub description: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Estimated band score contribution
    #[serde(default)]
    pub predicted_impact: f64,
    #[serde(default)]
    pub resource_link: Option<String>,
    #[serde(default)]
    pub study_guide: Option<String>,
}

impl StudyTask {
    pub fn new(
        id: impl Into<String>,
        skill: TaskSkill,
        description: impl Into<String>,
        duration_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            skill,
            description: description.into(),
            duration_hours,
            is_completed: false,
            completed_at: None,
            predicted_impact: 0.0,
            resource_link: None,
            study_guide: None,
        }
    }

    pub fn with_impact(mut self, predicted_impact: f64) -> Self {
        self.predicted_impact = predicted_impact;
        self
    }

    pub fn with_resource_link(mut self, link: impl Into<String>) -> Self {
        self.resource_link = Some(link.into());
        self
    }

    pub fn with_study_guide(mut self, guide: Option<String>) -> Self {
        self.study_guide = guide;
        self
    }

    /// Mark the task completed at `at`.
    ///
    /// Returns `false` without touching `completed_at` if the task was
    /// already completed.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_completed {
            return false;
        }
        self.is_completed = true;
        self.completed_at = Some(at);
        true
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completed_at.map(|at| at.date_naive())
    }
}

/// What a day entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Rest,
    Study,
    Review,
    MockTest,
}

/// One date of the timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<StudyTask>,
    /// Set on review days
    #[serde(default)]
    pub is_buffer_day: bool,
}

impl DailySchedule {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: Vec::new(),
            is_buffer_day: false,
        }
    }

    pub fn kind(&self) -> DayKind {
        if self.is_buffer_day {
            DayKind::Review
        } else if self.tasks.iter().any(|t| t.skill == TaskSkill::MockTest) {
            DayKind::MockTest
        } else if self.tasks.is_empty() {
            DayKind::Rest
        } else {
            DayKind::Study
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(|t| t.duration_hours).sum()
    }

    pub fn find_task(&self, id: &str) -> Option<&StudyTask> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Append-only record of completed tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearningLog {
    logs: Vec<StudyTask>,
}

impl LearningLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, task: StudyTask) {
        self.logs.push(task);
    }

    pub fn tasks(&self) -> &[StudyTask] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&StudyTask> {
        self.logs.iter().find(|t| t.id == id)
    }

    pub fn total_hours(&self) -> f64 {
        self.logs.iter().map(|t| t.duration_hours).sum()
    }
}
