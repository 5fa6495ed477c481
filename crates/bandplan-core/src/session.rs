//! Plan session: the application state a caller owns between generations.
//!
//! The engine is stateless. A [`PlanSession`] holds the profile, the current
//! timetable and the completed-task log, and hands them to the generator on
//! every recalculation.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, ValidationError};
use crate::planner::TimetableGenerator;
use crate::profile::{Profile, Skill};
use crate::task::{DailySchedule, LearningLog, StudyTask};
use crate::weights::{compute_weights, SkillWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSession {
    pub profile: Profile,
    #[serde(default)]
    pub timetable: Vec<DailySchedule>,
    #[serde(default)]
    pub log: LearningLog,
    /// Date the current timetable was generated for
    #[serde(default)]
    pub generated_on: Option<NaiveDate>,
}

impl PlanSession {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            timetable: Vec::new(),
            log: LearningLog::new(),
            generated_on: None,
        }
    }

    /// Completion history for weight revision.
    ///
    /// Every logged completion, plus every primary-skill task of the current
    /// timetable dated before `today` that was never completed.
    pub fn history(&self, today: NaiveDate) -> Vec<StudyTask> {
        let mut history: Vec<StudyTask> = self.log.tasks().to_vec();
        history.extend(
            self.timetable
                .iter()
                .filter(|day| day.date < today)
                .flat_map(|day| day.tasks.iter())
                .filter(|task| {
                    !task.is_completed
                        && task.skill.primary().is_some()
                        && !self.log.contains(&task.id)
                })
                .cloned(),
        );
        history
    }

    /// Weights the next recalculation would use.
    pub fn weights(&self, today: NaiveDate) -> SkillWeights {
        compute_weights(&self.profile, &self.history(today))
    }

    /// Regenerate the timetable wholesale.
    pub fn recalculate<R: Rng + ?Sized>(
        &mut self,
        generator: &TimetableGenerator<'_>,
        today: NaiveDate,
        rng: &mut R,
    ) {
        let history = self.history(today);
        self.timetable = generator.generate(&self.profile, &history, today, rng);
        self.restore_completions();
        self.generated_on = Some(today);
        tracing::info!(
            %today,
            days = self.timetable.len(),
            history = history.len(),
            "timetable recalculated"
        );
    }

    /// Mark a timetable task completed and record it in the log.
    pub fn complete_task(
        &mut self,
        task_id: &str,
        at: DateTime<Utc>,
    ) -> Result<&StudyTask, SessionError> {
        if self.log.contains(task_id) {
            return Err(SessionError::AlreadyCompleted(task_id.to_string()));
        }
        let task = self
            .timetable
            .iter_mut()
            .flat_map(|day| day.tasks.iter_mut())
            .find(|task| task.id == task_id)
            .ok_or_else(|| SessionError::TaskNotFound(task_id.to_string()))?;

        if !task.mark_completed(at) {
            return Err(SessionError::AlreadyCompleted(task_id.to_string()));
        }
        tracing::info!(task_id, skill = %task.skill, hours = task.duration_hours, "task completed");
        self.log.add_task(task.clone());
        Ok(&self.log.tasks()[self.log.len() - 1])
    }

    /// Carry logged completions onto a freshly generated timetable.
    ///
    /// Task ids embed their date, so a logged id can only match the entry
    /// it was completed from.
    fn restore_completions(&mut self) {
        let log = &self.log;
        for task in self.timetable.iter_mut().flat_map(|day| day.tasks.iter_mut()) {
            if let Some(done) = log.find(&task.id) {
                task.is_completed = true;
                task.completed_at = done.completed_at;
            }
        }
    }

    /// Patch one current score, e.g. from a mock test result.
    ///
    /// The timetable is left untouched; callers recalculate afterwards.
    pub fn update_score(&mut self, skill: Skill, score: f64) -> Result<(), ValidationError> {
        self.profile.update_score(skill, score)?;
        tracing::info!(%skill, score, "current score updated");
        Ok(())
    }

    /// The next `days` entries dated today or later.
    pub fn upcoming(&self, today: NaiveDate, days: usize) -> &[DailySchedule] {
        let start = self
            .timetable
            .iter()
            .position(|day| day.date >= today)
            .unwrap_or(self.timetable.len());
        let end = (start + days).min(self.timetable.len());
        &self.timetable[start..end]
    }

    pub fn find_task(&self, task_id: &str) -> Option<&StudyTask> {
        self.timetable.iter().find_map(|day| day.find_task(task_id))
    }
}
