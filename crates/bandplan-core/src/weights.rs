//! Skill priority weights.
//!
//! Initial weights come from score gaps; revision multiplies each weight by a
//! struggle factor derived from completion behavior and renormalizes.

use serde::{Deserialize, Serialize};

use crate::profile::{Profile, Skill, SkillMap};
use crate::task::StudyTask;

/// Normalized priority distribution over the primary skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillWeights(SkillMap<f64>);

impl SkillWeights {
    /// Equal weight for every skill.
    pub fn uniform() -> Self {
        let share = 1.0 / Skill::ALL.len() as f64;
        Self(SkillMap::from_fn(|_| share))
    }

    /// Weights proportional to each skill's gap to target.
    ///
    /// A skill at or above target gets zero. When no skill has a positive
    /// gap the distribution is uniform.
    pub fn from_profile(profile: &Profile) -> Self {
        let gaps = profile.gaps();
        let total = gaps.sum();
        if total <= 0.0 {
            return Self::uniform();
        }
        Self(gaps.map(|_, gap| gap / total))
    }

    pub fn get(&self, skill: Skill) -> f64 {
        *self.0.get(skill)
    }

    pub fn as_map(&self) -> &SkillMap<f64> {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.sum()
    }

    /// Scale by each skill's struggle factor and renormalize.
    ///
    /// If the scaled weights sum to zero the current weights are kept.
    pub fn revise(&self, stats: &CompletionStats) -> Self {
        let scaled = self
            .0
            .map(|skill, weight| weight * stats.struggle_factor(skill));
        let total = scaled.sum();
        if total <= 0.0 {
            tracing::debug!("revised weights sum to zero, keeping prior weights");
            return *self;
        }
        let revised = Self(scaled.map(|_, w| w / total));
        tracing::debug!(
            listening = revised.get(Skill::Listening),
            reading = revised.get(Skill::Reading),
            writing = revised.get(Skill::Writing),
            speaking = revised.get(Skill::Speaking),
            "revised skill weights"
        );
        revised
    }
}

impl Default for SkillWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Seen/completed counts for one skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTally {
    pub seen: u32,
    pub completed: u32,
}

impl SkillTally {
    pub fn completion_rate(&self) -> Option<f64> {
        if self.seen == 0 {
            None
        } else {
            Some(f64::from(self.completed) / f64::from(self.seen))
        }
    }
}

/// Completion behavior per primary skill, tallied over a task history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats(SkillMap<SkillTally>);

impl CompletionStats {
    /// Tally every primary-skill task in `history`. Review and mock test
    /// tasks are ignored. The whole slice is consumed; windowing is the
    /// caller's choice.
    pub fn from_history(history: &[StudyTask]) -> Self {
        let mut tallies: SkillMap<SkillTally> = SkillMap::default();
        for task in history {
            if let Some(skill) = task.skill.primary() {
                let tally = tallies.get_mut(skill);
                tally.seen += 1;
                if task.is_completed {
                    tally.completed += 1;
                }
            }
        }
        Self(tallies)
    }

    pub fn tally(&self, skill: Skill) -> SkillTally {
        *self.0.get(skill)
    }

    /// `1 + (1 - completion_rate)`: 1.0 at full completion, 2.0 at none,
    /// 1.0 when the skill was never seen.
    pub fn struggle_factor(&self, skill: Skill) -> f64 {
        match self.tally(skill).completion_rate() {
            Some(rate) => 1.0 + (1.0 - rate),
            None => 1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, t)| t.seen == 0)
    }
}

/// Initial weights from the profile, revised by the completion history.
pub fn compute_weights(profile: &Profile, history: &[StudyTask]) -> SkillWeights {
    let initial = SkillWeights::from_profile(profile);
    if history.is_empty() {
        return initial;
    }
    initial.revise(&CompletionStats::from_history(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Availability, LearningStyle, SkillScores, TaskSkill};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn make_profile(current: SkillScores, target: SkillScores) -> Profile {
        Profile {
            current_scores: current,
            target_scores: target,
            exam_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            availability: Availability::new(),
            focus_level: 3,
            learning_style: LearningStyle::Visual,
        }
    }

    fn history(skill: TaskSkill, completed: u32, missed: u32) -> Vec<StudyTask> {
        let mut tasks = Vec::new();
        for i in 0..completed {
            let mut t = StudyTask::new(format!("{skill}-done-{i}"), skill, "d", 1.0);
            t.is_completed = true;
            tasks.push(t);
        }
        for i in 0..missed {
            tasks.push(StudyTask::new(format!("{skill}-missed-{i}"), skill, "d", 1.0));
        }
        tasks
    }

    #[test]
    fn test_reference_gap_weights() {
        let profile = make_profile(
            SkillScores::new(6.0, 6.5, 5.5, 6.0),
            SkillScores::new(7.5, 7.5, 7.0, 7.0),
        );
        let weights = SkillWeights::from_profile(&profile);
        assert!((weights.get(Skill::Listening) - 0.30).abs() < EPS);
        assert!((weights.get(Skill::Reading) - 0.20).abs() < EPS);
        assert!((weights.get(Skill::Writing) - 0.30).abs() < EPS);
        assert!((weights.get(Skill::Speaking) - 0.20).abs() < EPS);
    }

    #[test]
    fn test_targets_met_gives_uniform() {
        let profile = make_profile(
            SkillScores::new(8.0, 8.0, 7.5, 7.0),
            SkillScores::new(7.5, 7.5, 7.0, 7.0),
        );
        let weights = SkillWeights::from_profile(&profile);
        for skill in Skill::ALL {
            assert_eq!(weights.get(skill), 0.25);
        }
    }

    #[test]
    fn test_skill_at_target_gets_zero_weight() {
        let profile = make_profile(
            SkillScores::new(7.0, 6.0, 6.0, 6.0),
            SkillScores::new(7.0, 7.0, 7.0, 7.0),
        );
        let weights = SkillWeights::from_profile(&profile);
        assert_eq!(weights.get(Skill::Listening), 0.0);
        assert!((weights.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_struggle_factor_bounds() {
        let none_done = CompletionStats::from_history(&history(TaskSkill::Writing, 0, 5));
        assert_eq!(none_done.struggle_factor(Skill::Writing), 2.0);

        let all_done = CompletionStats::from_history(&history(TaskSkill::Writing, 5, 0));
        assert_eq!(all_done.struggle_factor(Skill::Writing), 1.0);

        assert_eq!(all_done.struggle_factor(Skill::Reading), 1.0);
    }

    #[test]
    fn test_checkpoint_tasks_do_not_count() {
        let mut tasks = history(TaskSkill::Review, 0, 3);
        tasks.extend(history(TaskSkill::MockTest, 0, 2));
        let stats = CompletionStats::from_history(&tasks);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_revision_boosts_missed_skill() {
        let profile = make_profile(
            SkillScores::new(6.0, 6.0, 6.0, 6.0),
            SkillScores::new(7.0, 7.0, 7.0, 7.0),
        );
        let mut tasks = history(TaskSkill::Listening, 4, 0);
        tasks.extend(history(TaskSkill::Speaking, 0, 4));

        let weights = compute_weights(&profile, &tasks);
        // 0.25 * 1.0, 0.25 * 2.0 for speaking, 1.0 for unseen: total 1.25
        assert!((weights.get(Skill::Listening) - 0.2).abs() < EPS);
        assert!((weights.get(Skill::Reading) - 0.2).abs() < EPS);
        assert!((weights.get(Skill::Speaking) - 0.4).abs() < EPS);
        assert!((weights.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_revise_keeps_prior_when_degenerate() {
        let zero = SkillWeights(SkillMap::default());
        let stats = CompletionStats::from_history(&history(TaskSkill::Reading, 0, 2));
        assert_eq!(zero.revise(&stats), zero);
    }

    #[test]
    fn test_empty_history_is_initial_weights() {
        let profile = make_profile(
            SkillScores::new(5.0, 6.0, 6.0, 6.0),
            SkillScores::new(7.0, 7.0, 7.0, 7.0),
        );
        assert_eq!(
            compute_weights(&profile, &[]),
            SkillWeights::from_profile(&profile)
        );
    }

    fn band() -> impl Strategy<Value = f64> {
        (0u8..=18).prop_map(|half_steps| f64::from(half_steps) / 2.0)
    }

    fn scores() -> impl Strategy<Value = SkillScores> {
        (band(), band(), band(), band()).prop_map(|(l, r, w, s)| SkillScores::new(l, r, w, s))
    }

    proptest! {
        #[test]
        fn prop_initial_weights_sum_to_one(current in scores(), target in scores()) {
            let profile = make_profile(current, target);
            let weights = SkillWeights::from_profile(&profile);
            prop_assert!((weights.sum() - 1.0).abs() < EPS);
            if profile.gaps().sum() == 0.0 {
                for skill in Skill::ALL {
                    prop_assert_eq!(weights.get(skill), 0.25);
                }
            }
        }

        #[test]
        fn prop_revision_is_normalized_and_monotone(
            current in scores(),
            target in scores(),
            done in proptest::collection::vec(0u32..6, 4),
            missed in proptest::collection::vec(0u32..6, 4),
        ) {
            let profile = make_profile(current, target);
            let initial = SkillWeights::from_profile(&profile);
            let mut tasks = Vec::new();
            for (i, skill) in Skill::ALL.into_iter().enumerate() {
                tasks.extend(history(skill.into(), done[i], missed[i]));
            }
            let stats = CompletionStats::from_history(&tasks);
            let revised = initial.revise(&stats);
            prop_assert!((revised.sum() - 1.0).abs() < EPS);

            for (i, skill) in Skill::ALL.into_iter().enumerate() {
                let seen = done[i] + missed[i];
                if seen > 0 && missed[i] == 0 {
                    prop_assert!(revised.get(skill) <= initial.get(skill) + EPS);
                }
                if seen > 0 && done[i] == 0 {
                    prop_assert!(revised.get(skill) + EPS >= initial.get(skill));
                }
            }
        }
    }
}
