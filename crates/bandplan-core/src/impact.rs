//! Predicted band score contribution of a study session.

use serde::{Deserialize, Serialize};

use crate::profile::TaskSkill;

/// Fixed linear model: `hours * base_rate * (focus_offset + focus / focus_scale)`.
///
/// At the defaults roughly 100 focused hours move one band. Results are not
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactModel {
    /// Band gain per study hour before the focus multiplier
    #[serde(default = "default_base_rate")]
    pub base_rate: f64,
    #[serde(default = "default_focus_offset")]
    pub focus_offset: f64,
    #[serde(default = "default_focus_scale")]
    pub focus_scale: f64,
}

fn default_base_rate() -> f64 {
    0.01
}
fn default_focus_offset() -> f64 {
    0.5
}
fn default_focus_scale() -> f64 {
    5.0
}

impl Default for ImpactModel {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            focus_offset: default_focus_offset(),
            focus_scale: default_focus_scale(),
        }
    }
}

impl ImpactModel {
    /// 0.7 at focus level 1, 1.5 at focus level 5 with default settings.
    pub fn focus_multiplier(&self, focus_level: u8) -> f64 {
        self.focus_offset + f64::from(focus_level) / self.focus_scale
    }

    /// The skill is part of the signature but every skill shares one rate.
    pub fn predict(&self, _skill: TaskSkill, hours: f64, focus_level: u8) -> f64 {
        hours * self.base_rate * self.focus_multiplier(focus_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_focus_multiplier_range() {
        let model = ImpactModel::default();
        assert!((model.focus_multiplier(1) - 0.7).abs() < EPS);
        assert!((model.focus_multiplier(3) - 1.1).abs() < EPS);
        assert!((model.focus_multiplier(5) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_predict_is_linear_in_hours() {
        let model = ImpactModel::default();
        let one = model.predict(TaskSkill::Writing, 1.0, 5);
        let ten = model.predict(TaskSkill::Writing, 10.0, 5);
        assert!((one - 0.015).abs() < EPS);
        assert!((ten - 10.0 * one).abs() < EPS);
    }

    #[test]
    fn test_predict_is_not_clamped() {
        let model = ImpactModel::default();
        assert!(model.predict(TaskSkill::Reading, 1000.0, 5) > 9.0);
        assert_eq!(model.predict(TaskSkill::Reading, 0.0, 5), 0.0);
    }
}
