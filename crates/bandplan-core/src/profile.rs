//! Learner profile: scores, goals, weekly availability and traits.
//!
//! A [`Profile`] is an immutable-per-run snapshot handed to the engine. The
//! engine assumes it is well formed; [`Profile::validate`] is the check the
//! calling layer runs before generation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Highest band score on the exam scale.
pub const MAX_BAND: f64 = 9.0;

/// The four primary exam skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Listening,
    Reading,
    Writing,
    Speaking,
}

impl Skill {
    /// All primary skills in allocation order.
    pub const ALL: [Skill; 4] = [
        Skill::Listening,
        Skill::Reading,
        Skill::Writing,
        Skill::Speaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Listening => "Listening",
            Skill::Reading => "Reading",
            Skill::Writing => "Writing",
            Skill::Speaking => "Speaking",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "listening" | "l" => Ok(Skill::Listening),
            "reading" | "r" => Ok(Skill::Reading),
            "writing" | "w" => Ok(Skill::Writing),
            "speaking" | "s" => Ok(Skill::Speaking),
            _ => Err(ValidationError::UnknownSkill(s.to_string())),
        }
    }
}

/// Skill tag carried by a generated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskSkill {
    Listening,
    Reading,
    Writing,
    Speaking,
    Review,
    #[serde(rename = "Mock Test")]
    MockTest,
}

impl TaskSkill {
    /// The primary skill behind this tag, if any.
    pub fn primary(&self) -> Option<Skill> {
        match self {
            TaskSkill::Listening => Some(Skill::Listening),
            TaskSkill::Reading => Some(Skill::Reading),
            TaskSkill::Writing => Some(Skill::Writing),
            TaskSkill::Speaking => Some(Skill::Speaking),
            TaskSkill::Review | TaskSkill::MockTest => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskSkill::Listening => "Listening",
            TaskSkill::Reading => "Reading",
            TaskSkill::Writing => "Writing",
            TaskSkill::Speaking => "Speaking",
            TaskSkill::Review => "Review",
            TaskSkill::MockTest => "Mock Test",
        }
    }
}

impl From<Skill> for TaskSkill {
    fn from(skill: Skill) -> Self {
        match skill {
            Skill::Listening => TaskSkill::Listening,
            Skill::Reading => TaskSkill::Reading,
            Skill::Writing => TaskSkill::Writing,
            Skill::Speaking => TaskSkill::Speaking,
        }
    }
}

impl fmt::Display for TaskSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per primary skill, serialized as an object keyed by skill name.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillMap<T> {
    #[serde(rename = "Listening")]
    pub listening: T,
    #[serde(rename = "Reading")]
    pub reading: T,
    #[serde(rename = "Writing")]
    pub writing: T,
    #[serde(rename = "Speaking")]
    pub speaking: T,
}

/// Band scores per skill.
pub type SkillScores = SkillMap<f64>;

impl<T> SkillMap<T> {
    pub fn new(listening: T, reading: T, writing: T, speaking: T) -> Self {
        Self {
            listening,
            reading,
            writing,
            speaking,
        }
    }

    /// Build a map by evaluating `f` once per skill, in [`Skill::ALL`] order.
    pub fn from_fn(mut f: impl FnMut(Skill) -> T) -> Self {
        Self {
            listening: f(Skill::Listening),
            reading: f(Skill::Reading),
            writing: f(Skill::Writing),
            speaking: f(Skill::Speaking),
        }
    }

    pub fn get(&self, skill: Skill) -> &T {
        match skill {
            Skill::Listening => &self.listening,
            Skill::Reading => &self.reading,
            Skill::Writing => &self.writing,
            Skill::Speaking => &self.speaking,
        }
    }

    pub fn get_mut(&mut self, skill: Skill) -> &mut T {
        match skill {
            Skill::Listening => &mut self.listening,
            Skill::Reading => &mut self.reading,
            Skill::Writing => &mut self.writing,
            Skill::Speaking => &mut self.speaking,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, &T)> + '_ {
        Skill::ALL.into_iter().map(move |skill| (skill, self.get(skill)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Skill, &T) -> U) -> SkillMap<U> {
        SkillMap::from_fn(|skill| f(skill, self.get(skill)))
    }
}

impl SkillMap<f64> {
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| *v).sum()
    }

    pub fn average(&self) -> f64 {
        self.sum() / Skill::ALL.len() as f64
    }
}

/// Check a value against the 0-9 band scale in 0.5 steps.
pub fn is_valid_band(score: f64) -> bool {
    (0.0..=MAX_BAND).contains(&score) && (score * 2.0).fract() == 0.0
}

/// Full English weekday name, the key format used by [`Availability`].
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday from its full or abbreviated English name.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

/// Weekly availability: weekday name to a flat list of hour boundaries.
///
/// `[8, 12, 14, 18]` on Saturday means 08:00-12:00 and 14:00-18:00.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<String, Vec<u8>>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `[start, end)` window to a weekday.
    pub fn with_window(mut self, weekday: Weekday, start: u8, end: u8) -> Self {
        self.add_window(weekday, start, end);
        self
    }

    pub fn add_window(&mut self, weekday: Weekday, start: u8, end: u8) {
        self.0
            .entry(weekday_name(weekday).to_string())
            .or_default()
            .extend([start, end]);
    }

    /// Replace a weekday's boundaries. An empty list marks a rest day.
    pub fn set(&mut self, weekday: Weekday, boundaries: Vec<u8>) {
        self.0.insert(weekday_name(weekday).to_string(), boundaries);
    }

    pub fn boundaries(&self, weekday: Weekday) -> &[u8] {
        self.0
            .get(weekday_name(weekday))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of `end - start` over the weekday's pairs. A dangling odd
    /// boundary is ignored.
    pub fn hours_on(&self, weekday: Weekday) -> f64 {
        self.boundaries(weekday)
            .chunks_exact(2)
            .map(|pair| f64::from(pair[1]) - f64::from(pair[0]))
            .sum()
    }

    pub fn weekly_hours(&self) -> f64 {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|d| self.hours_on(d))
        .sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, bounds) in &self.0 {
            let weekday = parse_weekday(name)
                .ok_or_else(|| ValidationError::UnknownWeekday(name.clone()))?;
            if weekday_name(weekday) != name.as_str() {
                return Err(ValidationError::UnknownWeekday(name.clone()));
            }
            if bounds.len() % 2 != 0 {
                return Err(ValidationError::InvalidAvailability {
                    weekday: name.clone(),
                    message: format!("odd number of hour boundaries ({})", bounds.len()),
                });
            }
            for pair in bounds.chunks_exact(2) {
                let (start, end) = (pair[0], pair[1]);
                if end > 24 || start >= end {
                    return Err(ValidationError::InvalidAvailability {
                        weekday: name.clone(),
                        message: format!("window [{start}, {end}) must satisfy start < end <= 24"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Preferred learning style. Carried through the model, not consumed by
/// the scheduling algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
    #[serde(rename = "Read/Write")]
    ReadWrite,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditory",
            LearningStyle::Kinesthetic => "Kinesthetic",
            LearningStyle::ReadWrite => "Read/Write",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            "read/write" | "read-write" | "readwrite" => Ok(LearningStyle::ReadWrite),
            _ => Err(ValidationError::UnknownLearningStyle(s.to_string())),
        }
    }
}

/// A learner's planning snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub current_scores: SkillScores,
    pub target_scores: SkillScores,
    pub exam_date: NaiveDate,
    #[serde(default)]
    pub availability: Availability,
    /// 1 (scattered) to 5 (deep focus)
    pub focus_level: u8,
    #[serde(default)]
    pub learning_style: LearningStyle,
}

impl Profile {
    /// Gap to target for one skill, floored at zero.
    pub fn gap(&self, skill: Skill) -> f64 {
        (self.target_scores.get(skill) - self.current_scores.get(skill)).max(0.0)
    }

    pub fn gaps(&self) -> SkillMap<f64> {
        SkillMap::from_fn(|skill| self.gap(skill))
    }

    /// Patch one current score, e.g. after a mock test.
    pub fn update_score(&mut self, skill: Skill, score: f64) -> Result<(), ValidationError> {
        check_band(skill, score)?;
        *self.current_scores.get_mut(skill) = score;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for skill in Skill::ALL {
            check_band(skill, *self.current_scores.get(skill))?;
            check_band(skill, *self.target_scores.get(skill))?;
        }
        if !(1..=5).contains(&self.focus_level) {
            return Err(ValidationError::InvalidFocusLevel(self.focus_level));
        }
        self.availability.validate()
    }
}

fn check_band(skill: Skill, score: f64) -> Result<(), ValidationError> {
    if is_valid_band(score) {
        Ok(())
    } else {
        Err(ValidationError::InvalidBandScore {
            skill: skill.to_string(),
            score,
        })
    }
}
