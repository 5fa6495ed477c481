//! # Bandplan Core Library
//!
//! This library provides the scheduling engine behind the bandplan IELTS
//! study planner. Given a learner profile (current and target band scores,
//! weekly availability, focus level, exam date) and the history of completed
//! and missed sessions, it produces a day-by-day timetable up to the exam.
//! All operations are available via the standalone `bandplan` CLI.
//!
//! ## Architecture
//!
//! - **Weights**: Per-skill priority from score gaps, revised by completion
//!   rates observed in the history
//! - **Planner**: Review, mock test and regular study days over the
//!   remaining dates, with content drawn from a task catalog
//! - **Impact**: Fixed linear estimate of band gain per session
//! - **Storage**: TOML-based configuration and JSON session persistence
//!
//! ## Key Components
//!
//! - [`TimetableGenerator`]: Stateless timetable generation
//! - [`PlanSession`]: Profile, timetable and log owned between generations
//! - [`TaskCatalog`]: Versioned study content table
//! - [`Config`]: Application configuration management
//!
//! The engine takes its random source as an argument; pass a seeded
//! generator for reproducible timetables.

pub mod catalog;
pub mod error;
pub mod impact;
pub mod planner;
pub mod profile;
pub mod progress;
pub mod session;
pub mod storage;
pub mod task;
pub mod weights;

pub use catalog::{CatalogEntry, TaskCatalog, Tier};
pub use error::{CatalogError, ConfigError, CoreError, SessionError, ValidationError};
pub use impact::ImpactModel;
pub use planner::{CheckpointPrecedence, PlannerConfig, TimetableGenerator};
pub use profile::{Availability, LearningStyle, Profile, Skill, SkillMap, SkillScores, TaskSkill};
pub use progress::{ForecastPoint, ProgressReport};
pub use session::PlanSession;
pub use storage::{data_dir, Config, SessionStore};
pub use task::{DailySchedule, DayKind, LearningLog, StudyTask};
pub use weights::{compute_weights, CompletionStats, SkillWeights};
