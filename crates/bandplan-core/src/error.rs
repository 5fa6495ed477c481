//! Core error types for bandplan-core.
//!
//! The scheduling engine itself (weights, impact, planner) never fails: every
//! degenerate input degrades to a default. Errors only arise at the edges,
//! when the calling layer validates a profile, loads content or config from
//! disk, or mutates a plan session.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bandplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Task catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Plan session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Profile and input validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Band score outside [0, 9] or not on the 0.5 grid
    #[error("Invalid band score for {skill}: {score} (expected 0.0-9.0 in steps of 0.5)")]
    InvalidBandScore { skill: String, score: f64 },

    /// Focus level outside [1, 5]
    #[error("Invalid focus level: {0} (expected 1-5)")]
    InvalidFocusLevel(u8),

    /// Unknown skill name
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// Unknown weekday name in availability
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),

    /// Hour boundaries malformed for a weekday
    #[error("Invalid availability for {weekday}: {message}")]
    InvalidAvailability { weekday: String, message: String },

    /// Unknown learning style
    #[error("Unknown learning style: {0}")]
    UnknownLearningStyle(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Task catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read the content table
    #[error("Failed to read catalog at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content table is not valid TOML for the catalog schema
    #[error("Failed to parse catalog: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Content table declares a schema version this build cannot read
    #[error("Unsupported catalog version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Plan session errors.
#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    /// No task with this id in the current timetable
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task was already marked completed
    #[error("Task already completed: {0}")]
    AlreadyCompleted(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
