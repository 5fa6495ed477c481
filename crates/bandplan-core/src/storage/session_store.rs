//! JSON persistence for the plan session.
//!
//! The whole session (profile, timetable, completed-task log) is one
//! document at `~/.config/bandplan/session.json`. Writes go to a sibling
//! temp file first and are renamed into place.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::Result;
use crate::session::PlanSession;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `None` when no session has been saved yet.
    pub fn load(&self) -> Result<Option<PlanSession>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "session loaded");
        Ok(Some(session))
    }

    pub fn save(&self, session: &PlanSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the saved session. Missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskCatalog;
    use crate::error::CoreError;
    use crate::planner::TimetableGenerator;
    use crate::profile::{Availability, LearningStyle, Profile, SkillScores};
    use chrono::{Duration, NaiveDate, Weekday};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn make_session() -> PlanSession {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let mut availability = Availability::new();
        availability.add_window(Weekday::Thu, 9, 11);
        let mut session = PlanSession::new(Profile {
            current_scores: SkillScores::new(6.0, 6.0, 6.0, 6.0),
            target_scores: SkillScores::new(7.0, 7.0, 7.0, 7.0),
            exam_date: today + Duration::days(10),
            availability,
            focus_level: 4,
            learning_style: LearningStyle::ReadWrite,
        });
        let catalog = TaskCatalog::builtin();
        session.recalculate(
            &TimetableGenerator::new(&catalog),
            today,
            &mut Pcg64::seed_from_u64(3),
        );
        session
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("nested").join("session.json"));
        let session = make_session();

        store.save(&session).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(session));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.clear().unwrap();
        store.save(&make_session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
