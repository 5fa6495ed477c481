pub mod catalog;
pub mod config;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod task;

use bandplan_core::{Config, PlanSession, SessionStore, TaskCatalog, TimetableGenerator};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand_pcg::Pcg64;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn make_rng(config: &Config) -> Pcg64 {
    match config.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Load the saved session, failing with a hint when none exists.
pub fn load_session(store: &SessionStore) -> Result<PlanSession, Box<dyn std::error::Error>> {
    store
        .load()?
        .ok_or_else(|| "no profile found, run `bandplan profile init` first".into())
}

/// Regenerate the session's timetable from today with the configured planner.
pub fn recalculate(session: &mut PlanSession, config: &Config, catalog: &TaskCatalog) {
    let generator = TimetableGenerator::with_config(catalog, config.planner.clone());
    let mut rng = make_rng(config);
    tracing::debug!(seed = ?config.seed, catalog_version = catalog.version, "recalculating");
    session.recalculate(&generator, today(), &mut rng);
}
