mod config;
mod session_store;

pub use config::Config;
pub use session_store::SessionStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/bandplan[-dev]/` based on BANDPLAN_ENV.
///
/// Set BANDPLAN_ENV=dev to use development data directory.
/// BANDPLAN_DATA_DIR overrides both.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("BANDPLAN_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BANDPLAN_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("bandplan-dev")
            } else {
                base_dir.join("bandplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
