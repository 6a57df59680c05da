//! `.env` loading
//!
//! Variables already present in the process environment win; dotenvy never
//! overwrites them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Load an explicit env file, or `./.env` when none is given.
///
/// An explicit file must exist and parse. A missing `./.env` is fine.
/// Returns the file that was loaded, if any.
pub fn load_dotenv(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(err) if err.not_found() => Ok(None),
            Err(err) => Err(err).context("Failed to parse .env"),
        },
    }
}
