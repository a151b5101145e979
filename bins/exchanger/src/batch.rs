//! Batch and policy file loading.

use config::{Config, File, FileFormat};
use serde::Deserialize;
use till_core::exchange::{BandPolicy, LocationRequest};
use till_shared::{AppError, AppResult};

/// Contents of a batch file.
#[derive(Debug, Deserialize)]
struct BatchFile {
    #[serde(default)]
    locations: Vec<LocationRequest>,
}

/// Parses a TOML batch document.
pub fn parse_batch(source: &str) -> AppResult<Vec<LocationRequest>> {
    let batch: BatchFile = Config::builder()
        .add_source(File::from_str(source, FileFormat::Toml))
        .build()?
        .try_deserialize()?;

    if batch.locations.is_empty() {
        return Err(AppError::Validation(
            "batch file lists no locations".to_string(),
        ));
    }
    Ok(batch.locations)
}

/// Parses a TOML policy document.
pub fn parse_policy(source: &str) -> AppResult<BandPolicy> {
    let policy = Config::builder()
        .add_source(File::from_str(source, FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    Ok(policy)
}

/// Reads and parses the batch file at `path`.
pub fn load_batch(path: &str) -> AppResult<Vec<LocationRequest>> {
    let source = std::fs::read_to_string(path)
        .map_err(|err| AppError::Io(format!("{path}: {err}")))?;
    parse_batch(&source)
}

/// Reads and parses the policy file at `path`.
pub fn load_policy(path: &str) -> AppResult<BandPolicy> {
    let source = std::fs::read_to_string(path)
        .map_err(|err| AppError::Io(format!("{path}: {err}")))?;
    parse_policy(&source)
}
