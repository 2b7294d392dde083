//! Loading of RON tuning files.
//!
//! Tuning files are optional. A missing or malformed file logs and falls
//! back to the type's defaults, so the game always starts.

use std::fs;

use bevy::prelude::*;
use serde::de::DeserializeOwned;

use super::error::DataLoadError;

/// Read and parse a RON file.
pub fn read_ron<T: DeserializeOwned>(path: &str) -> Result<T, DataLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.to_string(),
        details: e.to_string(),
    })?;
    parse_ron(path, &contents)
}

/// Parse RON text, attributing errors to `path`.
pub fn parse_ron<T: DeserializeOwned>(path: &str, contents: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

/// Load a RON file, using defaults if it cannot be read or parsed.
pub fn load_ron_or_default<T: DeserializeOwned + Default>(path: &str) -> T {
    match read_ron(path) {
        Ok(value) => {
            info!("Loaded tuning from {}", path);
            value
        }
        Err(e @ DataLoadError::ParseError { .. }) => {
            error!("{}. Using defaults.", e);
            T::default()
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            T::default()
        }
    }
}
