use serde::de::DeserializeOwned;
use std::fs;

use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let data = read_file_bytes(file_path)?;
    let parsed_data: T = serde_json::from_slice(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

/// Reads a file verbatim, e.g. a workflow definition that is uploaded as-is.
pub fn read_file_bytes(file_path: &str) -> Result<Vec<u8>> {
    fs::read(file_path).map_err(Error::IoError)
}
