//! Record codec: entity values to their JSON wire form.
//!
//! # Responsibility
//! - Encode one record as a JSON object, or a list as a JSON array in the
//!   order the query produced it.
//! - Normalize primitive inputs arriving from the boundary (required and
//!   optional text).
//!
//! # Invariants
//! - Every field is present in the encoded object; unset optionals are `null`.
//! - Timestamps encode as integer epoch seconds and priority as `0|1|2`.
//! - Lists are never re-sorted here.

use crate::model::ValidationError;
use serde::Serialize;
use std::error::Error;
use std::ffi::NulError;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Serialization failure.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    /// Encoded text cannot cross a C string boundary.
    InteriorNul(NulError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "record encoding failed: {err}"),
            Self::InteriorNul(err) => write!(f, "encoded record is not a C string: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InteriorNul(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<NulError> for CodecError {
    fn from(value: NulError) -> Self {
        Self::InteriorNul(value)
    }
}

/// Encodes a single record as a JSON object.
pub fn encode_record<T: Serialize>(record: &T) -> CodecResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Encodes records as a JSON array, preserving slice order.
pub fn encode_list<T: Serialize>(records: &[T]) -> CodecResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Trims a required text field and rejects it when nothing is left.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional text field: blank input means "unset".
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
