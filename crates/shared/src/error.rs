use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BucketKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Transport,
    Status,
    Decode,
    Timeout,
}

/// A single bucket fetch that rejected. Never shown to the user as-is.
#[derive(Debug, Clone, Error)]
#[error("{kind:?} while fetching {bucket}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub bucket: BucketKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, bucket: BucketKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            bucket,
            message: message.into(),
        }
    }
}
