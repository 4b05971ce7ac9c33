//! # Error Types
//!
//! Errors shared across components.

use thiserror::Error;

use crate::time::Timestamp;

/// Infrastructure failure reported by a storage adapter.
///
/// Distinct from every domain error so callers can separate invalid
/// requests from an unavailable system.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("Storage operation timed out")]
    Timeout,

    /// Stored data failed to decode.
    #[error("Storage data corrupted: {0}")]
    Corrupted(String),

    /// Any other backend failure.
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Campaign rejected by structural validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CampaignValidationError {
    #[error("Stamp goal must be at least 1, got {0}")]
    InvalidStampGoal(u32),

    #[error("Proximity threshold must be a finite non-negative distance, got {0}")]
    InvalidProximityThreshold(f64),

    #[error("Campaign ends ({end}) before it starts ({start})")]
    InvalidSchedule { start: Timestamp, end: Timestamp },
}
