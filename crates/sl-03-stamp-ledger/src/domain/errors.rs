//! Error types for the stamp ledger

use shared_types::StorageError;
use thiserror::Error;

/// All errors the ledger surfaces.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Fewer unredeemed stamps than requested at the moment of selection.
    #[error("Insufficient stamps: required {required}, available {available}")]
    InsufficientStamps { required: u32, available: u32 },

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// True for infrastructure failures, false for domain outcomes.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
