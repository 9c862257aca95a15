//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::LedgerError;
use storage::repository::StorageError;

/// Errors emitted by the play flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayError {
    /// An answer or result was requested before any question was served for
    /// the category (or after the hosting session expired).
    #[error("no active session for this category")]
    NoSession,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
