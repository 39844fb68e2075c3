use thiserror::Error;

use super::types::Acknowledgement;

/// Errors that can occur while allocating, computing, submitting, or rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FiscalError {
    /// Input rejected before any allocation occurred.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistent ledger could not be read or written.
    /// Allocation never proceeds on an unreadable ledger.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Sequence or code allocation failed (namespace exhausted, malformed
    /// stored codes).
    #[error("allocation error: {0}")]
    Allocation(String),

    /// The Authority returned a non-success result code. Recoverable: the
    /// record is persisted with this reason and stays eligible for retry.
    #[error("authority rejected submission: [{code}] {message}")]
    Rejected { code: String, message: String },

    /// No usable response from the Authority. Persisted identically to a
    /// rejection, since "rejected" and "network dropped the rejection" are
    /// indistinguishable from here.
    #[error("authority transport failure: {0}")]
    Transport(String),

    /// A submission for this business key already succeeded; success is
    /// terminal and must not be resubmitted.
    #[error("submission already succeeded for '{0}'")]
    AlreadySubmitted(String),

    /// The Authority confirmed the transaction but the local ledger write
    /// failed. Carries both halves so an operator can reconcile manually —
    /// the acknowledgement must never be dropped.
    #[error("authority acknowledged but ledger write failed: {persist_error}")]
    AcknowledgedNotPersisted {
        ack: Box<Acknowledgement>,
        persist_error: String,
    },

    /// Receipt rendering failed after a successful submission.
    #[error("receipt rendering error: {0}")]
    Render(String),
}

/// Failure reported by a [`Ledger`](super::ledger::Ledger) implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct LedgerError(pub String);

impl LedgerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "lines[0].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Fold a non-empty list of validation errors into a single [`FiscalError`].
pub(crate) fn validation_failure(errors: Vec<ValidationError>) -> FiscalError {
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    FiscalError::Validation(msg)
}
