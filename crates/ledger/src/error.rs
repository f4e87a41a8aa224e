//! Errors the ledger can return.
//!
//! Each variant maps to one deliberate HTTP status in the server crate;
//! database errors stay transparent so their cause can be logged before the
//! message is flattened for clients.
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("\"{0}\" already exists")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("external tool failed: {0}")]
    Upstream(String),
    #[error("external tool timed out: {0}")]
    UpstreamTimeout(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::ExtractionFailed(a), Self::ExtractionFailed(b)) => a == b,
            (Self::Upstream(a), Self::Upstream(b)) => a == b,
            (Self::UpstreamTimeout(a), Self::UpstreamTimeout(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
