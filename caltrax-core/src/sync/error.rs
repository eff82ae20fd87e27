//! Sync error types.

use thiserror::Error;

use crate::models::Domain;
use crate::normalize::NormalizeError;
use crate::remote::RemoteError;

/// Why a domain sync did not complete.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("no owner id provided")]
    MissingOwner,

    #[error("remote client is not configured")]
    RemoteUnavailable,

    #[error("failed to fetch {domain}: {source}")]
    Fetch {
        domain: Domain,
        #[source]
        source: RemoteError,
    },

    #[error("invalid {domain} row: {source}")]
    Normalize {
        domain: Domain,
        #[source]
        source: NormalizeError,
    },

    #[error("{0} sync panicked: {1}")]
    Panicked(Domain, String),
}

impl SyncError {
    /// True for failures caused by missing inputs rather than by the sync
    /// itself.
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::MissingOwner | SyncError::RemoteUnavailable)
    }
}
