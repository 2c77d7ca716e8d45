//! Shared error types for the services crate.

use thiserror::Error;

use plan_core::model::{AssessmentError, SelectionError, StageError};
use storage::repository::StorageError;
use storage::rest::RestInitError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the onboarding services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OnboardingError {
    #[error("no signed-in user")]
    MissingSession,
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OnboardingError {
    /// Whether repeating the same user action may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Storage(StorageError::Connection(_) | StorageError::Rejected { .. })
        )
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Rest(#[from] RestInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
