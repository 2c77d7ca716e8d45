use std::sync::Arc;

use plan_core::model::{Session, UserId};
use storage::repository::{AuthListener, AuthSubscription, SessionRepository};
use tracing::info;

use crate::error::OnboardingError;

/// Resolve the signed-in user or fail with `MissingSession`.
///
/// # Errors
///
/// Returns `OnboardingError::MissingSession` when nobody is signed in and
/// `OnboardingError::Storage` when the session cannot be read.
pub async fn require_user(sessions: &dyn SessionRepository) -> Result<UserId, OnboardingError> {
    sessions
        .current_session()
        .await?
        .map(|session| session.user_id)
        .ok_or(OnboardingError::MissingSession)
}

#[derive(Clone)]
pub struct AuthService {
    sessions: Arc<dyn SessionRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::Storage` if the session cannot be read.
    pub async fn current_session(&self) -> Result<Option<Session>, OnboardingError> {
        Ok(self.sessions.current_session().await?)
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::Storage` if the store rejects the sign-out.
    pub async fn sign_out(&self) -> Result<(), OnboardingError> {
        self.sessions.sign_out().await?;
        info!("signed out");
        Ok(())
    }

    #[must_use]
    pub fn watch(&self, listener: AuthListener) -> AuthSubscription {
        self.sessions.subscribe_to_auth_changes(listener)
    }
}
