use std::sync::Arc;

use plan_core::model::{InterestSelection, ProfileUpdate, SelectionError};
use storage::repository::{ProfileRepository, SessionRepository};
use tracing::{info, warn};

use crate::auth_service::require_user;
use crate::error::OnboardingError;

#[derive(Clone)]
pub struct InterestService {
    sessions: Arc<dyn SessionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl InterestService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { sessions, profiles }
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::Selection` when nothing is picked,
    /// `OnboardingError::MissingSession` without a user, and
    /// `OnboardingError::Storage` if the write fails.
    pub async fn save_interests(&self, selection: &InterestSelection) -> Result<(), OnboardingError> {
        if selection.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        let user_id = require_user(self.sessions.as_ref()).await?;
        let interests = selection.to_vec();
        let count = interests.len();
        self.profiles
            .update_profile(user_id, &ProfileUpdate::new().with_interests(interests))
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to save interests"))?;
        info!(%user_id, count, "interests saved");
        Ok(())
    }
}
