use std::sync::Arc;

use plan_core::model::{OnboardingStage, Profile, ProfileField, ProfileUpdate};
use storage::repository::{ProfileRepository, SessionRepository};
use tracing::{debug, info, warn};

use crate::auth_service::require_user;
use crate::error::OnboardingError;

/// Reads the profile aggregate and flips the onboarding completion flag.
#[derive(Clone)]
pub struct ProfileService {
    sessions: Arc<dyn SessionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { sessions, profiles }
    }

    /// Profile of the signed-in user; `Ok(None)` before anything was written.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::MissingSession` without a user and
    /// `OnboardingError::Storage` if the read fails.
    pub async fn load(&self) -> Result<Option<Profile>, OnboardingError> {
        let user_id = require_user(self.sessions.as_ref()).await?;
        Ok(self.profiles.get_profile(user_id, &ProfileField::ALL).await?)
    }

    /// Stage onboarding opens at: `Done` once the profile is complete, otherwise `Splash`.
    ///
    /// Partial progress is not resumed; each stage re-runs from its start.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError` if the session or profile cannot be read.
    pub async fn entry_stage(&self) -> Result<OnboardingStage, OnboardingError> {
        let user_id = require_user(self.sessions.as_ref()).await?;
        let profile = self
            .profiles
            .get_profile(user_id, &[ProfileField::OnboardingCompleted])
            .await?;
        let stage = if profile.is_some_and(|profile| profile.onboarding_completed) {
            OnboardingStage::Done
        } else {
            OnboardingStage::Splash
        };
        debug!(%user_id, %stage, "resolved onboarding entry stage");
        Ok(stage)
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::MissingSession` without a user and
    /// `OnboardingError::Storage` if the write fails.
    pub async fn mark_onboarding_complete(&self) -> Result<(), OnboardingError> {
        let user_id = require_user(self.sessions.as_ref()).await?;
        let update = ProfileUpdate::new()
            .with_onboarding_completed(true)
            .with_onboarding_step(OnboardingStage::Done.progress_step());
        self.profiles
            .update_profile(user_id, &update)
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to mark onboarding complete"))?;
        info!(%user_id, "onboarding complete");
        Ok(())
    }
}
