use std::sync::Arc;

use plan_core::model::{AssessmentRecord, OnboardingStage, ProfileUpdate, StepRegistry};
use storage::repository::{AssessmentRepository, ProfileRepository, SessionRepository};
use tracing::{info, warn};

use crate::Clock;
use crate::auth_service::require_user;
use crate::error::OnboardingError;

/// Writes a finished personality assessment: one appended row plus the
/// profile's trait object and progress counter.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    registry: StepRegistry,
    sessions: Arc<dyn SessionRepository>,
    assessments: Arc<dyn AssessmentRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn SessionRepository>,
        assessments: Arc<dyn AssessmentRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            clock,
            registry: StepRegistry::personality(),
            sessions,
            assessments,
            profiles,
        }
    }

    #[must_use]
    pub fn registry(&self) -> StepRegistry {
        self.registry
    }

    /// Persist `record`. Both writes must succeed before the caller may move on.
    ///
    /// Nothing is rolled back when the profile write fails after the insert;
    /// a retry appends another identical row.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Assessment` if the record misses a step,
    /// `OnboardingError::MissingSession` without a user, and
    /// `OnboardingError::Storage` if either write fails.
    pub async fn submit(&self, record: &AssessmentRecord) -> Result<(), OnboardingError> {
        AssessmentRecord::from_columns(self.registry, &record.columns())?;
        let user_id = require_user(self.sessions.as_ref()).await?;

        self.assessments
            .insert_assessment_record(user_id, record, self.clock.now())
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to insert assessment"))?;

        let update = ProfileUpdate::new()
            .with_personality_traits(record.traits_json())
            .with_onboarding_step(OnboardingStage::Interests.progress_step());
        self.profiles
            .update_profile(user_id, &update)
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to store personality traits"))?;

        info!(%user_id, answers = record.answers().len(), "personality assessment saved");
        Ok(())
    }
}
