use std::sync::Arc;

use plan_core::model::{GoalSelection, OnboardingStage, ProfileUpdate, RankedGoals, SelectionError};
use storage::repository::{ProfileRepository, SessionRepository};
use tracing::{info, warn};

use crate::auth_service::require_user;
use crate::error::OnboardingError;

/// Persists the goal list chosen and then ranked during onboarding.
#[derive(Clone)]
pub struct GoalService {
    sessions: Arc<dyn SessionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl GoalService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { sessions, profiles }
    }

    /// Store the raw selection in pick order and move progress to ranking.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Selection` for an empty selection,
    /// `OnboardingError::MissingSession` without a user, and
    /// `OnboardingError::Storage` if the write fails.
    pub async fn save_selection(&self, selection: &GoalSelection) -> Result<(), OnboardingError> {
        if selection.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        let user_id = require_user(self.sessions.as_ref()).await?;
        let update = ProfileUpdate::new()
            .with_goals(selection.to_goals())
            .with_onboarding_step(OnboardingStage::GoalsRank.progress_step());
        self.profiles
            .update_profile(user_id, &update)
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to save goal selection"))?;
        info!(%user_id, count = selection.len(), "goal selection saved");
        Ok(())
    }

    /// Store the ranked goals with their priorities and move progress to the assessment.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::MissingSession` without a user and
    /// `OnboardingError::Storage` if the write fails.
    pub async fn save_ranking(&self, ranking: &RankedGoals) -> Result<(), OnboardingError> {
        if ranking.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        let user_id = require_user(self.sessions.as_ref()).await?;
        let update = ProfileUpdate::new()
            .with_goals(ranking.to_goals())
            .with_onboarding_step(OnboardingStage::Personality.progress_step());
        self.profiles
            .update_profile(user_id, &update)
            .await
            .inspect_err(|err| warn!(%user_id, error = %err, "failed to save goal ranking"))?;
        info!(%user_id, count = ranking.len(), "goal ranking saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::model::{ProfileField, Session, UserId};
    use storage::repository::InMemoryRepository;

    fn service(repo: &InMemoryRepository) -> GoalService {
        GoalService::new(Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_before_any_write() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        repo.sign_in(Session::new(user, None)).unwrap();

        let err = service(&repo)
            .save_selection(&GoalSelection::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::Selection(SelectionError::Empty)));
        assert!(repo.get_profile(user, &ProfileField::ALL).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ranking_overwrites_raw_selection() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        repo.sign_in(Session::new(user, None)).unwrap();
        let service = service(&repo);

        let mut selection = GoalSelection::new();
        selection.toggle("reconnect").unwrap();
        selection.toggle("meet-new-people").unwrap();
        service.save_selection(&selection).await.unwrap();

        let mut ranking = selection.into_ranking().unwrap();
        ranking.move_up(1).unwrap();
        service.save_ranking(&ranking).await.unwrap();

        let profile = repo
            .get_profile(user, &ProfileField::ALL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.goals[0].id, "meet-new-people");
        assert_eq!(profile.goals[0].priority, 1);
        assert_eq!(profile.onboarding_step, OnboardingStage::Personality.progress_step());
    }

    #[tokio::test]
    async fn missing_session_is_reported() {
        let repo = InMemoryRepository::new();
        let mut selection = GoalSelection::new();
        selection.toggle("reconnect").unwrap();
        let err = service(&repo).save_selection(&selection).await.unwrap_err();
        assert!(matches!(err, OnboardingError::MissingSession));
    }
}
