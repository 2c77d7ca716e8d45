use std::sync::Arc;

use plan_core::model::{
    GoalSelection, InterestSelection, OnboardingStage, RankedGoals, SelectionError,
    StageTransition, StageTrigger,
};
use services::{AssessmentService, GoalService, InterestService, OnboardingError, ProfileService};
use tracing::debug;

/// Services the onboarding stages write through.
#[derive(Clone)]
pub struct OnboardingServices {
    pub profiles: Arc<ProfileService>,
    pub goals: Arc<GoalService>,
    pub assessments: Arc<AssessmentService>,
    pub interests: Arc<InterestService>,
}

/// Drives `splash -> goals-select -> goals-rank -> personality -> interests -> done`.
///
/// Stage methods take `&self`, do their remote work and return the
/// transition they earned; `apply` commits it. Views clone the VM out of
/// their signal before awaiting.
#[derive(Clone)]
pub struct OnboardingVm {
    stage: OnboardingStage,
    services: OnboardingServices,
}

impl PartialEq for OnboardingVm {
    fn eq(&self, other: &Self) -> bool {
        self.stage == other.stage
    }
}

impl OnboardingVm {
    #[must_use]
    pub fn new(services: OnboardingServices, entry: OnboardingStage) -> Self {
        Self {
            stage: entry,
            services,
        }
    }

    #[must_use]
    pub fn stage(&self) -> OnboardingStage {
        self.stage
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.services.assessments)
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::Stage` outside the splash stage.
    pub fn acknowledge(&self) -> Result<StageTransition, OnboardingError> {
        Ok(self.stage.transition(StageTrigger::Acknowledged)?)
    }

    /// # Errors
    ///
    /// Returns `OnboardingError::Selection` for an empty selection and any
    /// storage failure; the stage is not advanced.
    pub async fn submit_goals(
        &self,
        selection: &GoalSelection,
    ) -> Result<StageTransition, OnboardingError> {
        let transition = self.stage.transition(StageTrigger::GoalsChosen)?;
        self.services.goals.save_selection(selection).await?;
        Ok(transition)
    }

    /// Goals saved by the previous stage, in their stored order.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Selection` when no goals were stored.
    pub async fn load_ranking(&self) -> Result<RankedGoals, OnboardingError> {
        let goals = self
            .services
            .profiles
            .load()
            .await?
            .map(|profile| profile.goals)
            .unwrap_or_default();
        Ok(RankedGoals::from_goals(&goals)?)
    }

    /// # Errors
    ///
    /// Returns `OnboardingError` if the ranking cannot be stored.
    pub async fn confirm_ranking(
        &self,
        ranking: &RankedGoals,
    ) -> Result<StageTransition, OnboardingError> {
        let transition = self.stage.transition(StageTrigger::RankingConfirmed)?;
        self.services.goals.save_ranking(ranking).await?;
        Ok(transition)
    }

    /// Called once the assessment wizard reports its record as persisted.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Stage` outside the personality stage.
    pub fn assessment_saved(&self) -> Result<StageTransition, OnboardingError> {
        Ok(self.stage.transition(StageTrigger::AssessmentPersisted)?)
    }

    /// Store interests, then flag onboarding as complete.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Selection` when nothing is picked and any
    /// storage failure from either write.
    pub async fn submit_interests(
        &self,
        selection: &InterestSelection,
    ) -> Result<StageTransition, OnboardingError> {
        let transition = self.stage.transition(StageTrigger::InterestsPersisted)?;
        if selection.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        self.services.interests.save_interests(selection).await?;
        self.services.profiles.mark_onboarding_complete().await?;
        Ok(transition)
    }

    /// Commit a transition produced by one of the stage methods.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Stage` when the stage moved on since the
    /// transition was produced.
    pub fn apply(&mut self, transition: StageTransition) -> Result<OnboardingStage, OnboardingError> {
        let stage = transition.apply(&mut self.stage)?;
        debug!(from = %transition.from, to = %stage, "onboarding stage advanced");
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use plan_core::model::{
        PERSONALITY_STEPS, Profile, ProfileField, ProfileUpdate, Session, StageError, UserId,
    };
    use plan_core::time::fixed_clock;
    use storage::repository::{
        AssessmentRepository, InMemoryRepository, ProfileRepository, StorageError,
    };

    use super::*;
    use crate::vm::{AdvanceOutcome, AssessmentVm};

    /// Counts profile writes that flag onboarding as complete.
    #[derive(Clone)]
    struct CountingProfiles {
        inner: InMemoryRepository,
        completions: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl ProfileRepository for CountingProfiles {
        async fn update_profile(
            &self,
            user_id: UserId,
            update: &ProfileUpdate,
        ) -> Result<(), StorageError> {
            if update.marks_complete() {
                *self.completions.lock().unwrap() += 1;
            }
            self.inner.update_profile(user_id, update).await
        }

        async fn get_profile(
            &self,
            user_id: UserId,
            fields: &[ProfileField],
        ) -> Result<Option<Profile>, StorageError> {
            self.inner.get_profile(user_id, fields).await
        }
    }

    struct Fixture {
        repo: InMemoryRepository,
        user: UserId,
        completions: Arc<Mutex<usize>>,
        services: OnboardingServices,
    }

    fn fixture() -> Fixture {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        repo.sign_in(Session::new(user, None)).unwrap();
        let completions = Arc::new(Mutex::new(0));
        let profiles: Arc<dyn ProfileRepository> = Arc::new(CountingProfiles {
            inner: repo.clone(),
            completions: Arc::clone(&completions),
        });
        let sessions = Arc::new(repo.clone());
        let services = OnboardingServices {
            profiles: Arc::new(ProfileService::new(sessions.clone(), Arc::clone(&profiles))),
            goals: Arc::new(GoalService::new(sessions.clone(), Arc::clone(&profiles))),
            assessments: Arc::new(AssessmentService::new(
                fixed_clock(),
                sessions.clone(),
                Arc::new(repo.clone()),
                Arc::clone(&profiles),
            )),
            interests: Arc::new(InterestService::new(sessions, profiles)),
        };
        Fixture {
            repo,
            user,
            completions,
            services,
        }
    }

    #[tokio::test]
    async fn empty_goal_selection_does_not_advance() {
        let fixture = fixture();
        let mut vm = OnboardingVm::new(fixture.services, OnboardingStage::Splash);
        let transition = vm.acknowledge().unwrap();
        vm.apply(transition).unwrap();

        let err = vm.submit_goals(&GoalSelection::new()).await.unwrap_err();
        assert!(matches!(err, OnboardingError::Selection(SelectionError::Empty)));
        assert_eq!(vm.stage(), OnboardingStage::GoalsSelect);
    }

    #[tokio::test]
    async fn empty_interests_do_not_complete_onboarding() {
        let fixture = fixture();
        let vm = OnboardingVm::new(fixture.services, OnboardingStage::Interests);

        let err = vm.submit_interests(&InterestSelection::new()).await.unwrap_err();
        assert!(matches!(err, OnboardingError::Selection(SelectionError::Empty)));
        assert_eq!(vm.stage(), OnboardingStage::Interests);
        assert_eq!(*fixture.completions.lock().unwrap(), 0);
        let profile = fixture
            .repo
            .get_profile(fixture.user, &ProfileField::ALL)
            .await
            .unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn triggers_for_other_stages_are_rejected() {
        let fixture = fixture();
        let vm = OnboardingVm::new(fixture.services, OnboardingStage::Splash);
        let err = vm.assessment_saved().unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::Stage(StageError::UnexpectedTrigger { .. })
        ));
        assert_eq!(vm.stage(), OnboardingStage::Splash);
    }

    #[tokio::test]
    async fn stale_transition_is_not_applied_twice() {
        let fixture = fixture();
        let mut vm = OnboardingVm::new(fixture.services, OnboardingStage::Splash);
        let transition = vm.acknowledge().unwrap();
        vm.apply(transition).unwrap();
        assert!(vm.apply(transition).is_err());
        assert_eq!(vm.stage(), OnboardingStage::GoalsSelect);
    }

    #[tokio::test]
    async fn full_flow_reaches_done_once_and_completes_once() {
        let fixture = fixture();
        let mut vm = OnboardingVm::new(fixture.services.clone(), OnboardingStage::Splash);

        let transition = vm.acknowledge().unwrap();
        vm.apply(transition).unwrap();

        let mut goals = GoalSelection::new();
        goals.toggle("reconnect").unwrap();
        goals.toggle("plan-more").unwrap();
        let transition = vm.submit_goals(&goals).await.unwrap();
        vm.apply(transition).unwrap();

        let mut ranking = vm.load_ranking().await.unwrap();
        ranking.move_down(0).unwrap();
        let transition = vm.confirm_ranking(&ranking).await.unwrap();
        vm.apply(transition).unwrap();
        assert_eq!(vm.stage(), OnboardingStage::Personality);

        let mut wizard = AssessmentVm::new(vm.assessments().registry());
        let outcome = loop {
            let option = wizard.step().unwrap().options[0];
            wizard.select_option(option).unwrap();
            match wizard.advance(&vm.assessments()).await.unwrap() {
                AdvanceOutcome::Moved(_) => {}
                other => break other,
            }
        };
        assert!(matches!(outcome, AdvanceOutcome::Completed(_)));
        let transition = vm.assessment_saved().unwrap();
        vm.apply(transition).unwrap();

        let mut interests = InterestSelection::new();
        interests.toggle("Hiking").unwrap();
        let transition = vm.submit_interests(&interests).await.unwrap();
        assert_eq!(vm.apply(transition).unwrap(), OnboardingStage::Done);
        assert!(vm.apply(transition).is_err());

        assert_eq!(*fixture.completions.lock().unwrap(), 1);
        let rows = fixture.repo.list_assessments(fixture.user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.answers().len(), PERSONALITY_STEPS.len());

        let profile = fixture
            .repo
            .get_profile(fixture.user, &ProfileField::ALL)
            .await
            .unwrap()
            .unwrap();
        assert!(profile.onboarding_completed);
        assert_eq!(profile.goals[0].id, "plan-more");
        assert_eq!(profile.interests, ["Hiking"]);
        assert!(profile.personality_traits.is_some());
    }
}
