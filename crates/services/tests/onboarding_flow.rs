use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plan_core::model::{
    AssessmentRecord, AssessmentState, GoalSelection, InterestSelection, OnboardingStage, Profile,
    ProfileField, ProfileUpdate, Session, StepMove, StepRegistry, UserId,
};
use plan_core::time::fixed_clock;
use services::{AppServices, AssessmentService, OnboardingError};
use storage::repository::{
    AssessmentRepository, InMemoryRepository, ProfileRepository, Storage, StorageError,
    StoredAssessment,
};
use storage::sqlite::SqliteRepository;

fn answered_record() -> AssessmentRecord {
    let mut state = AssessmentState::new(StepRegistry::personality());
    loop {
        let step = state.current_step().expect("step");
        state.select_option(step.options[0]).expect("select");
        if state.step_forward() == StepMove::Final {
            break;
        }
    }
    state.assemble_record().expect("record")
}

#[tokio::test]
async fn sqlite_onboarding_writes_full_profile() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_onboarding_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    repo.migrate().await.expect("migrate");
    let user = UserId::random();
    repo.sign_in(&Session::new(user, Some("ana@example.com".into())))
        .await
        .expect("sign in");

    let services = AppServices::new(&Storage::from_sqlite(&repo), fixed_clock());
    assert_eq!(
        services.profiles().entry_stage().await.expect("entry"),
        OnboardingStage::Splash
    );

    let mut goals = GoalSelection::new();
    goals.toggle("reconnect").expect("goal");
    goals.toggle("family-time").expect("goal");
    services.goals().save_selection(&goals).await.expect("save goals");

    let mut ranking = goals.into_ranking().expect("ranking");
    ranking.move_down(0).expect("move");
    services.goals().save_ranking(&ranking).await.expect("save ranking");

    services
        .assessments()
        .submit(&answered_record())
        .await
        .expect("submit assessment");

    let mut interests = InterestSelection::new();
    interests.toggle("Board games").expect("interest");
    services.interests().save_interests(&interests).await.expect("save interests");
    services
        .profiles()
        .mark_onboarding_complete()
        .await
        .expect("complete");

    let profile = services.profiles().load().await.expect("load").expect("profile");
    assert!(profile.onboarding_completed);
    assert_eq!(profile.onboarding_step, OnboardingStage::Done.progress_step());
    let goal_ids: Vec<_> = profile.goals.iter().map(|goal| goal.id.as_str()).collect();
    assert_eq!(goal_ids, ["family-time", "reconnect"]);
    assert_eq!(profile.interests, vec!["Board games".to_string()]);
    assert_eq!(
        profile.personality_traits,
        Some(answered_record().traits_json())
    );
    assert_eq!(repo.list_assessments(user).await.expect("rows").len(), 1);
    assert_eq!(
        services.profiles().entry_stage().await.expect("entry"),
        OnboardingStage::Done
    );
}

/// Fails the first `failures` inserts, then delegates to the in-memory store.
struct FlakyAssessments {
    inner: InMemoryRepository,
    failures: AtomicUsize,
    attempts: AtomicUsize,
}

#[async_trait]
impl AssessmentRepository for FlakyAssessments {
    async fn insert_assessment_record(
        &self,
        user_id: UserId,
        record: &AssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::Connection("network down".into()));
        }
        self.inner
            .insert_assessment_record(user_id, record, created_at)
            .await
    }

    async fn list_assessments(&self, user_id: UserId) -> Result<Vec<StoredAssessment>, StorageError> {
        self.inner.list_assessments(user_id).await
    }
}

#[tokio::test]
async fn failed_insert_is_retryable_and_skips_profile_write() {
    let repo = InMemoryRepository::new();
    let user = UserId::random();
    repo.sign_in(Session::new(user, None)).expect("sign in");
    let flaky = Arc::new(FlakyAssessments {
        inner: repo.clone(),
        failures: AtomicUsize::new(1),
        attempts: AtomicUsize::new(0),
    });
    let service = AssessmentService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        flaky.clone(),
        Arc::new(repo.clone()),
    );

    let record = answered_record();
    let err = service.submit(&record).await.unwrap_err();
    assert!(err.is_retryable(), "unexpected error {err:?}");
    assert!(matches!(err, OnboardingError::Storage(StorageError::Connection(_))));

    let profile = services_profile(&repo, user).await;
    assert!(profile.is_none(), "profile must not be written after a failed insert");

    service.submit(&record).await.expect("retry succeeds");
    assert_eq!(flaky.attempts.load(Ordering::SeqCst), 2);
    let rows = repo.list_assessments(user).await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record, record);
}

async fn services_profile(repo: &InMemoryRepository, user: UserId) -> Option<Profile> {
    repo.get_profile(user, &ProfileField::ALL).await.expect("read")
}

/// Rejects the first `failures` profile writes, then delegates to the in-memory store.
struct FlakyProfiles {
    inner: InMemoryRepository,
    failures: AtomicUsize,
}

#[async_trait]
impl ProfileRepository for FlakyProfiles {
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), StorageError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::Connection("profile store down".into()));
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

#[tokio::test]
async fn failed_profile_write_after_insert_is_retryable() {
    let repo = InMemoryRepository::new();
    let user = UserId::random();
    repo.sign_in(Session::new(user, None)).expect("sign in");
    let service = AssessmentService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(FlakyProfiles {
            inner: repo.clone(),
            failures: AtomicUsize::new(1),
        }),
    );

    let record = answered_record();
    let err = service.submit(&record).await.unwrap_err();
    assert!(err.is_retryable(), "unexpected error {err:?}");
    assert!(matches!(err, OnboardingError::Storage(StorageError::Connection(_))));
    assert_eq!(repo.list_assessments(user).await.expect("rows").len(), 1);
    assert!(services_profile(&repo, user).await.is_none());

    service.submit(&record).await.expect("retry succeeds");
    let rows = repo.list_assessments(user).await.expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record, rows[1].record);
    let profile = services_profile(&repo, user).await.expect("profile");
    assert_eq!(profile.personality_traits, Some(record.traits_json()));
}
