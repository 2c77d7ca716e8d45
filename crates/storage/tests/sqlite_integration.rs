use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use plan_core::model::{
    AssessmentRecord, AuthEvent, Goal, ProfileField, ProfileUpdate, Session, StepRegistry,
    TraitAnswer, UserId,
};
use plan_core::time::fixed_now;
use storage::repository::{AssessmentRepository, ProfileRepository, SessionRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn record(note: &str) -> AssessmentRecord {
    AssessmentRecord::new(
        StepRegistry::personality()
            .iter()
            .map(|step| TraitAnswer {
                field: step.field.to_owned(),
                answer: step.options[1].to_owned(),
                notes: note.to_owned(),
            })
            .collect(),
    )
}

#[tokio::test]
async fn sqlite_profile_partial_upserts_merge() {
    let repo = connect("memdb_profile_merge").await;
    let user = UserId::random();

    let goals = vec![
        Goal { id: "reconnect".into(), label: "Reconnect with old friends".into(), priority: 1 },
        Goal { id: "plan-more".into(), label: "Plan more get-togethers".into(), priority: 2 },
    ];
    repo.update_profile(user, &ProfileUpdate::new().with_goals(goals.clone()).with_onboarding_step(2))
        .await
        .expect("write goals");
    repo.update_profile(
        user,
        &ProfileUpdate::new()
            .with_personality_traits(record("").traits_json())
            .with_onboarding_step(4),
    )
    .await
    .expect("write traits");

    let profile = repo
        .get_profile(user, &ProfileField::ALL)
        .await
        .expect("read")
        .expect("profile exists");
    assert_eq!(profile.goals, goals);
    assert_eq!(profile.onboarding_step, 4);
    assert!(!profile.onboarding_completed);
    let traits = profile.personality_traits.expect("traits stored");
    assert_eq!(traits["planning_style"], "Loosely planned");
    assert_eq!(traits["planning_style_notes"], "");
}

#[tokio::test]
async fn sqlite_get_profile_projects_fields() {
    let repo = connect("memdb_profile_projection").await;
    let user = UserId::random();
    repo.update_profile(
        user,
        &ProfileUpdate::new()
            .with_interests(vec!["Hiking".into()])
            .with_onboarding_completed(true),
    )
    .await
    .expect("write");

    let profile = repo
        .get_profile(user, &[ProfileField::OnboardingCompleted])
        .await
        .expect("read")
        .expect("profile exists");
    assert!(profile.onboarding_completed);
    assert!(profile.interests.is_empty());

    let missing = repo
        .get_profile(UserId::random(), &ProfileField::ALL)
        .await
        .expect("read");
    assert!(missing.is_none());
}

#[tokio::test]
async fn sqlite_assessments_append_in_order() {
    let repo = connect("memdb_assessments").await;
    let user = UserId::random();
    repo.insert_assessment_record(user, &record("first"), fixed_now())
        .await
        .expect("insert");
    repo.insert_assessment_record(user, &record("second"), fixed_now())
        .await
        .expect("insert");

    let rows = repo.list_assessments(user).await.expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record, record("first"));
    assert_eq!(rows[1].record, record("second"));
    assert_eq!(rows[0].created_at, fixed_now());
}

#[tokio::test]
async fn sqlite_session_sign_in_and_out() {
    let repo = connect("memdb_sessions").await;
    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    let _subscription = repo.subscribe_to_auth_changes(Arc::new(move |event: &AuthEvent| {
        if matches!(event, AuthEvent::SignedIn(_) | AuthEvent::SignedOut) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    assert!(repo.current_session().await.expect("read").is_none());

    let session = Session::new(UserId::random(), Some("dev@example.com".into()));
    repo.sign_in(&session).await.expect("sign in");
    assert_eq!(repo.current_session().await.expect("read"), Some(session));

    repo.sign_out().await.expect("sign out");
    assert!(repo.current_session().await.expect("read").is_none());
    assert_eq!(events.load(Ordering::SeqCst), 2);
}
