use plan_core::model::{Goal, GoalSelection, OnboardingStage, PERSONALITY_STEPS, ProfileUpdate};
use storage::repository::ProfileRepository;

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn onboarding_view_opens_on_splash_for_new_user() {
    let mut harness = setup_view_harness(ViewKind::Onboarding, true);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Welcome to Gather"), "missing splash in {html}");
    assert!(html.contains("Get started"), "missing start button in {html}");
    assert!(!html.contains("Step 1 of 4"), "splash should not count steps: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_view_opens_on_done_for_completed_profile() {
    let mut harness = setup_view_harness(ViewKind::Onboarding, true);
    harness
        .repo
        .update_profile(harness.user, &ProfileUpdate::new().with_onboarding_completed(true))
        .await
        .expect("mark complete");

    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("all set"), "missing done screen in {html}");
    assert!(!html.contains("Welcome to Gather"), "splash rendered for completed user: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_view_reports_missing_session() {
    let mut harness = setup_view_harness(ViewKind::Onboarding, false);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Please sign in to continue"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn goals_select_starts_with_continue_disabled() {
    let mut harness = setup_view_harness(ViewKind::Stage(OnboardingStage::GoalsSelect), true);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Meet new people"), "missing catalog in {html}");
    assert!(html.contains("primary is-disabled"), "continue should be disabled: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn goals_rank_lists_stored_goals_in_priority_order() {
    let mut harness = setup_view_harness(ViewKind::Stage(OnboardingStage::GoalsRank), true);
    let mut selection = GoalSelection::new();
    selection.toggle("family-time").expect("toggle");
    selection.toggle("reconnect").expect("toggle");
    harness
        .repo
        .update_profile(harness.user, &ProfileUpdate::new().with_goals(selection.to_goals()))
        .await
        .expect("store goals");

    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    let family = html.find("Spend more time with family").expect("family goal");
    let reconnect = html.find("Reconnect with old friends").expect("reconnect goal");
    assert!(family < reconnect, "goals out of order in {html}");
    assert!(html.contains("Confirm order"), "missing confirm in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn personality_step_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Stage(OnboardingStage::Personality), true);
    harness.rebuild();

    let html = harness.render();
    let first = &PERSONALITY_STEPS[0];
    assert!(html.contains("Question 1 of 3"), "missing progress in {html}");
    assert!(html.contains(first.title), "missing title in {html}");
    for option in first.options {
        assert!(html.contains(option), "missing option {option} in {html}");
    }
    assert!(html.contains("primary is-disabled"), "continue should be disabled: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_lists_goals_and_interests() {
    let mut harness = setup_view_harness(ViewKind::Home, true);
    let update = ProfileUpdate::new()
        .with_onboarding_completed(true)
        .with_goals(vec![
            Goal {
                id: "plan-more".into(),
                label: "Plan more get-togethers".into(),
                priority: 2,
            },
            Goal {
                id: "reconnect".into(),
                label: "Reconnect with old friends".into(),
                priority: 1,
            },
        ])
        .with_interests(vec!["Hiking".into(), "Board games".into()]);
    harness
        .repo
        .update_profile(harness.user, &update)
        .await
        .expect("store profile");

    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    let top = html.find("Reconnect with old friends").expect("top goal");
    let second = html.find("Plan more get-togethers").expect("second goal");
    assert!(top < second, "goals out of order in {html}");
    assert!(html.contains("Board games"), "missing interests in {html}");
    assert!(html.contains("Sign out"), "missing sign out in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_points_unfinished_users_to_onboarding() {
    let mut harness = setup_view_harness(ViewKind::Home, true);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Continue onboarding"), "missing onboarding link in {html}");
}
