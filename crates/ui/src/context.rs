use std::sync::Arc;

use plan_core::model::AuthEvent;
use services::{AssessmentService, AuthService, GoalService, InterestService, ProfileService};
use storage::repository::AuthSubscription;
use tracing::info;

use crate::vm::OnboardingServices;

pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn profiles(&self) -> Arc<ProfileService>;
    fn goals(&self) -> Arc<GoalService>;
    fn assessments(&self) -> Arc<AssessmentService>;
    fn interests(&self) -> Arc<InterestService>;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    profiles: Arc<ProfileService>,
    goals: Arc<GoalService>,
    assessments: Arc<AssessmentService>,
    interests: Arc<InterestService>,
    // Held for its Drop; the listener stays registered while any context clone lives.
    _auth_watch: Arc<AuthSubscription>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let auth = app.auth();
        let auth_watch = auth.watch(Arc::new(|event: &AuthEvent| match event {
            AuthEvent::SignedIn(session) => {
                info!(user_id = %session.user_id, "auth state changed: signed in");
            }
            AuthEvent::SignedOut => info!("auth state changed: signed out"),
        }));

        Self {
            auth,
            profiles: app.profiles(),
            goals: app.goals(),
            assessments: app.assessments(),
            interests: app.interests(),
            _auth_watch: Arc::new(auth_watch),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn onboarding_services(&self) -> OnboardingServices {
        OnboardingServices {
            profiles: Arc::clone(&self.profiles),
            goals: Arc::clone(&self.goals),
            assessments: Arc::clone(&self.assessments),
            interests: Arc::clone(&self.interests),
        }
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
