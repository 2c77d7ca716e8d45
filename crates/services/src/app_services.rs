use std::sync::Arc;

use storage::repository::Storage;
use storage::rest::RestConfig;

use crate::Clock;
use crate::assessment_service::AssessmentService;
use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::goal_service::GoalService;
use crate::interest_service::InterestService;
use crate::profile_service::ProfileService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    profiles: Arc<ProfileService>,
    goals: Arc<GoalService>,
    assessments: Arc<AssessmentService>,
    interests: Arc<InterestService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(&storage.sessions))),
            profiles: Arc::new(ProfileService::new(
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.profiles),
            )),
            goals: Arc::new(GoalService::new(
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.profiles),
            )),
            assessments: Arc::new(AssessmentService::new(
                clock,
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.assessments),
                Arc::clone(&storage.profiles),
            )),
            interests: Arc::new(InterestService::new(
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.profiles),
            )),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock))
    }

    /// Build services backed by the hosted store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be configured.
    pub fn new_rest(config: RestConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::rest(config)?;
        Ok(Self::new(&storage, clock))
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
    pub fn goals(&self) -> Arc<GoalService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }

    #[must_use]
    pub fn interests(&self) -> Arc<InterestService> {
        Arc::clone(&self.interests)
    }
}
