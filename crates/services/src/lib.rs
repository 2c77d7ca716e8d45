#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessment_service;
pub mod auth_service;
pub mod error;
pub mod goal_service;
pub mod interest_service;
pub mod profile_service;

pub use plan_core::Clock;

pub use app_services::AppServices;
pub use assessment_service::AssessmentService;
pub use auth_service::AuthService;
pub use error::{AppServicesError, OnboardingError};
pub use goal_service::GoalService;
pub use interest_service::InterestService;
pub use profile_service::ProfileService;
