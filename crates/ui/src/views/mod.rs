mod home;
mod notice;
mod onboarding;
mod state;

pub use home::HomeView;
pub use notice::NoticeBanner;
pub use onboarding::{
    DoneStep, GoalsRankStep, GoalsSelectStep, InterestsStep, OnboardingView, PersonalityStep,
    SplashStep,
};
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
