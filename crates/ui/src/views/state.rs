use dioxus::prelude::*;
use services::OnboardingError;
use storage::repository::StorageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    SignedOut,
    Unavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::SignedOut => "You're signed out. Please sign in to continue.",
            Self::Unavailable => "We couldn't reach the server. Please try again.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&OnboardingError> for ViewError {
    fn from(err: &OnboardingError) -> Self {
        match err {
            OnboardingError::MissingSession
            | OnboardingError::Storage(StorageError::Unauthorized) => Self::SignedOut,
            OnboardingError::Storage(StorageError::Connection(_) | StorageError::Rejected { .. }) => {
                Self::Unavailable
            }
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
