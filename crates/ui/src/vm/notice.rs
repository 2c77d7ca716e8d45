use dioxus::prelude::*;
use plan_core::model::SelectionError;
use services::OnboardingError;
use storage::repository::StorageError;

/// Transient message shown above the active onboarding step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: &'static str,
    pub retryable: bool,
}

impl Notice {
    #[must_use]
    pub fn from_error(err: &OnboardingError) -> Self {
        let message = match err {
            OnboardingError::MissingSession
            | OnboardingError::Storage(StorageError::Unauthorized) => {
                "Your session has ended. Please sign in again."
            }
            OnboardingError::Storage(_) => {
                "We couldn't save that. Check your connection and try again."
            }
            OnboardingError::Selection(SelectionError::Empty) => "Pick at least one to continue.",
            _ => "Something went wrong. Please try again.",
        };
        Self {
            message,
            retryable: err.is_retryable(),
        }
    }
}

/// Shared slot the onboarding sub-flows report failures into.
#[derive(Clone, Copy, PartialEq)]
pub struct NoticeSlot(pub Signal<Option<Notice>>);

impl NoticeSlot {
    pub fn show(mut self, notice: Notice) {
        self.0.set(Some(notice));
    }

    pub fn clear(mut self) {
        self.0.set(None);
    }

    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        self.0.read().clone()
    }
}
