use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Authenticated session as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self { user_id, email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}
