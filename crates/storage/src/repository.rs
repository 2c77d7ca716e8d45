use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plan_core::model::{
    AssessmentRecord, AuthEvent, Profile, ProfileField, ProfileUpdate, Session, UserId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not authenticated")]
    Unauthorized,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("remote store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Assessment row as stored: the answers plus who submitted them and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAssessment {
    pub user_id: UserId,
    pub record: AssessmentRecord,
    pub created_at: DateTime<Utc>,
}

//
// ─── AUTH CHANGES ──────────────────────────────────────────────────────────────
//

pub type AuthListener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// Fan-out of auth events to registered listeners. Shared by every backend.
#[derive(Clone, Default)]
pub struct AuthBroadcaster {
    listeners: Arc<Mutex<BTreeMap<u64, AuthListener>>>,
    next_id: Arc<AtomicU64>,
}

impl AuthBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut guard) = self.listeners.lock() {
            guard.insert(id, listener);
        }
        AuthSubscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn emit(&self, event: &AuthEvent) {
        // Snapshot so a listener may subscribe or unsubscribe while being notified.
        let listeners: Vec<AuthListener> = match self.listeners.lock() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

/// Keeps an auth listener registered until dropped.
pub struct AuthSubscription {
    id: u64,
    listeners: std::sync::Weak<Mutex<BTreeMap<u64, AuthListener>>>,
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut guard) = listeners.lock() {
                guard.remove(&self.id);
            }
        }
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Authentication side of the remote store.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Session of the signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn current_session(&self) -> Result<Option<Session>, StorageError>;

    /// End the current session. Signing out without a session is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store rejects the request.
    async fn sign_out(&self) -> Result<(), StorageError>;

    /// Register `listener` for sign-in/sign-out events until the returned guard drops.
    fn subscribe_to_auth_changes(&self, listener: AuthListener) -> AuthSubscription;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Partial upsert keyed by user id. No concurrency control; last write wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate)
    -> Result<(), StorageError>;

    /// Fetch the selected columns of a profile. Unselected fields hold defaults.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the read fails.
    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> Result<Option<Profile>, StorageError>;
}

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Append one assessment row for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn insert_assessment_record(
        &self,
        user_id: UserId,
        record: &AssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Rows previously inserted for `user_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the read fails.
    async fn list_assessments(&self, user_id: UserId) -> Result<Vec<StoredAssessment>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<Session>>>,
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    assessments: Arc<Mutex<Vec<StoredAssessment>>>,
    auth: AuthBroadcaster,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the session lock is poisoned.
    pub fn sign_in(&self, session: Session) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(session.clone());
        drop(guard);
        self.auth.emit(&AuthEvent::SignedIn(session));
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        let previous = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .take();
        if previous.is_some() {
            self.auth.emit(&AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe_to_auth_changes(&self, listener: AuthListener) -> AuthSubscription {
        self.auth.subscribe(listener)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let profile = guard
            .entry(user_id)
            .or_insert_with(|| Profile::empty(user_id));
        update.apply_to(profile);
        Ok(())
    }

    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> Result<Option<Profile>, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user_id).map(|profile| profile.project(fields)))
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryRepository {
    async fn insert_assessment_record(
        &self,
        user_id: UserId,
        record: &AssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .assessments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(StoredAssessment {
            user_id,
            record: record.clone(),
            created_at,
        });
        Ok(())
    }

    async fn list_assessments(&self, user_id: UserId) -> Result<Vec<StoredAssessment>, StorageError> {
        let guard = self
            .assessments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Aggregates the remote-store contracts behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub assessments: Arc<dyn AssessmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryRepository::new())
    }

    /// Share one in-memory repository across every contract.
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let assessments: Arc<dyn AssessmentRepository> = Arc::new(repo.clone());
        Self {
            sessions,
            profiles,
            assessments,
        }
    }
}
