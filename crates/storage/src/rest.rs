//! Adapter for the hosted backend-as-a-service (PostgREST-style HTTP API).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plan_core::model::{
    AssessmentRecord, AuthEvent, Goal, Profile, ProfileField, ProfileUpdate, Session,
    StepRegistry, UserId,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::repository::{
    AssessmentRepository, AuthBroadcaster, AuthListener, AuthSubscription, ProfileRepository,
    SessionRepository, Storage, StorageError, StoredAssessment,
};

const PROFILES_TABLE: &str = "profiles";
const ASSESSMENT_TABLE: &str = "personality_assessment";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("backend url must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error("api key is empty")]
    MissingApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Connection settings for the hosted store.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Clone)]
pub struct RestRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Arc<Mutex<Option<String>>>,
    auth: AuthBroadcaster,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: UserId,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    onboarding_step: Option<u32>,
    #[serde(default)]
    onboarding_completed: Option<bool>,
    #[serde(default)]
    personality_traits: Option<serde_json::Value>,
    #[serde(default)]
    interests: Option<Vec<String>>,
    #[serde(default)]
    goals: Option<Vec<Goal>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.id,
            phone_number: row.phone_number,
            onboarding_step: row.onboarding_step.unwrap_or_default(),
            onboarding_completed: row.onboarding_completed.unwrap_or_default(),
            personality_traits: row.personality_traits,
            interests: row.interests.unwrap_or_default(),
            goals: row.goals.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssessmentRow {
    user_id: UserId,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    columns: BTreeMap<String, serde_json::Value>,
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StorageError::Unauthorized);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl RestRepository {
    /// Build a client for the hosted store.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` for a malformed URL, an empty key, or if the HTTP
    /// client cannot be constructed.
    pub fn new(config: RestConfig) -> Result<Self, RestInitError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RestInitError::InvalidUrl(config.base_url));
        }
        if config.api_key.trim().is_empty() {
            return Err(RestInitError::MissingApiKey);
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            access_token: Arc::new(Mutex::new(config.access_token)),
            auth: AuthBroadcaster::new(),
        })
    }

    fn token(&self) -> Option<String> {
        self.access_token.lock().ok().and_then(|guard| guard.clone())
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, StorageError> {
        let token = self.token().ok_or(StorageError::Unauthorized)?;
        Ok(builder
            .header("apikey", &self.api_key)
            .bearer_auth(token))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Adopt `access_token` and announce the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` if the store does not accept the token.
    /// The token is dropped again when it is rejected.
    pub async fn sign_in_with_token(&self, access_token: String) -> Result<Session, StorageError> {
        self.set_token(Some(access_token));
        let session = match self.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.set_token(None);
                return Err(StorageError::Unauthorized);
            }
            Err(err) => {
                self.set_token(None);
                return Err(err);
            }
        };
        self.auth.emit(&AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    fn set_token(&self, access_token: Option<String>) {
        if let Ok(mut guard) = self.access_token.lock() {
            *guard = access_token;
        }
    }
}

#[async_trait]
impl SessionRepository for RestRepository {
    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        if self.token().is_none() {
            return Ok(None);
        }
        let request = self.authorized(self.client.get(format!("{}/auth/v1/user", self.base_url)))?;
        let response = request.send().await.map_err(transport)?;
        let response = match check(response).await {
            Ok(response) => response,
            Err(StorageError::Unauthorized) => return Ok(None),
            Err(err) => return Err(err),
        };
        let user: AuthUser = response.json().await.map_err(ser)?;
        Ok(Some(Session::new(user.id, user.email)))
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        if self.token().is_none() {
            return Ok(());
        }
        let request =
            self.authorized(self.client.post(format!("{}/auth/v1/logout", self.base_url)))?;
        let response = request.send().await.map_err(transport)?;
        check(response).await?;
        self.set_token(None);
        self.auth.emit(&AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe_to_auth_changes(&self, listener: AuthListener) -> AuthSubscription {
        self.auth.subscribe(listener)
    }
}

#[async_trait]
impl ProfileRepository for RestRepository {
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), StorageError> {
        let mut body = serde_json::to_value(update).map_err(ser)?;
        if let Some(object) = body.as_object_mut() {
            object.insert("id".into(), serde_json::Value::String(user_id.to_string()));
        }
        debug!(%user_id, "upserting profile");
        let request = self.authorized(
            self.client
                .post(self.table_url(PROFILES_TABLE))
                .query(&[("on_conflict", "id")])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&body),
        )?;
        let response = request.send().await.map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> Result<Option<Profile>, StorageError> {
        let select = std::iter::once("id")
            .chain(fields.iter().map(ProfileField::column))
            .collect::<Vec<_>>()
            .join(",");
        let request = self.authorized(
            self.client
                .get(self.table_url(PROFILES_TABLE))
                .query(&[("id", format!("eq.{user_id}")), ("select", select)]),
        )?;
        let response = check(request.send().await.map_err(transport)?).await?;
        let rows: Vec<ProfileRow> = response.json().await.map_err(ser)?;
        Ok(rows.into_iter().next().map(Profile::from))
    }
}

#[async_trait]
impl AssessmentRepository for RestRepository {
    async fn insert_assessment_record(
        &self,
        user_id: UserId,
        record: &AssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut body = serde_json::Map::new();
        body.insert("user_id".into(), serde_json::Value::String(user_id.to_string()));
        body.insert("created_at".into(), serde_json::Value::String(created_at.to_rfc3339()));
        for (column, value) in record.columns() {
            body.insert(column, serde_json::Value::String(value));
        }
        let request = self.authorized(
            self.client
                .post(self.table_url(ASSESSMENT_TABLE))
                .header("Prefer", "return=minimal")
                .json(&body),
        )?;
        check(request.send().await.map_err(transport)?).await?;
        Ok(())
    }

    async fn list_assessments(&self, user_id: UserId) -> Result<Vec<StoredAssessment>, StorageError> {
        let request = self.authorized(self.client.get(self.table_url(ASSESSMENT_TABLE)).query(&[
            ("user_id", format!("eq.{user_id}")),
            ("select", "*".to_string()),
            ("order", "created_at.asc".to_string()),
        ]))?;
        let response = check(request.send().await.map_err(transport)?).await?;
        let rows: Vec<AssessmentRow> = response.json().await.map_err(ser)?;
        rows.into_iter()
            .map(|row| {
                let columns = row
                    .columns
                    .into_iter()
                    .filter_map(|(key, value)| match value {
                        serde_json::Value::String(text) => Some((key, text)),
                        _ => None,
                    })
                    .collect::<BTreeMap<_, _>>();
                let record = AssessmentRecord::from_columns(StepRegistry::personality(), &columns)
                    .map_err(ser)?;
                Ok(StoredAssessment {
                    user_id: row.user_id,
                    record,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}

impl Storage {
    /// Build a `Storage` backed by the hosted store.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the client cannot be configured.
    pub fn rest(config: RestConfig) -> Result<Self, RestInitError> {
        let repo = RestRepository::new(config)?;
        Ok(Self::from_rest(&repo))
    }

    #[must_use]
    pub fn from_rest(repo: &RestRepository) -> Self {
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
