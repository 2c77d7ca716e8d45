use async_trait::async_trait;
use chrono::Utc;
use plan_core::model::{AuthEvent, Session};
use sqlx::Row;

use crate::repository::{AuthListener, AuthSubscription, SessionRepository, StorageError};

use super::SqliteRepository;
use super::mapping::user_id_from_text;

impl SqliteRepository {
    /// Store `session` as the signed-in user and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    pub async fn sign_in(&self, session: &Session) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO auth_sessions (id, user_id, email, signed_in_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                email = excluded.email,
                signed_in_at = excluded.signed_in_at
            ",
        )
        .bind(session.user_id.to_string())
        .bind(session.email.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        self.auth.emit(&AuthEvent::SignedIn(session.clone()));
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        let row = sqlx::query("SELECT user_id, email FROM auth_sessions WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row
            .try_get("user_id")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let email: Option<String> = row
            .try_get("email")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(Session::new(user_id_from_text(&user_id)?, email)))
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        if result.rows_affected() > 0 {
            self.auth.emit(&AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe_to_auth_changes(&self, listener: AuthListener) -> AuthSubscription {
        self.auth.subscribe(listener)
    }
}
