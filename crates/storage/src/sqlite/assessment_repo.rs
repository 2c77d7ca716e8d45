use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plan_core::model::{AssessmentRecord, UserId};

use crate::repository::{AssessmentRepository, StorageError, StoredAssessment};

use super::SqliteRepository;
use super::mapping::{map_assessment_row, to_json_text};

#[async_trait]
impl AssessmentRepository for SqliteRepository {
    async fn insert_assessment_record(
        &self,
        user_id: UserId,
        record: &AssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO personality_assessments (user_id, answers, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(user_id.to_string())
        .bind(to_json_text(record)?)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn list_assessments(&self, user_id: UserId) -> Result<Vec<StoredAssessment>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, answers, created_at
            FROM personality_assessments
            WHERE user_id = ?1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        rows.iter().map(map_assessment_row).collect()
    }
}
