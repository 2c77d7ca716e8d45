use async_trait::async_trait;
use chrono::Utc;
use plan_core::model::{Profile, ProfileField, ProfileUpdate, UserId};

use crate::repository::{ProfileRepository, StorageError};

use super::SqliteRepository;
use super::mapping::{map_profile_row, to_json_text};

const SELECT_PROFILE: &str = r"
    SELECT
        user_id,
        phone_number,
        onboarding_step,
        onboarding_completed,
        personality_traits,
        interests,
        goals
    FROM profiles
    WHERE user_id = ?1
";

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let existing = sqlx::query(SELECT_PROFILE)
            .bind(user_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        let mut profile = match existing {
            Some(row) => map_profile_row(&row)?,
            None => Profile::empty(user_id),
        };
        update.apply_to(&mut profile);

        let traits = profile
            .personality_traits
            .as_ref()
            .map(to_json_text)
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO profiles (
                user_id,
                phone_number,
                onboarding_step,
                onboarding_completed,
                personality_traits,
                interests,
                goals,
                updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id) DO UPDATE SET
                phone_number = excluded.phone_number,
                onboarding_step = excluded.onboarding_step,
                onboarding_completed = excluded.onboarding_completed,
                personality_traits = excluded.personality_traits,
                interests = excluded.interests,
                goals = excluded.goals,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id.to_string())
        .bind(profile.phone_number.as_deref())
        .bind(i64::from(profile.onboarding_step))
        .bind(profile.onboarding_completed)
        .bind(traits)
        .bind(to_json_text(&profile.interests)?)
        .bind(to_json_text(&profile.goals)?)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn get_profile(
        &self,
        user_id: UserId,
        fields: &[ProfileField],
    ) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query(SELECT_PROFILE)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.map(|row| map_profile_row(&row).map(|profile| profile.project(fields)))
            .transpose()
    }
}
