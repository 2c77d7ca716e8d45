use plan_core::model::{AssessmentRecord, Goal, Profile, UserId};
use sqlx::Row;

use crate::repository::{StorageError, StoredAssessment};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn user_id_from_text(raw: &str) -> Result<UserId, StorageError> {
    raw.parse::<UserId>().map_err(ser)
}

pub(crate) fn to_json_text<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(ser)
}

pub(crate) fn map_profile_row(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, StorageError> {
    let user_id = user_id_from_text(&row.try_get::<String, _>("user_id").map_err(ser)?)?;
    let onboarding_step: i64 = row.try_get("onboarding_step").map_err(ser)?;
    let onboarding_step = u32::try_from(onboarding_step)
        .map_err(|_| StorageError::Serialization("onboarding_step out of range".into()))?;
    let personality_traits = row
        .try_get::<Option<String>, _>("personality_traits")
        .map_err(ser)?
        .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
        .transpose()
        .map_err(ser)?;
    let interests: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("interests").map_err(ser)?).map_err(ser)?;
    let goals: Vec<Goal> =
        serde_json::from_str(&row.try_get::<String, _>("goals").map_err(ser)?).map_err(ser)?;

    Ok(Profile {
        user_id,
        phone_number: row.try_get("phone_number").map_err(ser)?,
        onboarding_step,
        onboarding_completed: row.try_get("onboarding_completed").map_err(ser)?,
        personality_traits,
        interests,
        goals,
    })
}

pub(crate) fn map_assessment_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<StoredAssessment, StorageError> {
    let user_id = user_id_from_text(&row.try_get::<String, _>("user_id").map_err(ser)?)?;
    let record: AssessmentRecord =
        serde_json::from_str(&row.try_get::<String, _>("answers").map_err(ser)?).map_err(ser)?;
    Ok(StoredAssessment {
        user_id,
        record,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
