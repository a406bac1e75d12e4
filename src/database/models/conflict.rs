use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A member's scheduling conflict with rehearsals or events in a season.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConflictRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub season_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
