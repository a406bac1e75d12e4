use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::access::Role;

/// Role assignment for one user within one season.
///
/// At most one row may exist per (user_id, season_id); the roster table
/// carries a composite UNIQUE constraint to match.
#[derive(Debug, Clone, Serialize)]
pub struct RoleMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub season_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
