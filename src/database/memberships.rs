use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::access::{DirectoryError, MembershipDirectory, Role};
use crate::database::models::{RoleMembership, Season};

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User {user_id} already has a role in season {season_id}")]
    AlreadyEnrolled { user_id: Uuid, season_id: Uuid },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Roster access over the seasons and role_memberships tables.
///
/// The role_memberships table carries UNIQUE (user_id, season_id), which is
/// what holds the one-role-per-user-per-season invariant; `enroll` surfaces
/// that constraint as `AlreadyEnrolled`.
#[derive(Clone)]
pub struct MembershipStore {
    pool: PgPool,
}

impl MembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn membership_from_row(row: &sqlx::postgres::PgRow) -> Result<RoleMembership, sqlx::Error> {
        let role_str: String = row.get("role");
        let role = Role::from_str(&role_str).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "role".into(),
            source: format!("unknown role '{}'", role_str).into(),
        })?;

        Ok(RoleMembership {
            id: row.get("id"),
            user_id: row.get("user_id"),
            season_id: row.get("season_id"),
            role,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Add a user to a season's roster.
    pub async fn enroll(
        &self,
        user_id: Uuid,
        season_id: Uuid,
        role: Role,
    ) -> Result<RoleMembership, MembershipError> {
        let row = sqlx::query(
            r#"
            INSERT INTO role_memberships (id, user_id, season_id, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, season_id, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(season_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().map_or(false, |d| d.is_unique_violation()) {
                MembershipError::AlreadyEnrolled { user_id, season_id }
            } else {
                MembershipError::Database(e)
            }
        })?;

        Ok(Self::membership_from_row(&row)?)
    }

    /// Change the role a user holds in a season.
    pub async fn set_role(
        &self,
        user_id: Uuid,
        season_id: Uuid,
        role: Role,
    ) -> Result<RoleMembership, MembershipError> {
        let row = sqlx::query(
            r#"
            UPDATE role_memberships
            SET role = $3, updated_at = now()
            WHERE user_id = $1 AND season_id = $2
            RETURNING id, user_id, season_id, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(season_id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            MembershipError::NotFound(format!("user {} has no membership in season {}", user_id, season_id))
        })?;

        Ok(Self::membership_from_row(&row)?)
    }

    /// End a user's membership in a season.
    pub async fn withdraw(&self, user_id: Uuid, season_id: Uuid) -> Result<(), MembershipError> {
        let result = sqlx::query("DELETE FROM role_memberships WHERE user_id = $1 AND season_id = $2")
            .bind(user_id)
            .bind(season_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MembershipError::NotFound(format!(
                "user {} has no membership in season {}",
                user_id, season_id
            )));
        }
        Ok(())
    }

    /// All seasons the user belongs to, newest membership first, with the
    /// role held in each.
    pub async fn seasons_for(&self, user_id: Uuid) -> Result<Vec<(Season, Role)>, MembershipError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.year, s.name, s.created_at, s.updated_at, m.role
            FROM role_memberships m
            JOIN seasons s ON s.id = m.season_id
            WHERE m.user_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut seasons = Vec::with_capacity(rows.len());
        for row in rows {
            let role_str: String = row.get("role");
            if let Some(role) = Role::from_str(&role_str) {
                seasons.push((
                    Season {
                        id: row.get("id"),
                        year: row.get("year"),
                        name: row.get("name"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                    role,
                ));
            }
        }
        Ok(seasons)
    }

    pub async fn create_season(&self, year: i32, name: &str) -> Result<Season, MembershipError> {
        let season = sqlx::query_as::<_, Season>(
            r#"
            INSERT INTO seasons (id, year, name)
            VALUES ($1, $2, $3)
            RETURNING id, year, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(year)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(season)
    }

    pub async fn list_seasons(&self) -> Result<Vec<Season>, MembershipError> {
        let seasons = sqlx::query_as::<_, Season>(
            "SELECT id, year, name, created_at, updated_at FROM seasons ORDER BY year DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(seasons)
    }

    /// Roster of a season: (membership, member email), for admin listings.
    pub async fn roster(&self, season_id: Uuid) -> Result<Vec<(RoleMembership, String)>, MembershipError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.user_id, m.season_id, m.role, m.created_at, m.updated_at, u.email
            FROM role_memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.season_id = $1 AND u.deleted_at IS NULL
            ORDER BY m.created_at
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        let mut roster = Vec::with_capacity(rows.len());
        for row in &rows {
            let email: String = row.get("email");
            roster.push((Self::membership_from_row(row)?, email));
        }
        Ok(roster)
    }
}

#[async_trait]
impl MembershipDirectory for MembershipStore {
    async fn role_of(&self, user_id: Uuid, season_id: Uuid) -> Result<Option<Role>, DirectoryError> {
        let row = sqlx::query("SELECT role FROM role_memberships WHERE user_id = $1 AND season_id = $2")
            .bind(user_id)
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(row.and_then(|r| {
            let role_str: String = r.get("role");
            Role::from_str(&role_str)
        }))
    }

    async fn latest_season_for(&self, user_id: Uuid) -> Result<Option<Season>, DirectoryError> {
        let season = sqlx::query_as::<_, Season>(
            r#"
            SELECT s.id, s.year, s.name, s.created_at, s.updated_at
            FROM role_memberships m
            JOIN seasons s ON s.id = m.season_id
            WHERE m.user_id = $1
            ORDER BY m.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(season)
    }

    async fn season_by_id(&self, season_id: Uuid) -> Result<Option<Season>, DirectoryError> {
        let season = sqlx::query_as::<_, Season>(
            "SELECT id, year, name, created_at, updated_at FROM seasons WHERE id = $1",
        )
        .bind(season_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(season)
    }
}
