//! Season-scoped authorization.
//!
//! Every season-scoped operation is authorized as a function of
//! (authenticated user, resolved season, role held in that season). The
//! pieces here are deliberately free of axum and sqlx so the rules can be
//! exercised directly; the `middleware` module wires them into the router
//! and `database::memberships` provides the Postgres-backed directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::models::Season;

/// Closed role set. Roles are season-scoped: the same user may be a member
/// in one season and a coordinator in the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Coordinator,
    Admin,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Role::Member),
            "coordinator" => Some(Role::Coordinator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Coordinator => "coordinator",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was denied. All three map to the same redirect; the
/// distinction exists for logging and tests, never for the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    Unauthenticated,
    NoSeasonAvailable,
    RoleMismatch,
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessDenied::Unauthenticated => f.write_str("not signed in"),
            AccessDenied::NoSeasonAvailable => f.write_str("no season membership"),
            AccessDenied::RoleMismatch => f.write_str("role requirement not met"),
        }
    }
}

/// Per-request context assembled by the middleware chain: the signed-in
/// user and the season their request operates in. Handlers receive this
/// instead of reaching into ambient session state.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user: AuthUser,
    pub season: Season,
}

/// Exact-match role check. A role "above" the requirement still fails:
/// an admin does not satisfy a member-gated route.
pub fn authorize(held: Option<Role>, required: Role) -> Result<(), AccessDenied> {
    match held {
        Some(role) if role == required => Ok(()),
        _ => Err(AccessDenied::RoleMismatch),
    }
}

#[derive(Debug, Error)]
#[error("membership directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Read access to seasons and role assignments. Postgres in production,
/// in-memory in tests.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// The role `user_id` holds in `season_id`, if any. Pure read.
    async fn role_of(&self, user_id: Uuid, season_id: Uuid) -> Result<Option<Role>, DirectoryError>;

    /// Season of the user's most recently created membership.
    async fn latest_season_for(&self, user_id: Uuid) -> Result<Option<Season>, DirectoryError>;

    async fn season_by_id(&self, season_id: Uuid) -> Result<Option<Season>, DirectoryError>;
}

#[derive(Debug, Error)]
pub enum SeasonResolveError {
    #[error("user has no season memberships")]
    NoSeasonAvailable,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Resolve the current season for a request.
///
/// An existing selection is honored unchanged, without re-validating the
/// user's membership in it. With no usable selection, the season of the
/// user's most recently created membership wins; the returned flag tells
/// the caller to write that choice back to the session. A user with no
/// memberships at all resolves to `NoSeasonAvailable`.
pub async fn resolve_season(
    directory: &dyn MembershipDirectory,
    user_id: Uuid,
    selection: Option<Uuid>,
) -> Result<(Season, bool), SeasonResolveError> {
    if let Some(season_id) = selection {
        // A selection naming a season that no longer exists falls through
        // to the latest-membership default rather than failing the request.
        if let Some(season) = directory.season_by_id(season_id).await? {
            return Ok((season, false));
        }
    }

    match directory.latest_season_for(user_id).await? {
        Some(season) => Ok((season, true)),
        None => Err(SeasonResolveError::NoSeasonAvailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory directory mirroring the roster table, including its
    /// composite (user, season) uniqueness.
    struct InMemoryDirectory {
        seasons: HashMap<Uuid, Season>,
        rows: Mutex<Vec<(Uuid, Uuid, Role, DateTime<Utc>)>>,
    }

    #[derive(Debug, PartialEq)]
    struct DuplicateMembership;

    impl InMemoryDirectory {
        fn new() -> Self {
            Self { seasons: HashMap::new(), rows: Mutex::new(Vec::new()) }
        }

        fn add_season(&mut self, year: i32) -> Season {
            let season = Season {
                id: Uuid::new_v4(),
                year,
                name: format!("{} Season", year),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.seasons.insert(season.id, season.clone());
            season
        }

        fn enroll(
            &self,
            user_id: Uuid,
            season_id: Uuid,
            role: Role,
            created_at: DateTime<Utc>,
        ) -> Result<(), DuplicateMembership> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|(u, s, _, _)| *u == user_id && *s == season_id) {
                return Err(DuplicateMembership);
            }
            rows.push((user_id, season_id, role, created_at));
            Ok(())
        }
    }

    #[async_trait]
    impl MembershipDirectory for InMemoryDirectory {
        async fn role_of(&self, user_id: Uuid, season_id: Uuid) -> Result<Option<Role>, DirectoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|(u, s, _, _)| *u == user_id && *s == season_id)
                .map(|(_, _, role, _)| *role))
        }

        async fn latest_season_for(&self, user_id: Uuid) -> Result<Option<Season>, DirectoryError> {
            let rows = self.rows.lock().unwrap();
            let latest = rows
                .iter()
                .filter(|(u, _, _, _)| *u == user_id)
                .max_by_key(|(_, _, _, created_at)| *created_at)
                .map(|(_, season_id, _, _)| *season_id);
            Ok(latest.and_then(|id| self.seasons.get(&id).cloned()))
        }

        async fn season_by_id(&self, season_id: Uuid) -> Result<Option<Season>, DirectoryError> {
            Ok(self.seasons.get(&season_id).cloned())
        }
    }

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn user_without_memberships_has_no_season() {
        let mut dir = InMemoryDirectory::new();
        dir.add_season(2025);
        let user = Uuid::new_v4();

        let err = resolve_season(&dir, user, None).await.unwrap_err();
        assert!(matches!(err, SeasonResolveError::NoSeasonAvailable));
    }

    #[tokio::test]
    async fn first_resolution_picks_latest_membership() {
        let mut dir = InMemoryDirectory::new();
        let old = dir.add_season(2024);
        let new = dir.add_season(2025);
        let user = Uuid::new_v4();
        dir.enroll(user, old.id, Role::Member, at(2023, 11)).unwrap();
        dir.enroll(user, new.id, Role::Member, at(2024, 11)).unwrap();

        let (season, newly_selected) = resolve_season(&dir, user, None).await.unwrap();
        assert_eq!(season.id, new.id);
        assert!(newly_selected);
    }

    #[tokio::test]
    async fn resolution_is_idempotent_within_a_session() {
        let mut dir = InMemoryDirectory::new();
        let season = dir.add_season(2025);
        let user = Uuid::new_v4();
        dir.enroll(user, season.id, Role::Member, at(2024, 11)).unwrap();

        // First resolution defaults the selection; the session stores it.
        let (first, stored) = resolve_season(&dir, user, None).await.unwrap();
        assert!(stored);

        // Second resolution with the stored selection returns the same
        // season and does not rewrite the session.
        let (second, stored) = resolve_season(&dir, user, Some(first.id)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(!stored);
    }

    #[tokio::test]
    async fn existing_selection_wins_over_latest_membership() {
        let mut dir = InMemoryDirectory::new();
        let pinned = dir.add_season(2024);
        let newer = dir.add_season(2025);
        let user = Uuid::new_v4();
        dir.enroll(user, pinned.id, Role::Member, at(2023, 11)).unwrap();
        dir.enroll(user, newer.id, Role::Member, at(2024, 11)).unwrap();

        let (season, newly_selected) = resolve_season(&dir, user, Some(pinned.id)).await.unwrap();
        assert_eq!(season.id, pinned.id);
        assert!(!newly_selected);
    }

    #[tokio::test]
    async fn stale_selection_falls_back_to_latest_membership() {
        let mut dir = InMemoryDirectory::new();
        let season = dir.add_season(2025);
        let user = Uuid::new_v4();
        dir.enroll(user, season.id, Role::Member, at(2024, 11)).unwrap();

        let (resolved, newly_selected) =
            resolve_season(&dir, user, Some(Uuid::new_v4())).await.unwrap();
        assert_eq!(resolved.id, season.id);
        assert!(newly_selected);
    }

    #[tokio::test]
    async fn duplicate_membership_is_rejected() {
        let mut dir = InMemoryDirectory::new();
        let season = dir.add_season(2025);
        let user = Uuid::new_v4();

        dir.enroll(user, season.id, Role::Member, at(2024, 11)).unwrap();
        let err = dir.enroll(user, season.id, Role::Coordinator, at(2024, 12)).unwrap_err();
        assert_eq!(err, DuplicateMembership);

        // The original assignment stands.
        let role = dir.role_of(user, season.id).await.unwrap();
        assert_eq!(role, Some(Role::Member));
    }

    #[test]
    fn authorize_requires_exact_match() {
        assert!(authorize(Some(Role::Member), Role::Member).is_ok());
        assert!(authorize(Some(Role::Coordinator), Role::Coordinator).is_ok());
        assert!(authorize(Some(Role::Admin), Role::Admin).is_ok());

        // No hierarchy: admin does not imply member or coordinator.
        assert_eq!(authorize(Some(Role::Admin), Role::Member), Err(AccessDenied::RoleMismatch));
        assert_eq!(authorize(Some(Role::Admin), Role::Coordinator), Err(AccessDenied::RoleMismatch));
        assert_eq!(authorize(Some(Role::Coordinator), Role::Member), Err(AccessDenied::RoleMismatch));
        assert_eq!(authorize(Some(Role::Member), Role::Admin), Err(AccessDenied::RoleMismatch));

        // No membership in the season at all.
        assert_eq!(authorize(None, Role::Member), Err(AccessDenied::RoleMismatch));
    }

    #[tokio::test]
    async fn role_follows_the_pinned_season() {
        let mut dir = InMemoryDirectory::new();
        let s2025 = dir.add_season(2025);
        let s2026 = dir.add_season(2026);
        let user = Uuid::new_v4();
        dir.enroll(user, s2025.id, Role::Member, at(2024, 11)).unwrap();
        dir.enroll(user, s2026.id, Role::Coordinator, at(2025, 11)).unwrap();

        // Pinned to 2025: the user is a member there, so a coordinator
        // requirement denies.
        let (season, _) = resolve_season(&dir, user, Some(s2025.id)).await.unwrap();
        let held = dir.role_of(user, season.id).await.unwrap();
        assert_eq!(authorize(held, Role::Coordinator), Err(AccessDenied::RoleMismatch));

        // Pinned to 2026: same check passes.
        let (season, _) = resolve_season(&dir, user, Some(s2026.id)).await.unwrap();
        let held = dir.role_of(user, season.id).await.unwrap();
        assert!(authorize(held, Role::Coordinator).is_ok());
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Member, Role::Coordinator, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("director"), None);
        assert_eq!(Role::from_str("Admin"), None);
    }
}
