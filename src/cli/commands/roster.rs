use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;

use crate::access::Role;
use crate::cli::OutputFormat;
use crate::database::{DatabaseManager, MembershipStore};

#[derive(Subcommand)]
pub enum RosterCommands {
    #[command(about = "Add a user to a season's roster")]
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: i32,
        #[arg(long, help = "member | coordinator | admin")]
        role: String,
    },

    #[command(about = "Change the role a user holds in a season")]
    SetRole {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: i32,
        #[arg(long, help = "member | coordinator | admin")]
        role: String,
    },

    #[command(about = "End a user's membership in a season")]
    Remove {
        #[arg(long)]
        email: String,
        #[arg(long)]
        year: i32,
    },
}

pub async fn handle(cmd: RosterCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        RosterCommands::Add { email, year, role } => {
            let role = parse_role(&role)?;
            let (user_id, season_id) = resolve(&email, year).await?;
            let store = store().await?;
            let membership = store.enroll(user_id, season_id, role).await?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "membership": membership })),
                OutputFormat::Text => println!("{} is now {} for {}", email, role, year),
            }
        }
        RosterCommands::SetRole { email, year, role } => {
            let role = parse_role(&role)?;
            let (user_id, season_id) = resolve(&email, year).await?;
            let store = store().await?;
            let membership = store.set_role(user_id, season_id, role).await?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "membership": membership })),
                OutputFormat::Text => println!("{} is now {} for {}", email, role, year),
            }
        }
        RosterCommands::Remove { email, year } => {
            let (user_id, season_id) = resolve(&email, year).await?;
            let store = store().await?;
            store.withdraw(user_id, season_id).await?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "removed": true })),
                OutputFormat::Text => println!("{} removed from {}", email, year),
            }
        }
    }
    Ok(())
}

fn parse_role(s: &str) -> Result<Role> {
    Role::from_str(s).with_context(|| format!("unknown role '{}', expected member | coordinator | admin", s))
}

async fn store() -> Result<MembershipStore> {
    let pool = DatabaseManager::pool().await?;
    Ok(MembershipStore::new(pool.clone()))
}

/// Map (email, year) onto the ids the roster table keys by.
async fn resolve(email: &str, year: i32) -> Result<(Uuid, Uuid)> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query("SELECT id FROM users WHERE email = $1 AND deleted_at IS NULL")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("no user with email {}", email))?;

    let season = sqlx::query("SELECT id FROM seasons WHERE year = $1")
        .bind(year)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("no {} season", year))?;

    Ok((user.get("id"), season.get("id")))
}
