use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;

use crate::auth;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        UserCommands::Create { email, name, password } => create(email, name, password, format).await,
    }
}

async fn create(email: String, name: String, password: String, format: OutputFormat) -> Result<()> {
    if password.len() < 8 {
        anyhow::bail!("password must be at least 8 characters");
    }

    let pool = DatabaseManager::pool().await?;
    let digest = auth::password_digest(&password);

    let row = sqlx::query(
        "INSERT INTO users (id, email, name, password_digest) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&name)
    .bind(&digest)
    .fetch_one(pool)
    .await?;

    let id: Uuid = row.get("id");

    match format {
        OutputFormat::Json => println!("{}", json!({ "id": id, "email": email, "name": name })),
        OutputFormat::Text => println!("created user {} ({})", email, id),
    }
    Ok(())
}
