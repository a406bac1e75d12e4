use anyhow::Result;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

// One statement per entry: the driver prepares each statement, so batched
// DDL in a single string would fail.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            password_digest TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            trashed_at TIMESTAMPTZ,
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "seasons",
        r#"
        CREATE TABLE IF NOT EXISTS seasons (
            id UUID PRIMARY KEY,
            year INT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "role_memberships",
        r#"
        CREATE TABLE IF NOT EXISTS role_memberships (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            season_id UUID NOT NULL REFERENCES seasons(id),
            role TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (user_id, season_id)
        )
        "#,
    ),
    (
        "conflicts",
        r#"
        CREATE TABLE IF NOT EXISTS conflicts (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            season_id UUID NOT NULL REFERENCES seasons(id),
            starts_on DATE NOT NULL,
            ends_on DATE NOT NULL,
            reason TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "payments",
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            season_id UUID NOT NULL REFERENCES seasons(id),
            amount NUMERIC(10, 2) NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            intent_id TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "inventory_items",
        r#"
        CREATE TABLE IF NOT EXISTS inventory_items (
            id UUID PRIMARY KEY,
            season_id UUID NOT NULL REFERENCES seasons(id),
            name TEXT NOT NULL,
            serial TEXT,
            assigned_to UUID REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
];

pub async fn handle(format: OutputFormat) -> Result<()> {
    let pool = DatabaseManager::pool().await?;

    let mut created = Vec::new();
    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        created.push(*name);
    }

    match format {
        OutputFormat::Json => println!("{}", json!({ "tables": created })),
        OutputFormat::Text => {
            for name in created {
                println!("ok: {}", name);
            }
        }
    }
    Ok(())
}
