use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::{DatabaseManager, MembershipStore};

#[derive(Subcommand)]
pub enum SeasonCommands {
    #[command(about = "Open a new season")]
    Create {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        name: String,
    },

    #[command(about = "List all seasons")]
    List,
}

pub async fn handle(cmd: SeasonCommands, format: OutputFormat) -> Result<()> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    match cmd {
        SeasonCommands::Create { year, name } => {
            let season = store.create_season(year, &name).await?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "season": season })),
                OutputFormat::Text => println!("created season {} ({})", season.year, season.id),
            }
        }
        SeasonCommands::List => {
            let seasons = store.list_seasons().await?;
            match format {
                OutputFormat::Json => println!("{}", json!({ "seasons": seasons })),
                OutputFormat::Text => {
                    for season in seasons {
                        println!("{}  {}  {}", season.year, season.id, season.name);
                    }
                }
            }
        }
    }
    Ok(())
}
