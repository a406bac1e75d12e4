pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence CLI - administrative tooling for the ensemble backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create database tables")]
    Init,

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Season management")]
    Season {
        #[command(subcommand)]
        cmd: commands::seasons::SeasonCommands,
    },

    #[command(about = "Season roster management")]
    Roster {
        #[command(subcommand)]
        cmd: commands::roster::RosterCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Init => commands::init::handle(output_format).await,
        Commands::User { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Season { cmd } => commands::seasons::handle(cmd, output_format).await,
        Commands::Roster { cmd } => commands::roster::handle(cmd, output_format).await,
    }
}
