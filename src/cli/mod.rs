mod auth;
mod projects;
mod push;
mod show;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taxi_petzi::Result;
use taxi_petzi::config::Config;

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "taxi-petzi")]
#[command(about = "Push timesheet entries to the Petzi Google Sheets spreadsheet", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Push { file, target } => push::execute(file, target).await,
            Commands::Projects => projects::execute(),
            Commands::Auth { reset, target } => auth::execute(*reset, target).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push entries from a CSV file with date,project,duration,description columns
    Push {
        file: PathBuf,

        #[command(flatten)]
        target: Target,
    },
    /// List projects, activities and their aliases
    Projects,
    /// Verify Google Sheets authentication
    Auth {
        /// Forget cached tokens first
        #[arg(long)]
        reset: bool,

        #[command(flatten)]
        target: Target,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}

/// Which backend to talk to: a configured name or an explicit URI.
#[derive(Args, Debug)]
pub struct Target {
    /// Backend name from the config file
    #[arg(long)]
    backend: Option<String>,

    /// Connection URI, e.g. petzi:///path/to/credentials.json?sheet_id=ID
    #[arg(long, conflicts_with = "backend")]
    uri: Option<String>,
}

impl Target {
    pub fn resolve(&self) -> Result<String> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let config = Config::load()?;
        Ok(config.backend_uri(self.backend.as_deref())?.to_string())
    }
}
