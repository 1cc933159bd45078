use clap::Subcommand;
use taxi_petzi::Result;
use taxi_petzi::config::Config;
use taxi_petzi::sheets::token_cache_path;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and token cache paths
    Paths,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let data_dir = Config::data_dir()?;
    let token_path = token_cache_path()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?data_dir, "Data path");
    info!(path = ?token_path, "Token cache path");

    Ok(())
}
