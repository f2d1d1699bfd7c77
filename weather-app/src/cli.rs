use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use weather_core::{
    Config, FavouritesStore, FetchWorker, config::API_KEY_ENV, provider::source_from_config,
};

use crate::{app::App, runtime};

/// Top-level CLI struct. With no subcommand the application starts.
#[derive(Debug, Parser)]
#[command(name = "weather-app", version, about = "Terminal weather lookup with favourites")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };

        match self.command {
            Some(Command::Configure) => configure(config_path),
            None => {
                let config = Config::load(&config_path)?;
                run_app(config).await
            }
        }
    }
}

fn configure(path: PathBuf) -> anyhow::Result<()> {
    let mut config = Config::load_from(&path)?;

    let key = inquire::Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .with_help_message(&format!("{API_KEY_ENV} overrides this value at runtime"))
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key);
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn run_app(config: Config) -> anyhow::Result<()> {
    let source = source_from_config(&config)?;
    let favourites = FavouritesStore::load(&config.favourites_file);

    let cancel = CancellationToken::new();
    let (fetch, worker) = FetchWorker::new(source, config.poll_interval()).spawn(cancel.clone());

    let app = App::new(favourites);
    let ui = tokio::task::spawn_blocking(move || runtime::run(app, fetch)).await;

    cancel.cancel();
    info!("waiting for fetch worker");
    worker.await.context("Fetch worker panicked")?;

    ui.context("Render loop panicked")?
}
