mod cli;

use clap::Parser;
use cli::{Cli, Commands, ConfigArgs};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use camgate::config::Config;
use camgate::snapshot::{MotionEyeFetcher, SnapshotFetcher, SystemClock};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = load_config(&args.config)?;
            args.apply(&mut config);
            camgate::api::run(config).await?
        }
        Commands::ShowConfig(args) => {
            let config = load_config(&args)?;
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Commands::Snap(args) => {
            let config = load_config(&args.config)?;
            let registry = config.camera_registry()?;
            let camera_id = registry
                .resolve_id(&args.camera)
                .ok_or_else(|| format!("unknown camera '{}'", args.camera))?;

            let fetcher = MotionEyeFetcher::new(
                &config.backend,
                config.storage.output_root.clone(),
                Arc::new(SystemClock),
            )?;
            let stored = fetcher.capture(camera_id).await?;
            println!("{}", stored.path.display());
        }
    }

    Ok(())
}

fn load_config(args: &ConfigArgs) -> Result<Config, AnyError> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };
    Ok(config)
}
