//! Holly application binary - composition root.
//!
//! 1. Resolve configuration (CLI > env > TOML file > defaults)
//! 2. Load and validate the holiday catalog; a bad catalog is fatal
//! 3. Build the bot (recognizer, router, conversation store)
//! 4. Chat on the console, or serve the axum HTTP API

mod cli;
mod console;

use std::sync::Arc;

use clap::Parser;

use holly_api::state::AppState;
use holly_core::{Clock, FixedClock, HolidayCatalog, HollyConfig, SystemClock};
use holly_dialog::HollyBot;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Read before tracing starts so the file can set the log level;
    // a load failure is reported once the subscriber is up.
    let config_file = args.resolve_config_path();
    let loaded = HollyConfig::load(&config_file);
    let mut config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => HollyConfig::default(),
    };
    config.general.log_level = args.resolve_log_level(&config.general.log_level);
    config.general.host = args.resolve_host(&config.general.host);
    config.general.port = args.resolve_port(config.general.port);
    config.catalog.path = args
        .resolve_catalog_path(config.catalog.path.as_deref())
        .map(|p| p.to_string_lossy().to_string());

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Holly v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Using default configuration"
        ),
    }

    // Catalog.
    let catalog = match &config.catalog.path {
        Some(path) => HolidayCatalog::load(std::path::Path::new(path)),
        None => HolidayCatalog::embedded(),
    };
    let catalog = match catalog {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load holiday catalog");
            return Err(e.into());
        }
    };

    // Clock.
    let clock: Arc<dyn Clock> = match args.today {
        Some(date) => {
            tracing::info!(%date, "Using fixed date");
            Arc::new(FixedClock(date))
        }
        None => Arc::new(SystemClock),
    };

    let bot = HollyBot::new(&config, catalog, clock);

    if args.console {
        console::run_console(&bot).await?;
        return Ok(());
    }

    // === API server ===
    let state = AppState::new(config.clone(), bot);
    holly_api::start_server(&config, state).await?;

    Ok(())
}
