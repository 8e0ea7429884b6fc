//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::open_store;
use crate::adapters::web::{AppState, build_router};
use crate::domain::error::TrackerError;
use crate::logging::{LogSettings, init_logging};
use crate::ports::config_port::ConfigPort;
use crate::service::TrackerService;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";

#[derive(Parser, Debug)]
#[command(name = "cryptotrack", about = "Crypto price tracking and forecasting service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database tables
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Fetch and store daily and weekly history for a symbol
    Ingest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
    /// Forecast a symbol's price and print the result as JSON
    Predict {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value = "short")]
        timeframe: String,
    },
    /// Delete a symbol and all of its stored prices
    Delete {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::Ingest { config, symbol } => run_ingest(&config, &symbol),
        Command::Predict {
            config,
            symbol,
            timeframe,
        } => run_predict(&config, &symbol, &timeframe),
        Command::Delete { config, symbol } => run_delete(&config, &symbol),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the INI file and install logging from its `[logging]` section.
pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TrackerError> {
    let config = FileConfigAdapter::from_file(path)?;
    init_logging(&LogSettings::from_config(&config)?);
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, TrackerError> {
    let raw = config.get_string_or("server", "listen", DEFAULT_LISTEN);
    raw.parse().map_err(|e: std::net::AddrParseError| TrackerError::ConfigInvalid {
        section: "server".into(),
        key: "listen".into(),
        reason: format!("'{raw}': {e}"),
    })
}

fn block_on<F: Future>(future: F) -> Result<F::Output, TrackerError> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn run_serve(config_path: &PathBuf) -> Result<(), TrackerError> {
    let config = load_config(config_path)?;
    let addr = listen_addr(&config)?;
    let service = TrackerService::from_config(&config)?;
    let router = build_router(AppState { service });

    block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");
        axum::serve(listener, router).await?;
        Ok::<(), TrackerError>(())
    })?
}

fn run_init_db(config_path: &PathBuf) -> Result<(), TrackerError> {
    let config = load_config(config_path)?;
    open_store(&config)?.initialize_schema()?;
    eprintln!("Database schema ready");
    Ok(())
}

fn run_ingest(config_path: &PathBuf, symbol: &str) -> Result<(), TrackerError> {
    let config = load_config(config_path)?;
    let service = TrackerService::from_config(&config)?;
    let counts = block_on(service.ingest_historical(symbol))??;
    eprintln!(
        "Historical data for {symbol} saved: {} daily, {} weekly new rows",
        counts.daily, counts.weekly
    );
    Ok(())
}

fn run_predict(config_path: &PathBuf, symbol: &str, timeframe: &str) -> Result<(), TrackerError> {
    let config = load_config(config_path)?;
    let service = TrackerService::from_config(&config)?;
    let result = block_on(service.predict(symbol, timeframe))??;
    let json = serde_json::to_string_pretty(&result).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn run_delete(config_path: &PathBuf, symbol: &str) -> Result<(), TrackerError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    store.initialize_schema()?;
    store.delete_symbol(symbol)?;
    eprintln!("Crypto {symbol} deleted successfully");
    Ok(())
}
