use clap::{command, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use winlink::{
    config::CoordinatorConfig,
    geometry::Rect,
    sensor::SimulatedWindow,
    store::LocalFsStore,
    surface::TracingSurface,
    system::WindowSystem,
    WinlinkError,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory of the shared store, overriding the config file
    #[arg(short, long)]
    store_dir: Option<PathBuf>,

    /// Initial window rectangle as top,left,width,height
    #[arg(long, default_value = "0,0,800,600", value_parser = parse_rect)]
    rect: Rect,

    /// Per-read drift of the simulated window as top,left
    #[arg(long, default_value = "0,0", value_parser = parse_drift)]
    drift: (f64, f64),
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [top, left, width, height] => Ok(Rect::new(*top, *left, *width, *height)),
        _ => Err("expected top,left,width,height".to_string()),
    }
}

fn parse_drift(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [top, left] => Ok((*top, *left)),
        _ => Err("expected top,left".to_string()),
    }
}

async fn run(cli: &Cli) -> Result<(), WinlinkError> {
    let mut config = CoordinatorConfig::load(&cli.config)?;
    if let Some(store_dir) = &cli.store_dir {
        config.store.base_dir = store_dir.clone();
    }

    debug!("config: {:?}", config);

    let store = Arc::new(LocalFsStore::new(config.store.clone()));
    let sensor = Arc::new(SimulatedWindow::new(cli.rect, cli.drift.0, cli.drift.1));
    let surface = Arc::new(TracingSurface::new());

    let system = WindowSystem::new(config, store, sensor, surface);
    let id = system.attach().await?;

    println!("Attached as member {}. Press Ctrl+C to detach.", id);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| WinlinkError::internal(format!("Failed to wait for Ctrl+C: {}", e)))?;

    println!("Shutdown signal received, detaching...");

    system.shutdown().await?;

    println!("Detached.");

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
