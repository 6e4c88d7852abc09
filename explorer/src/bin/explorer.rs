//! Explorer command-line entry point.
//!
//! Restores filters from a query string, loads every panel once and prints
//! the resulting view models as JSON.
//!
//! # Usage
//!
//! ```bash
//! explorer "?genre=Drama&ymin=1990&src=imdb"
//! explorer "?genre=Horror" --export charts/
//! ```
//!
//! # Environment Variables
//!
//! - `EXPLORER_API_BASE`: backend base URL (default: http://127.0.0.1:8000)
//! - `EXPLORER_API_TIMEOUT_SECS`: request timeout (default: 90)
//! - `EXPLORER_DEBOUNCE_MS`: quiet period before fetching (default: 400)
//! - `EXPLORER_SOURCE`: `http` | `local`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tmdb_explorer::export::{save_png, ExportOptions};
use tmdb_explorer::filters::MemoryHistory;
use tmdb_explorer::source::SourceFactory;
use tmdb_explorer::{Dashboard, ExplorerConfig};

struct Args {
    query: String,
    export_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut query = None;
    let mut export_dir = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                let dir = args.next().context("--export requires a directory")?;
                export_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => {
                println!("Usage: explorer [QUERY] [--export DIR]");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ if query.is_none() => query = Some(arg),
            _ => bail!("Unexpected argument: {}", arg),
        }
    }
    Ok(Args {
        query: query.unwrap_or_default(),
        export_dir,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON view
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = ExplorerConfig::load().context("Failed to load configuration")?;
    info!(source = ?config.source, base_url = %config.api.base_url, "Starting explorer");

    let source = SourceFactory::create(config.source, &config.api)?;
    let mut dashboard = Dashboard::new(source, MemoryHistory::with_query(args.query), config);

    if let Err(message) = dashboard.load_meta().await {
        warn!("Continuing without metadata: {}", message);
    }
    dashboard.start();
    dashboard.settled().await;

    let view = dashboard.view();
    println!("{}", serde_json::to_string_pretty(&view)?);

    if let Some(dir) = args.export_dir {
        let options = ExportOptions::default();
        for chart in [&view.budget.view, &view.rating.view].into_iter().flatten() {
            let path = save_png(chart, &dir, &options)?;
            info!("Exported {}", path.display());
        }
    }

    dashboard.stop();
    Ok(())
}
