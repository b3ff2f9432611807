use anyhow::Result;
use clap::Parser;
use eframe::egui;
use page_search::app::{PageSearchApp, StartupOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse dashboard tables with a live row filter
#[derive(Parser)]
#[command(name = "page-search")]
#[command(version)]
#[command(about = "Browse tables with a live row filter", long_about = None)]
struct Cli {
    /// JSON table file to open ({ name, columns, rows })
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// PostgreSQL connection string; overrides the saved connection
    #[arg(long)]
    database_url: Option<String>,

    /// Table to open once connected (schema.table)
    #[arg(short, long)]
    table: Option<String>,

    /// SQL query whose result is opened once connected
    #[arg(short, long)]
    query: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let startup = StartupOptions {
        file: cli.file,
        database_url: cli.database_url,
        table: cli.table,
        query: cli.query,
    };

    // One runtime shared by every database call
    let runtime = Arc::new(tokio::runtime::Runtime::new()?);

    info!("page-search v{} starting", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Page Search"),
        ..Default::default()
    };

    eframe::run_native(
        "Page Search",
        options,
        Box::new(move |cc| Box::new(PageSearchApp::new(cc, runtime, startup))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
