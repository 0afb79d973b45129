use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use layerviz::{AppConfig, PaletteName, VizApp};

#[derive(Parser, Debug)]
#[command(
    name = "layerviz",
    about = "Interactive 3D visualizer for neural network layer graphs"
)]
struct Cli {
    /// Pre-parsed model JSON to load at startup
    #[arg(long)]
    model: Option<PathBuf>,

    /// Base URL of the backend model-parsing service
    #[arg(long, default_value = "http://localhost:4000")]
    backend: String,

    /// Initial color palette (default, dark, tailwind, neon, natural)
    #[arg(long, default_value = "default")]
    palette: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig {
        model_path: cli.model,
        backend_url: cli.backend,
        palette: PaletteName::parse(&cli.palette),
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "LayerViz",
        options,
        Box::new(move |_cc| Ok(Box::new(VizApp::new(config)))),
    )
    .map_err(|error| anyhow!("could not start ui: {error}"))
}
