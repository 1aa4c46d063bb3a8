use anyhow::{Context, Result};
use clap::Parser;
use sheet_viewer::SheetViewerApp;

mod cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("sheet_viewer=info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let cli = cli::Cli::parse();
    let config = cli.resolve_config().context("failed to load configuration")?;

    log::info!("Sheet Viewer - drag to orbit, right-drag to pan, wheel to zoom, Shift+C to reset, Escape to quit");
    SheetViewerApp::new(config)?.run()?;

    Ok(())
}
