use std::sync::Arc;

use clap::Parser;
use dims_bus::{HttpTransport, Pipeline};
use tokio_util::sync::CancellationToken;

mod config;
mod input;
mod output;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = config::Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("An error occurred: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: config::Cli) -> anyhow::Result<()> {
    let config = config::AppConfig::load(cli)?;

    let identifiers = input::read_identifiers(&config.input).await?;
    log::info!(
        "loaded {} identifiers from {}",
        identifiers.len(),
        config.input.display()
    );

    let transport = Arc::new(HttpTransport::new()?);
    let pipeline = Pipeline::new(config.pipeline.clone(), transport)?;

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("ctrl+c received, cancelling");
            cancel_clone.cancel();
        }
    });

    let results = pipeline.run(identifiers, &cancel).await?;

    let destination = config.output.clone();
    tokio::task::spawn_blocking(move || output::write_report(&destination, &results)).await??;
    log::info!("report written to {}", config.output.display());

    println!("Image dimension processing completed.");
    Ok(())
}
