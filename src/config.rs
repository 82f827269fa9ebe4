use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use dims_bus::PipelineConfig;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "image-dims",
    about = "Fetch image URLs and report their pixel dimensions"
)]
pub struct Cli {
    /// File with one image URL per line
    pub input: PathBuf,

    /// Report destination. Defaults to replacing the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with pipeline settings; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Largest response body accepted, in bytes
    #[arg(long)]
    pub max_body_bytes: Option<u64>,

    /// Ceiling on simultaneous requests (default: batch size)
    #[arg(long)]
    pub max_in_flight: Option<usize>,
}

/// Settings accepted in the `--config` JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_body_bytes: Option<u64>,
    pub max_in_flight: Option<usize>,
}

impl FileConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid config file")
    }
}

pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load(cli: Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                FileConfig::from_json(&text)?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    /// Flag > file > default.
    fn merge(cli: Cli, file: FileConfig) -> Self {
        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            batch_size: cli
                .batch_size
                .or(file.batch_size)
                .unwrap_or(defaults.batch_size),
            request_timeout: cli
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_bytes: cli
                .max_body_bytes
                .or(file.max_body_bytes)
                .unwrap_or(defaults.max_body_bytes),
            max_in_flight: cli.max_in_flight.or(file.max_in_flight),
        };
        let output = cli.output.unwrap_or_else(|| cli.input.clone());
        Self {
            input: cli.input,
            output,
            pipeline,
        }
    }
}
