pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::ExtractorConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "h1-extractor")]
#[command(about = "Fetch every URL in a CSV and write back its first <h1> heading")]
pub struct CliConfig {
    /// Uploaded CSV file with a 'URL' or 'url' column
    pub input: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for result artifacts (overrides output.output_path)
    #[arg(long)]
    pub output_path: Option<String>,

    /// Per-request timeout in milliseconds (overrides fetch.timeout_ms)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML（若有）並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                ExtractorConfig::from_file(path)?
            }
            None => ExtractorConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.fetch.timeout_ms = timeout_ms;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }

        Ok(config)
    }
}
