pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{storage::LocalStorage, toml_config::ExtractorConfig};

pub use core::{etl::EtlEngine, fetcher::HttpFetcher, pipeline::H1Pipeline};
pub use domain::model::{InputRecord, OutputRecord, ProcessingResult, ProcessingStatus};
pub use utils::error::{EtlError, FetchError, Result};
