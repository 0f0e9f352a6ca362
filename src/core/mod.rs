pub mod artifact;
pub mod etl;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod processor;
pub mod reader;
pub mod writer;

pub use crate::domain::model::{
    InputRecord, OutputRecord, ProcessingResult, ProcessingStatus, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
