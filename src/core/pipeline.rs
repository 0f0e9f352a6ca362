use crate::core::artifact::{artifact_reference, generate_artifact_name};
use crate::core::fetcher::HttpFetcher;
use crate::core::processor::RowProcessor;
use crate::core::reader::UrlRecordReader;
use crate::core::writer::write_csv;
use crate::core::{ConfigProvider, InputRecord, PageFetcher, Pipeline, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_upload_extension, validate_upload_size};

pub const NO_FILE_UPLOADED: &str = "No file uploaded";

/// 上傳 CSV → 逐列抓取 → 帶 BOM 的結果 CSV
pub struct H1Pipeline<S: Storage, C: ConfigProvider, F: PageFetcher = HttpFetcher> {
    storage: S,
    config: C,
    upload: String,
    processor: RowProcessor<F>,
}

impl<S: Storage, C: ConfigProvider> H1Pipeline<S, C, HttpFetcher> {
    /// `upload` 是上傳檔在 storage 中的名稱
    pub fn new(storage: S, config: C, upload: impl Into<String>) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Self::with_fetcher(storage, config, upload, fetcher)
    }
}

impl<S: Storage, C: ConfigProvider, F: PageFetcher> H1Pipeline<S, C, F> {
    pub fn with_fetcher(
        storage: S,
        config: C,
        upload: impl Into<String>,
        fetcher: F,
    ) -> Result<Self> {
        Ok(Self {
            storage,
            config,
            upload: upload.into(),
            processor: RowProcessor::new(fetcher)?,
        })
    }

    /// 先檢查副檔名與大小，通過後才把內容讀進記憶體
    async fn read_upload(&self) -> Result<Vec<u8>> {
        if self.upload.trim().is_empty() {
            return Err(EtlError::MissingInputError {
                message: NO_FILE_UPLOADED.to_string(),
            });
        }

        validate_upload_extension(&self.upload, self.config.allowed_extensions())?;

        let size = self
            .storage
            .file_size(&self.upload)
            .await
            .map_err(|e| self.missing_upload(e))?;
        validate_upload_size(size, self.config.max_input_bytes())?;

        let data = self
            .storage
            .read_file(&self.upload)
            .await
            .map_err(|e| self.missing_upload(e))?;
        // 檔案可能在檢查後被改寫
        validate_upload_size(data.len() as u64, self.config.max_input_bytes())?;

        Ok(data)
    }

    fn missing_upload(&self, error: EtlError) -> EtlError {
        match error {
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                EtlError::MissingInputError {
                    message: format!("{}: {} not found", NO_FILE_UPLOADED, self.upload),
                }
            }
            other => other,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: PageFetcher> Pipeline for H1Pipeline<S, C, F> {
    async fn extract(&self) -> Result<Vec<InputRecord>> {
        tracing::info!("📥 Reading uploaded CSV: {}", self.upload);

        let data = self.read_upload().await?;

        // 先讀完整份檔案，結構錯誤在發出任何請求前就讓整批失敗
        let mut reader = UrlRecordReader::new(data.as_slice())?;
        let records = reader.by_ref().collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Found {} URLs ({} rows without URL skipped)",
            records.len(),
            reader.skipped()
        );

        Ok(records)
    }

    async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult> {
        tracing::info!(
            "🌐 Fetching {} URLs (timeout {}ms each)",
            data.len(),
            self.config.timeout_ms()
        );

        let processed_records = self.processor.process_all(data).await;
        let csv_output = write_csv(&processed_records)?;

        Ok(TransformResult {
            processed_records,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let name = generate_artifact_name(self.config.artifact_prefix());

        tracing::debug!(
            "Writing result artifact {} ({} bytes)",
            name,
            result.csv_output.len()
        );
        self.storage.write_file(&name, &result.csv_output).await?;

        Ok(artifact_reference(
            &name,
            self.config.output_path(),
            self.config.download_base(),
        ))
    }
}
