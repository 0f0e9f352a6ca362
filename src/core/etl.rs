use crate::core::{Pipeline, ProcessingResult};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 執行一次完整處理，回傳結果檔的參照
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting H1 extraction run");

        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} URL records", records.len());
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Processed {} rows into {} bytes of CSV",
            result.processed_records.len(),
            result.csv_output.len()
        );
        self.monitor.log_stats("Transform");

        let reference = self.pipeline.load(result).await?;
        tracing::info!("📁 Result saved to: {}", reference);
        self.monitor.log_final_stats();

        Ok(reference)
    }

    /// 與 `run` 相同，但把整批失敗轉成 `status: "error"` 的回報
    pub async fn process(&self) -> ProcessingResult {
        match self.run().await {
            Ok(reference) => ProcessingResult::completed(reference),
            Err(e) => {
                tracing::error!(
                    "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                ProcessingResult::error(e.user_friendly_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InputRecord, OutputRecord, ProcessingStatus, TransformResult};
    use crate::utils::error::EtlError;
    use async_trait::async_trait;

    struct StaticPipeline {
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for StaticPipeline {
        async fn extract(&self) -> Result<Vec<InputRecord>> {
            if self.fail_extract {
                return Err(EtlError::MissingInputError {
                    message: "No file uploaded".to_string(),
                });
            }
            Ok(vec![InputRecord {
                url: "http://a.test".to_string(),
            }])
        }

        async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult> {
            Ok(TransformResult {
                processed_records: data
                    .into_iter()
                    .map(|r| OutputRecord {
                        url: r.url,
                        heading: "A".to_string(),
                    })
                    .collect(),
                csv_output: Vec::new(),
            })
        }

        async fn load(&self, result: TransformResult) -> Result<String> {
            Ok(format!("/out/{}.csv", result.processed_records.len()))
        }
    }

    #[tokio::test]
    async fn test_process_reports_completed() {
        let engine = EtlEngine::new(StaticPipeline {
            fail_extract: false,
        });

        let result = engine.process().await;

        assert_eq!(result.status, ProcessingStatus::Completed);
        assert_eq!(result.download_url.as_deref(), Some("/out/1.csv"));
    }

    #[tokio::test]
    async fn test_process_reports_error() {
        let engine = EtlEngine::new_with_monitoring(StaticPipeline { fail_extract: true }, false);

        let result = engine.process().await;

        assert_eq!(result.status, ProcessingStatus::Error);
        assert_eq!(result.message.as_deref(), Some("No file uploaded"));
        assert!(result.download_url.is_none());
    }
}
