use crate::core::extractor::HeadingExtractor;
use crate::domain::model::{InputRecord, OutputRecord};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;

pub const NO_HEADING_FOUND: &str = "No H1 tag found";
pub const ERROR_PREFIX: &str = "Error: ";
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch URL";

/// 每個 `InputRecord` 產生恰好一個 `OutputRecord`，失敗內容寫進 heading
pub struct RowProcessor<F: PageFetcher> {
    fetcher: F,
    extractor: HeadingExtractor,
}

impl<F: PageFetcher> RowProcessor<F> {
    pub fn new(fetcher: F) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: HeadingExtractor::new()?,
        })
    }

    pub async fn process(&self, record: &InputRecord) -> OutputRecord {
        let heading = match self.fetcher.fetch_page(&record.url).await {
            Ok(html) => self
                .extractor
                .extract(&html)
                .unwrap_or_else(|| NO_HEADING_FOUND.to_string()),
            Err(e) => {
                let description = e.to_string();
                tracing::warn!("⚠️ Failed to fetch {}: {}", record.url, description);
                if description.trim().is_empty() {
                    format!("{}{}", ERROR_PREFIX, FETCH_FAILED_FALLBACK)
                } else {
                    format!("{}{}", ERROR_PREFIX, description)
                }
            }
        };

        OutputRecord {
            url: record.url.clone(),
            heading,
        }
    }

    /// 逐列處理：第 N+1 列要等第 N 列完成才開始，輸出順序與輸入一致
    pub async fn process_all(&self, records: Vec<InputRecord>) -> Vec<OutputRecord> {
        let total = records.len();
        let mut results = Vec::with_capacity(total);

        for (index, record) in records.iter().enumerate() {
            tracing::debug!("🔗 [{}/{}] Fetching {}", index + 1, total, record.url);
            let output = self.process(record).await;
            tracing::debug!("[{}/{}] Heading: {}", index + 1, total, output.heading);
            results.push(output);
        }

        results
    }
}
