use crate::domain::model::{InputRecord, TransformResult};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;

/// 上傳檔與結果檔所在的 blob 存放區，以檔名為鍵
pub trait Storage: Send + Sync {
    /// 檔案大小（位元組），不讀取內容
    fn file_size(&self, path: &str) -> impl std::future::Future<Output = Result<u64>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn timeout_ms(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn max_body_bytes(&self) -> usize;
    fn max_input_bytes(&self) -> usize;
    fn allowed_extensions(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn artifact_prefix(&self) -> &str;
    fn download_base(&self) -> Option<&str>;
}

/// 取得單一頁面的 HTML 內容
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> std::result::Result<String, FetchError>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRecord>>;
    async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
