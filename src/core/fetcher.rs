use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 以 GET 抓取頁面；逾時、非 2xx、過大的回應都視為失敗，不重試
pub struct HttpFetcher {
    client: Client,
    timeout_ms: u64,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout_ms: u64, user_agent: &str, max_body_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            client,
            timeout_ms,
            max_body_bytes,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.timeout_ms(),
            config.user_agent(),
            config.max_body_bytes(),
        )
    }

    fn map_error(&self, error: reqwest::Error) -> FetchError {
        FetchError::from_reqwest(&error, self.timeout_ms)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> std::result::Result<String, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        tracing::debug!("Response status for {}: {}", url, status);

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let limit = self.max_body_bytes;
        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                return Err(FetchError::BodyTooLarge { limit });
            }
        }

        // 分段讀取，超過上限就停止
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
