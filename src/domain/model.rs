use serde::{Deserialize, Serialize};

/// 上傳 CSV 中的一列，只保留解析出的 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub url: String,
}

/// 輸出 CSV 的一列；欄位名稱即輸出的表頭
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "H1 Heading")]
    pub heading: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<OutputRecord>,
    pub csv_output: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// 一次處理的最終回報，給上傳端轉成 JSON 回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ProcessingResult {
    pub fn completed(download_url: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::Completed,
            message: None,
            download_url: Some(download_url.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::Error,
            message: Some(message.into()),
            download_url: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessingStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_result_json() {
        let result = ProcessingResult::completed("/api/download/h1_extractor_1-2.csv");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "completed",
                "downloadUrl": "/api/download/h1_extractor_1-2.csv"
            })
        );
    }

    #[test]
    fn test_error_result_json() {
        let result = ProcessingResult::error("No file uploaded");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "No file uploaded"})
        );
        assert!(!result.is_completed());
    }
}
