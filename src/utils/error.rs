use thiserror::Error;

/// 單一列抓取失敗的原因；只會被寫進該列的 heading 欄位，不會中斷整批處理
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout { timeout_ms: u64 },

    #[error("Request failed with status code {status}")]
    Status { status: u16 },

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("{message}")]
    Transport { message: String },
}

impl FetchError {
    /// 把 reqwest 錯誤轉成可讀描述，附上完整的 source 鏈
    pub fn from_reqwest(error: &reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            return FetchError::Timeout { timeout_ms };
        }

        if let Some(status) = error.status() {
            return FetchError::Status {
                status: status.as_u16(),
            };
        }

        let mut message = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !message.contains(&cause_text) {
                message.push_str(": ");
                message.push_str(&cause_text);
            }
            source = cause.source();
        }

        FetchError::Transport { message }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    FetchError(#[from] FetchError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed CSV input: {message}")]
    ParseError { message: String },

    #[error("{message}")]
    MissingInputError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::ParseError { .. }
            | EtlError::MissingInputError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Input,
            EtlError::HttpClientError(_) | EtlError::FetchError(_) => ErrorCategory::Network,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部型別名稱
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ParseError { message } => format!("The uploaded CSV is malformed: {}", message),
            EtlError::CsvError(e) => format!("The uploaded CSV could not be read: {}", e),
            EtlError::MissingInputError { message } => message.clone(),
            EtlError::ValidationError { message } => message.clone(),
            EtlError::IoError(e) => format!("Failed to read or write a file: {}", e),
            EtlError::HttpClientError(e) => format!("HTTP client could not be created: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the TOML config file and command-line flags",
            ErrorCategory::Input => {
                "Upload a .csv file under the size limit with a 'URL' or 'url' header row"
            }
            ErrorCategory::Network => "Check network connectivity and proxy settings",
            ErrorCategory::Storage => "Make sure the output directory exists and is writable",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::Timeout { timeout_ms: 5000 }.to_string(),
            "timeout of 5000ms exceeded"
        );
        assert_eq!(
            FetchError::Status { status: 404 }.to_string(),
            "Request failed with status code 404"
        );
        assert_eq!(
            FetchError::BodyTooLarge { limit: 10 }.to_string(),
            "response body exceeds 10 bytes"
        );
    }

    #[test]
    fn test_category_and_severity() {
        let parse = EtlError::ParseError {
            message: "bad quotes".to_string(),
        };
        assert_eq!(parse.category(), ErrorCategory::Input);
        assert_eq!(parse.severity(), ErrorSeverity::High);

        let config = EtlError::ConfigError {
            message: "x".to_string(),
        };
        assert_eq!(config.category(), ErrorCategory::Configuration);
        assert_eq!(config.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_missing_input_message_is_passed_through() {
        let err = EtlError::MissingInputError {
            message: "No file uploaded".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "No file uploaded");
        assert_eq!(err.to_string(), "No file uploaded");
    }
}
