use crate::core::artifact::DEFAULT_ARTIFACT_PREFIX;
use crate::core::fetcher::{DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_OUTPUT_PATH: &str = "./uploads";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub fetch: FetchConfig,
    pub upload: UploadConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_input_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            allowed_extensions: vec!["csv".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub artifact_prefix: String,
    pub download_base: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            download_base: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl ExtractorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，未填的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for ExtractorConfig {
    fn timeout_ms(&self) -> u64 {
        self.fetch.timeout_ms
    }

    fn user_agent(&self) -> &str {
        &self.fetch.user_agent
    }

    fn max_body_bytes(&self) -> usize {
        self.fetch.max_body_bytes
    }

    fn max_input_bytes(&self) -> usize {
        self.upload.max_input_bytes
    }

    fn allowed_extensions(&self) -> &[String] {
        &self.upload.allowed_extensions
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn artifact_prefix(&self) -> &str {
        &self.output.artifact_prefix
    }

    fn download_base(&self) -> Option<&str> {
        self.output.download_base.as_deref()
    }
}

impl Validate for ExtractorConfig {
    fn validate(&self) -> Result<()> {
        if self.fetch.timeout_ms == 0 {
            return Err(EtlError::InvalidConfigValueError {
                field: "fetch.timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than zero".to_string(),
            });
        }
        validation::validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;
        validation::validate_positive_number("fetch.max_body_bytes", self.fetch.max_body_bytes, 1)?;

        validation::validate_positive_number(
            "upload.max_input_bytes",
            self.upload.max_input_bytes,
            1,
        )?;
        validation::validate_non_empty_list(
            "upload.allowed_extensions",
            &self.upload.allowed_extensions,
        )?;

        validation::validate_path("output.output_path", &self.output.output_path)?;
        if self.output.artifact_prefix.contains(['/', '\\', '\0']) {
            return Err(EtlError::InvalidConfigValueError {
                field: "output.artifact_prefix".to_string(),
                value: self.output.artifact_prefix.clone(),
                reason: "Prefix must not contain path separators".to_string(),
            });
        }

        Ok(())
    }
}
