use crate::utils::error::{EtlError, Result};
use scraper::{Html, Selector};

pub const HEADING_TAG: &str = "h1";

/// 從 HTML 取出第一個 `<h1>` 的文字
pub struct HeadingExtractor {
    selector: Selector,
}

impl HeadingExtractor {
    pub fn new() -> Result<Self> {
        let selector = Selector::parse(HEADING_TAG).map_err(|e| EtlError::ProcessingError {
            message: format!("invalid heading selector '{}': {}", HEADING_TAG, e),
        })?;

        Ok(Self { selector })
    }

    /// 依文件順序找第一個標題元素並去掉前後空白。
    ///
    /// 沒有標題元素、或第一個標題元素只有空白時回傳 `None`；後面的標題
    /// 元素不會被拿來遞補。
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        let heading = document.select(&self.selector).next()?;
        let text = heading.text().collect::<String>();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
