use chrono::Utc;

pub const DEFAULT_ARTIFACT_PREFIX: &str = "h1_extractor_";

/// 產生結果檔名：`<prefix><毫秒時間戳>-<隨機數>.csv`
pub fn generate_artifact_name(prefix: &str) -> String {
    let suffix: u32 = rand::random_range(0..1_000_000_000);
    format!("{}{}-{}.csv", prefix, Utc::now().timestamp_millis(), suffix)
}

/// 結果檔的對外參照；有設定下載路徑時用它，否則回傳存放路徑
pub fn artifact_reference(name: &str, output_path: &str, download_base: Option<&str>) -> String {
    match download_base {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), name),
        None => format!("{}/{}", output_path.trim_end_matches('/'), name),
    }
}
