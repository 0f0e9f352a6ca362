use crate::domain::model::OutputRecord;
use crate::utils::error::{EtlError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const OUTPUT_HEADERS: [&str; 2] = ["URL", "H1 Heading"];

/// 結果檔的 Content-Type
pub const RESULT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// UTF-8 BOM，讓試算表軟體正確判斷編碼
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 一次把所有結果序列化成帶 BOM 的 UTF-8 CSV
pub fn write_csv(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();

    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);

        writer.write_record(OUTPUT_HEADERS)?;
        for record in records {
            writer.write_record([record.url.as_str(), record.heading.as_str()])?;
        }
        writer.flush()?;
    }

    tracing::debug!(
        "Serialized {} rows into {} bytes of CSV",
        records.len(),
        buffer.len()
    );

    Ok(buffer)
}

/// 讀回結果檔，主要給驗證與測試用
pub fn read_csv(data: &[u8]) -> Result<Vec<OutputRecord>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new().from_reader(data);
    let headers = reader.headers()?;
    if headers.iter().ne(OUTPUT_HEADERS) {
        return Err(EtlError::ParseError {
            message: format!("unexpected result header {:?}", headers),
        });
    }

    reader
        .deserialize()
        .map(|row| row.map_err(EtlError::from))
        .collect()
}
