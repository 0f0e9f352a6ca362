use crate::domain::model::InputRecord;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// 依序檢查的 URL 欄位名稱（大小寫需完全相符）
pub const URL_COLUMNS: [&str; 2] = ["URL", "url"];

const UTF8_BOM: char = '\u{feff}';

const UTF8_BOM_BYTES: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// 一邊轉交位元組一邊追蹤引號狀態。
///
/// `csv` 會默默接受未閉合的引號，以及出現在未加引號欄位中間的引號
/// （例如 `a"b"c`），這裡把兩者記下來交給 `UrlRecordReader` 回報。
struct QuoteScanner<R> {
    inner: R,
    state: QuoteState,
    offset: usize,
    bom_len: usize,
    line: u64,
    stray_quote_line: Option<u64>,
}

impl<R> QuoteScanner<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            state: QuoteState::FieldStart,
            offset: 0,
            bom_len: 0,
            line: 1,
            stray_quote_line: None,
        }
    }

    fn scan(&mut self, byte: u8) {
        use QuoteState::*;

        let at_bom = self.offset == self.bom_len
            && UTF8_BOM_BYTES.get(self.bom_len) == Some(&byte);
        self.offset += 1;

        // 開頭的 BOM 不算欄位內容
        if at_bom {
            self.bom_len += 1;
            return;
        }

        self.state = match (self.state, byte) {
            (Quoted, b'"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, b'"') => Quoted,
            (FieldStart, b'"') => Quoted,
            (Unquoted, b'"') => {
                self.flag_stray_quote();
                Unquoted
            }
            (_, b',' | b'\n' | b'\r') => FieldStart,
            (QuoteInQuoted, _) => {
                self.flag_stray_quote();
                Unquoted
            }
            (_, _) => Unquoted,
        };

        if byte == b'\n' {
            self.line += 1;
        }
    }

    fn flag_stray_quote(&mut self) {
        if self.stray_quote_line.is_none() {
            self.stray_quote_line = Some(self.line);
        }
    }

    fn structure_error(&self) -> Option<EtlError> {
        self.stray_quote_line.map(|line| EtlError::ParseError {
            message: format!("unexpected quote inside unquoted field on line {}", line),
        })
    }
}

impl<R: Read> Read for QuoteScanner<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        for &byte in &buf[..n] {
            self.scan(byte);
        }
        Ok(n)
    }
}

/// 把上傳的 CSV 逐列轉成 `InputRecord`。
///
/// 第一列視為表頭。每列先取 `URL` 欄，空字串時再取 `url` 欄；兩者皆為空字串
/// 的列直接略過，只含空白的值照原樣交出。結構錯誤（欄位數不一致、引號未閉合、
/// 欄位中間出現引號、非 UTF-8）會以 `EtlError::ParseError` 回報並結束迭代。
pub struct UrlRecordReader<R: Read> {
    reader: csv::Reader<QuoteScanner<R>>,
    url_columns: Vec<usize>,
    record: StringRecord,
    skipped: usize,
    finished: bool,
}

impl<R: Read> UrlRecordReader<R> {
    pub fn new(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(QuoteScanner::new(input));

        let headers = reader.headers().map_err(parse_error)?.clone();
        let url_columns = resolve_url_columns(&headers);

        if url_columns.is_empty() {
            tracing::warn!(
                "⚠️ No 'URL' or 'url' column in header {:?}, every row will be skipped",
                headers
            );
        } else {
            tracing::debug!("URL columns resolved to indices {:?}", url_columns);
        }

        Ok(Self {
            reader,
            url_columns,
            record: StringRecord::new(),
            skipped: 0,
            finished: false,
        })
    }

    /// 目前為止因缺少 URL 而略過的列數
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn url_of_current(&self) -> Option<String> {
        self.url_columns
            .iter()
            .filter_map(|&index| self.record.get(index))
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

impl<R: Read> Iterator for UrlRecordReader<R> {
    type Item = Result<InputRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    if let Some(e) = self.reader.get_ref().structure_error() {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    match self.url_of_current() {
                        Some(url) => return Some(Ok(InputRecord { url })),
                        None => {
                            self.skipped += 1;
                            tracing::debug!(
                                "Skipping row without URL at line {}",
                                self.record.position().map(|p| p.line()).unwrap_or(0)
                            );
                        }
                    }
                }
                Ok(false) => {
                    self.finished = true;
                    let scanner = self.reader.get_ref();
                    if scanner.state == QuoteState::Quoted {
                        return Some(Err(EtlError::ParseError {
                            message: "unterminated quoted field".to_string(),
                        }));
                    }
                    return scanner.structure_error().map(Err);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(parse_error(e)));
                }
            }
        }
    }
}

/// 讀完整份輸入；任何結構錯誤都會讓整批失敗
pub fn read_url_records<R: Read>(input: R) -> Result<Vec<InputRecord>> {
    UrlRecordReader::new(input)?.collect()
}

fn resolve_url_columns(headers: &StringRecord) -> Vec<usize> {
    URL_COLUMNS
        .iter()
        .filter_map(|name| {
            headers
                .iter()
                .position(|header| header.trim_start_matches(UTF8_BOM) == *name)
        })
        .collect()
}

fn parse_error(e: csv::Error) -> EtlError {
    EtlError::ParseError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(input: &str) -> Result<Vec<String>> {
        read_url_records(input.as_bytes())
            .map(|records| records.into_iter().map(|r| r.url).collect())
    }

    #[test]
    fn test_reads_upper_and_lower_case_headers() {
        assert_eq!(urls("URL\nhttp://a.test\n").unwrap(), vec!["http://a.test"]);
        assert_eq!(urls("url\nhttp://b.test\n").unwrap(), vec!["http://b.test"]);
    }

    #[test]
    fn test_other_header_spellings_are_not_matched() {
        assert!(urls("Url\nhttp://a.test\n").unwrap().is_empty());
        assert!(urls(" URL\nhttp://a.test\n").unwrap().is_empty());
    }

    #[test]
    fn test_upper_case_column_wins_then_falls_back() {
        let input = "url,URL\nhttp://lower.test,http://upper.test\nhttp://only-lower.test,\n";
        assert_eq!(
            urls(input).unwrap(),
            vec!["http://upper.test", "http://only-lower.test"]
        );
    }

    #[test]
    fn test_rows_without_url_are_skipped_in_order() {
        let input = "URL,name\nhttp://1.test,a\n,b\nhttp://2.test,c\n";
        let mut reader = UrlRecordReader::new(input.as_bytes()).unwrap();
        let records: Vec<InputRecord> = reader.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(
            records,
            vec![
                InputRecord {
                    url: "http://1.test".to_string()
                },
                InputRecord {
                    url: "http://2.test".to_string()
                },
            ]
        );
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_whitespace_only_url_is_passed_through() {
        let input = "URL,url\n   ,http://lower.test\n \t ,\n";
        assert_eq!(urls(input).unwrap(), vec!["   ", " \t "]);
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        assert_eq!(
            urls("URL\n\nhttp://a.test\n\n\nhttp://b.test\n").unwrap(),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_quoted_fields_are_unescaped() {
        let input = "URL,note\n\"http://a.test/?q=1,2\",\"say \"\"hi\"\"\"\n";
        assert_eq!(urls(input).unwrap(), vec!["http://a.test/?q=1,2"]);
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        assert_eq!(
            urls("\u{feff}URL\nhttp://a.test\n").unwrap(),
            vec!["http://a.test"]
        );
    }

    #[test]
    fn test_wrong_column_count_is_parse_error() {
        let err = urls("URL,name\nhttp://a.test,a\nhttp://b.test\n").unwrap_err();
        assert!(matches!(err, EtlError::ParseError { .. }));
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        let err = urls("URL\n\"http://a.test\nhttp://b.test\n").unwrap_err();
        assert!(matches!(err, EtlError::ParseError { .. }));
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_parse_error() {
        let err = urls("URL\nhttp://a.test\nhttp://a\"b\"c.test\n").unwrap_err();
        match err {
            EtlError::ParseError { message } => assert!(message.contains("line 3")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_text_after_closing_quote_is_parse_error() {
        let err = urls("URL\n\"http://a.test\"x\n").unwrap_err();
        assert!(matches!(err, EtlError::ParseError { .. }));
    }

    #[test]
    fn test_quoted_header_after_bom_is_accepted() {
        assert_eq!(
            urls("\u{feff}\"URL\"\r\n\"http://a.test/?q=\"\"x\"\"\"\r\n").unwrap(),
            vec!["http://a.test/?q=\"x\""]
        );
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let input: &[u8] = b"URL\nhttp://a.test/\xff\xfe\n";
        let err = read_url_records(input).unwrap_err();
        assert!(matches!(err, EtlError::ParseError { .. }));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(urls("").unwrap().is_empty());
        assert!(urls("URL\n").unwrap().is_empty());
    }
}
