//! Reading log records from a line-oriented JSON source
//!
//! Each line holds one [`LogRecord`] as JSON. Blank lines are ignored and
//! malformed lines (including invalid UTF-8) are logged and skipped; the
//! stream only ends at EOF or on an I/O error from the reader.

use crate::record::LogRecord;
use futures::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

/// Turn a buffered reader into a stream of records
pub fn json_lines<R>(reader: R) -> impl Stream<Item = LogRecord>
where
    R: AsyncBufRead + Unpin,
{
    futures::stream::unfold((reader.split(b'\n'), 0u64), |(mut lines, mut line_no)| async move {
        loop {
            line_no += 1;
            let line = next_line(&mut lines).await?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<LogRecord>(line) {
                Ok(record) => return Some((record, (lines, line_no))),
                Err(e) => {
                    tracing::warn!(
                        line = line_no,
                        error = %e,
                        "Skipping malformed log record"
                    );
                }
            }
        }
    })
}

async fn next_line<R>(lines: &mut Split<R>) -> Option<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    match lines.next_segment().await {
        Ok(line) => line,
        Err(e) => {
            crate::logging::log_error("read_input", &e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_reads_one_record_per_line() {
        let input = concat!(
            r#"{"data": "first", "container": {"name": "web"}}"#,
            "\n",
            r#"{"data": "second", "source": "stderr"}"#,
            "\n"
        );

        let records: Vec<_> = json_lines(BufReader::new(input.as_bytes())).collect().await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, "first");
        assert_eq!(records[0].container.name, "web");
        assert_eq!(records[1].data, "second");
    }

    #[tokio::test]
    async fn test_skips_blank_and_malformed_lines() {
        let input = "\n{not json}\n   \n{\"data\": \"kept\"}\n[1, 2]\n";

        let records: Vec<_> = json_lines(BufReader::new(input.as_bytes())).collect().await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "kept");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"{\"data\":\"first\"}\n{\"data\":\"bad \xff\xfe\"}\n{\"data\":\"third\"}\n";

        let records: Vec<_> = json_lines(BufReader::new(input)).collect().await;

        let data: Vec<_> = records.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(data, vec!["first", "third"]);
    }

    #[tokio::test]
    async fn test_crlf_and_missing_final_newline() {
        let input = "{\"data\": \"one\"}\r\n{\"data\": \"two\"}";

        let records: Vec<_> = json_lines(BufReader::new(input.as_bytes())).collect().await;

        let data: Vec<_> = records.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(data, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_empty_input_ends_stream() {
        let records: Vec<LogRecord> = json_lines(BufReader::new(&b""[..])).collect().await;
        assert!(records.is_empty());
    }
}
