//! Document batch building.

use es_stream_observability::Diagnostics;
use es_stream_search_client::BulkPayload;
use serde_json::Value;

/// Split object content into document lines.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. A trailing line break does
/// not produce an empty last line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;

    while let Some(end) = rest.find(['\n', '\r']) {
        lines.push(&rest[..end]);
        let break_len = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + break_len..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }

    lines
}

/// Turns raw lines into a bulk payload, dropping lines that are not JSON objects.
#[derive(Debug, Clone)]
pub struct DocumentBatchBuilder {
    diagnostics: Diagnostics,
}

impl DocumentBatchBuilder {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Build a payload from `lines`, or `None` when no line is a valid record.
    pub fn build<S: AsRef<str>>(&self, lines: &[S]) -> Option<BulkPayload> {
        let documents: Vec<Value> = lines
            .iter()
            .filter_map(|line| self.parse(line.as_ref()))
            .collect();

        let payload = BulkPayload::from_documents(&documents);
        if payload.is_none() {
            self.diagnostics
                .warn("no_valid_documents", "no valid json record to index");
        }

        payload
    }

    fn parse(&self, line: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(line) {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) => {
                self.diagnostics.warn(
                    "json_decode_error",
                    format!("{line} : json_decode_error not a JSON object"),
                );
                None
            }
            Err(err) => {
                self.diagnostics
                    .warn("json_decode_error", format!("{line} : json_decode_error {err}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use es_stream_search_client::BULK_ACTION_HEADER;
    use serde_json::json;

    use super::*;

    fn builder() -> (
        DocumentBatchBuilder,
        std::sync::Arc<es_stream_observability::MemorySink>,
    ) {
        let (diagnostics, sink) = Diagnostics::memory();
        (DocumentBatchBuilder::new(diagnostics), sink)
    }

    /// Document lines of a payload, with action lines checked and removed.
    fn records(payload: &BulkPayload) -> Vec<Value> {
        let lines: Vec<&str> = payload.as_str().split_terminator('\n').collect();
        assert_eq!(lines.len() % 2, 0);

        lines
            .chunks(2)
            .map(|unit| {
                assert_eq!(unit[0], BULK_ACTION_HEADER);
                serde_json::from_str(unit[1]).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("line1\nline2\r\nline3"), vec!["line1", "line2", "line3"]);
        assert_eq!(split_lines("line1\n"), vec!["line1"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_lines_carriage_returns() {
        assert_eq!(split_lines("line1\rline2\rline3\r"), vec!["line1", "line2", "line3"]);
        assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n\rb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\r"), vec![""]);
    }

    #[test]
    fn test_no_lines() {
        let (builder, sink) = builder();
        assert!(builder.build::<&str>(&[]).is_none());
        assert!(sink.contains("no_valid_documents"));
    }

    #[test]
    fn test_only_invalid_lines() {
        let (builder, sink) = builder();
        assert!(builder.build(&["not json"]).is_none());
        assert_eq!(sink.codes(), vec!["json_decode_error", "no_valid_documents"]);
    }

    #[test]
    fn test_scalars_are_not_records() {
        let (builder, _sink) = builder();
        assert!(builder.build(&["1", "\"text\"", "[1,2]", "null"]).is_none());
    }

    #[test]
    fn test_expected_payload() {
        let (builder, sink) = builder();
        let lines = [
            r#"{"timestamp": "2020-01-01T00:01:01", "url": "/path/page1.html"}"#,
            r#"{"timestamp": "2020-01-01T00:02:01", "url": "/path/page2.html"}"#,
        ];

        let payload = builder.build(&lines).unwrap();

        let expected = concat!(
            "{\"index\":{}}\n",
            "{\"timestamp\":\"2020-01-01T00:01:01\",\"url\":\"/path/page1.html\"}\n",
            "{\"index\":{}}\n",
            "{\"timestamp\":\"2020-01-01T00:02:01\",\"url\":\"/path/page2.html\"}\n",
        );
        assert_eq!(payload.as_str(), expected);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_invalid_lines_are_skipped_in_order() {
        let (builder, sink) = builder();
        let lines = vec![
            r#"{"seq": 1}"#.to_string(),
            "garbage".to_string(),
            String::new(),
            r#"{"seq": 2, "nested": {"a": [1, 2, 3]}}"#.to_string(),
            r#"{"seq": 3"#.to_string(),
            r#"{"seq": 4}"#.to_string(),
        ];

        let payload = builder.build(&lines).unwrap();

        assert_eq!(payload.documents(), 3);
        assert_eq!(
            records(&payload),
            vec![
                json!({"seq": 1}),
                json!({"seq": 2, "nested": {"a": [1, 2, 3]}}),
                json!({"seq": 4}),
            ]
        );
        assert_eq!(
            sink.codes(),
            vec!["json_decode_error", "json_decode_error", "json_decode_error"]
        );
    }

    #[test]
    fn test_numbers_are_kept_exact() {
        let (builder, _sink) = builder();
        let lines = [
            r#"{"id": 123456789012345678901234567890, "neg": -98765432109876543210}"#,
            r#"{"ratio": 0.1000000000000000055511151231257827}"#,
        ];

        let payload = builder.build(&lines).unwrap();

        let expected = concat!(
            "{\"index\":{}}\n",
            "{\"id\":123456789012345678901234567890,\"neg\":-98765432109876543210}\n",
            "{\"index\":{}}\n",
            "{\"ratio\":0.1000000000000000055511151231257827}\n",
        );
        assert_eq!(payload.as_str(), expected);
    }

    #[test]
    fn test_records_round_trip() {
        let (builder, _sink) = builder();
        let lines = [
            r#"{"message": "café \"quoted\"", "level": "info"}"#,
            r#"{"n": 1.5, "flag": true, "none": null, "list": [{"x": -1}]}"#,
            r#"   {"padded": "whitespace"}   "#,
        ];

        let payload = builder.build(&lines).unwrap();

        let expected: Vec<Value> = lines
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records(&payload), expected);
    }
}
