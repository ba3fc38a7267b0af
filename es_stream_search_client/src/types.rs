//! Index names and the bulk request body.

use serde_json::Value;
use snafu::Snafu;

/// Action line preceding every document in a bulk request.
pub const BULK_ACTION_HEADER: &str = r#"{"index":{}}"#;

const FORBIDDEN_INDEX_CHARS: &[char] = &['/', '\\', '*', '?', '"', '<', '>', '|', ' ', ',', '#'];

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("invalid index name: '{name}'"))]
pub struct InvalidIndexName {
    name: String,
}

/// Name of an index in the search service.
///
/// The name is used verbatim as a URL path segment, so characters that would
/// change the request path are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexName(String);

impl IndexName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidIndexName> {
        let name = name.into();

        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.starts_with(['-', '_', '+'])
            && !name.contains(FORBIDDEN_INDEX_CHARS);

        if !valid {
            return InvalidIndexNameSnafu { name }.fail();
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndexName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a bulk indexing request.
///
/// One `{"index":{}}` line followed by one document line per record, each
/// newline-terminated. A payload always holds at least one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPayload {
    body: String,
    documents: usize,
}

impl BulkPayload {
    /// Serialize `documents` into a payload, or `None` if there are none.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Option<Self> {
        let mut body = String::new();
        let mut count = 0;

        for document in documents {
            body.push_str(BULK_ACTION_HEADER);
            body.push('\n');
            body.push_str(&document.to_string());
            body.push('\n');
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            body,
            documents: count,
        })
    }

    /// Number of documents in the payload.
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }
}

impl std::fmt::Display for BulkPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}
