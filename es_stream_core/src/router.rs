//! Object key to index name routing.
//!
//! Keys look like `<producer>/<YYYY-MM-DD>T<time>/<rest>`. The index for such
//! a key is `<producer>-<YYYY.MM.DD>`. Only one producer is recognized.

use chrono::NaiveDate;
use es_stream_search_client::IndexName;

pub const DEFAULT_PRODUCER: &str = "serviceA";

#[derive(Debug, Clone)]
pub struct IndexRouter {
    producer: String,
}

impl IndexRouter {
    pub fn new(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
        }
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    /// Index name for `key`, or `None` if the key does not have the expected shape.
    pub fn route(&self, key: &str) -> Option<IndexName> {
        let mut segments = key.split('/');

        let producer = segments.next()?;
        if producer != self.producer {
            return None;
        }

        let date = segments.next()?.split('T').next()?;
        let well_formed = date.len() == "YYYY-MM-DD".len()
            && date.bytes().all(|b| b.is_ascii_digit() || b == b'-');
        if !well_formed {
            return None;
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

        IndexName::new(format!("{producer}-{}", date.replace('-', "."))).ok()
    }
}

impl Default for IndexRouter {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCER)
    }
}
