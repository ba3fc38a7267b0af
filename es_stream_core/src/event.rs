//! Notification event parsing.

use serde::Deserialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use crate::error::{InvalidRecordSnafu, KeyDecodeSnafu, MissingRecordsSnafu, Result};

#[derive(Debug, Deserialize)]
struct S3EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// One object-created notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub bucket: String,
    /// Object key, already percent-decoded.
    pub key: String,
}

impl NotificationRecord {
    /// Extract bucket and key from a raw `Records[]` entry.
    ///
    /// The key is percent-decoded; `+` is left as is.
    pub fn from_value(value: &Value) -> Result<Self> {
        let record = S3EventRecord::deserialize(value).context(InvalidRecordSnafu {})?;
        let S3Entity { bucket, object } = record.s3;

        let key = urlencoding::decode(&object.key)
            .context(KeyDecodeSnafu { key: &object.key })?
            .into_owned();

        Ok(Self {
            bucket: bucket.name,
            key,
        })
    }
}

/// The `Records` list of a notification event.
pub fn event_records(event: &Value) -> Result<&[Value]> {
    event
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .context(MissingRecordsSnafu {})
}
