//! In-memory buckets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Error as ObjectStoreError, ObjectStore, PutPayload};

use crate::ObjectStoreFactory;

/// Factory over named [`InMemory`] stores.
///
/// Buckets exist once they are created with [`Self::bucket`] or written to
/// with [`Self::put`]; asking for any other bucket fails with `NotFound`.
#[derive(Debug, Default)]
pub struct InMemoryObjectStoreFactory {
    buckets: Mutex<HashMap<String, Arc<InMemory>>>,
}

impl InMemoryObjectStoreFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the store for `bucket`.
    pub fn bucket(&self, bucket: &str) -> Arc<InMemory> {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }

    /// Write `content` to `key` in `bucket`, creating the bucket if needed.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), ObjectStoreError> {
        let location = Path::parse(key)?;
        let store = self.bucket(bucket);
        store
            .put(&location, PutPayload::from(content.into()))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for InMemoryObjectStoreFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        let buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        match buckets.get(bucket) {
            Some(store) => Ok(store.clone()),
            None => Err(ObjectStoreError::NotFound {
                path: bucket.to_string(),
                source: format!("bucket {bucket} does not exist").into(),
            }),
        }
    }
}
