//! Local file system object store factory.
//!
//! Each bucket is a subdirectory of the root path, so `s3://logs/a/b.json`
//! maps to `<root>/logs/a/b.json`. Used to replay events without AWS.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::{Error as ObjectStoreError, ObjectStore, local::LocalFileSystem};

use crate::ObjectStoreFactory;

#[derive(Debug, Clone)]
pub struct LocalFileSystemFactory {
    root_path: PathBuf,
}

impl LocalFileSystemFactory {
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self, ObjectStoreError> {
        let canonical_path =
            std::fs::canonicalize(root_path.as_ref()).map_err(|e| ObjectStoreError::Generic {
                store: "LocalFileSystem",
                source: Box::new(e),
            })?;

        Ok(Self {
            root_path: canonical_path,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for LocalFileSystemFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        let bucket_path = self.root_path.join(bucket);

        let invalid = bucket.is_empty()
            || bucket == "."
            || bucket == ".."
            || bucket.contains(['/', '\\']);
        if invalid || !bucket_path.is_dir() {
            return Err(ObjectStoreError::NotFound {
                path: bucket_path.display().to_string(),
                source: format!("bucket {bucket} does not exist").into(),
            });
        }

        let local_fs = LocalFileSystem::new_with_prefix(bucket_path)?;

        Ok(Arc::new(local_fs))
    }
}
