//! Read access to the blob store that emits the notifications.
//!
//! Notifications name a bucket and a key. An [`ObjectStoreFactory`] turns the
//! bucket into an [`ObjectStore`] client, and [`ObjectSource`] reads the key
//! from it as text.
//!
//! Factories are provided for AWS S3 (and S3-compatible endpoints), for a
//! local directory where each bucket is a subdirectory, and for in-memory
//! stores used in tests.

pub mod cloud;
pub mod local;
pub mod memory;
pub mod source;

use std::sync::Arc;

use object_store::ObjectStore;

pub use cloud::S3ObjectStoreFactory;
pub use local::LocalFileSystemFactory;
pub use memory::InMemoryObjectStoreFactory;
pub use source::{ObjectSource, ObjectSourceError};

/// Factory trait for creating bucket-scoped ObjectStore instances.
#[async_trait::async_trait]
pub trait ObjectStoreFactory: Send + Sync + std::fmt::Debug {
    /// Create an ObjectStore rooted at `bucket`.
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, object_store::Error>;
}
