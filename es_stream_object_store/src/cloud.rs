//! AWS S3 object store factory.

use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;

use crate::ObjectStoreFactory;

/// Creates S3 clients for any bucket.
///
/// Credentials are read from the environment (`AWS_ACCESS_KEY_ID`,
/// `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`, container credentials), which
/// is what the Lambda runtime provides.
#[derive(Debug, Clone, Default)]
pub struct S3ObjectStoreFactory {
    region: Option<String>,
    endpoint: Option<String>,
    skip_signature: bool,
}

impl S3ObjectStoreFactory {
    pub fn new(region: Option<String>) -> Self {
        Self {
            region,
            endpoint: None,
            skip_signature: false,
        }
    }

    /// Use an S3-compatible endpoint (e.g. MinIO) instead of AWS.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Send unsigned requests. For public buckets and local S3-compatible stores.
    pub fn with_skip_signature(mut self, skip_signature: bool) -> Self {
        self.skip_signature = skip_signature;
        self
    }

    fn builder(&self, bucket: &str) -> AmazonS3Builder {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_skip_signature(self.skip_signature);

        if let Some(region) = &self.region {
            builder = builder.with_region(region);
        }

        // Allow HTTP for S3-compatible storage
        if let Some(endpoint) = &self.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        builder
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for S3ObjectStoreFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, object_store::Error> {
        let store = self.builder(bucket).build()?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_store_with_region() {
        let factory = S3ObjectStoreFactory::new(Some("eu-west-1".to_string()));
        let store = factory.create_object_store("my-bucket").await.unwrap();
        assert!(store.to_string().contains("my-bucket"));
    }

    #[tokio::test]
    async fn test_create_store_with_endpoint() {
        let factory = S3ObjectStoreFactory::new(Some("us-east-1".to_string()))
            .with_endpoint("http://localhost:9000");
        assert!(factory.create_object_store("logs").await.is_ok());
    }
}
