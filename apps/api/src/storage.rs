use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::errors::AppError;

/// Write side of the object store holding per-user profile files.
/// Carried in `AppState` as `Arc<dyn ProfileStore>`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Stores `body` verbatim at `key`. No schema is enforced.
    async fn put_json(&self, key: &str, body: String) -> Result<(), AppError>;
}

pub struct S3ProfileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ProfileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ProfileStore for S3ProfileStore {
    async fn put_json(&self, key: &str, body: String) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body.into_bytes()))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload of {key} failed: {e}")))?;

        info!("Uploaded profile to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
