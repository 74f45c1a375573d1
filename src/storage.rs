use crate::config::StorageSettings;
use crate::error::Result;
use chrono::{DateTime, Utc};

/// One object returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub key: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
    pub url: String,
}

/// Object-storage capability used by the command orchestrators.
///
/// Calls block the current thread until the backend answers.
pub trait ObjectStore {
    /// Fails when the store cannot be used at all (e.g. no bucket configured).
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool>;

    fn get(&self, key: &str) -> Result<Vec<u8>>;

    fn put(&self, key: &str, data: Vec<u8>) -> Result<()>;

    /// Lists up to `limit` objects under `prefix` (0 lists everything).
    fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StorageEntry>>;

    /// Public URL of `key`.
    fn url(&self, key: &str) -> String;

    fn bucket_name(&self) -> &str;
}

/// Builds the public URL of `key`.
///
/// With a custom endpoint the bucket is used as a sub-domain of the endpoint
/// host; otherwise the AWS virtual-hosted style is used.
pub fn object_url(settings: &StorageSettings, key: &str) -> String {
    let key = key.trim_start_matches('/');
    let endpoint = settings.endpoint.trim();

    if endpoint.is_empty() {
        return format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            settings.bucket, settings.region, key
        );
    }

    let host = endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://{}.{}/{}", settings.bucket, host, key)
}
