use crate::config::StorageSettings;
use crate::error::{ImgoodError, Result};
use crate::formats::content_type_for_key;
use crate::storage::{object_url, ObjectStore, StorageEntry};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::cell::OnceCell;
use std::future::Future;
use tokio::runtime::Runtime;
use tracing::debug;

/// S3 page size upper bound.
const MAX_KEYS_PER_PAGE: usize = 1000;

/// [`ObjectStore`] backed by an S3-compatible service.
///
/// The SDK is async; each call blocks on a runtime owned by the store. The SDK
/// client is built on first use, so commands that fail validation never resolve
/// AWS configuration.
pub struct S3Store {
    client: OnceCell<Client>,
    settings: StorageSettings,
    runtime: Runtime,
}

impl S3Store {
    /// Prepares a store for `settings`. No request is sent and an empty bucket
    /// is only rejected once the store is used.
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client: OnceCell::new(),
            settings: settings.clone(),
            runtime,
        })
    }

    fn client(&self) -> &Client {
        self.client.get_or_init(|| {
            debug!(region = %self.settings.region, endpoint = %self.settings.endpoint, "building S3 client");
            self.runtime.block_on(build_client(&self.settings))
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn require_bucket(&self) -> Result<&str> {
        if self.settings.bucket.is_empty() {
            return Err(ImgoodError::MissingBucket);
        }
        Ok(&self.settings.bucket)
    }
}

async fn build_client(settings: &StorageSettings) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if !settings.region.is_empty() {
        loader = loader.region(Region::new(settings.region.clone()));
    }
    if !settings.access_key.is_empty() && !settings.secret_key.is_empty() {
        loader = loader.credentials_provider(Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "imgood-config",
        ));
    }
    let sdk_config = loader.load().await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
    if !settings.endpoint.is_empty() {
        s3_config = s3_config.endpoint_url(settings.endpoint.clone());
    }
    Client::from_conf(s3_config.build())
}

fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()).unwrap_or_default()
}

impl ObjectStore for S3Store {
    fn ensure_ready(&self) -> Result<()> {
        self.require_bucket().map(|_| ())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let bucket = self.require_bucket()?;
        debug!(bucket, key, "head object");
        let result = self.block_on(self.client().head_object().bucket(bucket).key(key).send());

        match result {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(aws_sdk_s3::operation::head_object::HeadObjectError::is_not_found)
                {
                    return Ok(false);
                }
                Err(ImgoodError::storage(
                    "checking if object exists",
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(err),
                ))
            }
        }
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let bucket = self.require_bucket()?;
        debug!(bucket, key, "get object");
        let client = self.client();
        self.block_on(async {
            let output = client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    ImgoodError::storage(
                        "getting object",
                        key,
                        aws_sdk_s3::error::DisplayErrorContext(e),
                    )
                })?;
            let body = output
                .body
                .collect()
                .await
                .map_err(|e| ImgoodError::storage("reading object body", key, e))?;
            Ok::<_, ImgoodError>(body.into_bytes().to_vec())
        })
    }

    fn put(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let bucket = self.require_bucket()?;
        debug!(bucket, key, size = data.len(), "put object");
        let request = self
            .client()
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type_for_key(key).map(str::to_string))
            .body(ByteStream::from(data));

        self.block_on(request.send()).map_err(|e| {
            ImgoodError::storage("uploading", key, aws_sdk_s3::error::DisplayErrorContext(e))
        })?;
        Ok(())
    }

    fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StorageEntry>> {
        let bucket = self.require_bucket()?;
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let remaining = if limit == 0 {
                MAX_KEYS_PER_PAGE
            } else {
                (limit - entries.len()).min(MAX_KEYS_PER_PAGE)
            };
            debug!(bucket, prefix, remaining, "list objects page");

            let mut request = self
                .client()
                .list_objects_v2()
                .bucket(bucket)
                .max_keys(remaining as i32)
                .set_continuation_token(continuation.take());
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }

            let output = self.block_on(request.send()).map_err(|e| {
                ImgoodError::storage(
                    "listing objects",
                    prefix,
                    aws_sdk_s3::error::DisplayErrorContext(e),
                )
            })?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                entries.push(StorageEntry {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0),
                    last_modified: object.last_modified().map(to_chrono).unwrap_or_default(),
                    url: self.url(key),
                });
            }

            let reached_limit = limit != 0 && entries.len() >= limit;
            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) && !reached_limit => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        if limit != 0 {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    fn url(&self, key: &str) -> String {
        object_url(&self.settings, key)
    }

    fn bucket_name(&self) -> &str {
        &self.settings.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defers_client() {
        let store = S3Store::new(&StorageSettings::default()).unwrap();
        assert!(store.client.get().is_none());
    }

    #[test]
    fn test_missing_bucket_fails_before_client() {
        let store = S3Store::new(&StorageSettings::default()).unwrap();
        assert!(matches!(store.ensure_ready(), Err(ImgoodError::MissingBucket)));
        assert!(matches!(store.exists("a.png"), Err(ImgoodError::MissingBucket)));
        assert!(matches!(store.list("", 10), Err(ImgoodError::MissingBucket)));
        assert!(store.client.get().is_none());
    }

    #[test]
    fn test_url_uses_settings() {
        let settings = StorageSettings {
            bucket: "photos".to_string(),
            region: "us-west-2".to_string(),
            ..Default::default()
        };
        let store = S3Store::new(&settings).unwrap();
        assert_eq!(store.bucket_name(), "photos");
        assert_eq!(
            store.url("cat.webp"),
            "https://photos.s3.us-west-2.amazonaws.com/cat.webp"
        );
    }
}
