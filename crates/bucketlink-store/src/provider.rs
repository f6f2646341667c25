//! S3 implementation of the object store port
//!
//! Maps the port's key/hatch vocabulary onto the S3 API:
//! - hatches are ETags with their quotes stripped; single-part uploads
//!   keep them comparable to local MD5 digests
//! - `rename` is CopyObject + DeleteObject; S3 has no native move
//! - listing pages through ListObjectsV2 continuation tokens
//!
//! Object keys that are not representable as [`RelativeKey`]s (absolute,
//! traversing, or `//` keys) are skipped with a warning rather than
//! failing the whole listing.

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use tracing::{debug, info, warn};

use bucketlink_core::config::BucketConfig;
use bucketlink_core::domain::newtypes::{BucketName, Hatch, RelativeKey};
use bucketlink_core::domain::record::FileRecord;
use bucketlink_core::ports::object_store::IObjectStore;

use crate::client;
use crate::error::StoreError;

/// Adapter that bridges the `IObjectStore` port to an S3 bucket.
pub struct S3ObjectStore {
    client: Client,
    bucket: BucketName,
}

impl S3ObjectStore {
    /// Wrap an already-constructed client (used by tests).
    #[must_use]
    pub fn new(client: Client, bucket: BucketName) -> Self {
        Self { client, bucket }
    }

    /// Build a store from bucket settings and the ambient credential chain.
    pub async fn connect(config: &BucketConfig, bucket: BucketName) -> Self {
        let client = client::connect(config).await;
        Self { client, bucket }
    }

    /// The bucket this store operates on.
    #[must_use]
    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    /// Probe the bucket, optionally creating it when absent.
    ///
    /// Creation tolerates `BucketAlreadyOwnedByYou`, so re-linking an
    /// existing bucket is not an error.
    pub async fn ensure_bucket(&self, create_missing: bool) -> Result<(), StoreError> {
        match self
            .client
            .head_bucket()
            .bucket(self.bucket.as_str())
            .send()
            .await
        {
            Ok(_) => {
                debug!(bucket = %self.bucket, "bucket exists");
                Ok(())
            }
            Err(err) => {
                let service = err.into_service_error();
                if !service.is_not_found() {
                    return Err(StoreError::Configuration(format!(
                        "probing bucket '{}': {service}",
                        self.bucket
                    )));
                }
                if !create_missing {
                    return Err(StoreError::BucketMissing(self.bucket.to_string()));
                }
                self.create_bucket().await
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), StoreError> {
        let mut request = self.client.create_bucket().bucket(self.bucket.as_str());

        // us-east-1 rejects an explicit location constraint.
        if let Some(region) = self.client.config().region() {
            let name = region.as_ref();
            if name != "us-east-1" {
                let constraint = BucketLocationConstraint::from(name);
                request = request.create_bucket_configuration(
                    CreateBucketConfiguration::builder()
                        .location_constraint(constraint)
                        .build(),
                );
            }
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket = %self.bucket, "created bucket");
                Ok(())
            }
            Err(err) => {
                let service = err.into_service_error();
                if service.is_bucket_already_owned_by_you() || service.is_bucket_already_exists() {
                    debug!(bucket = %self.bucket, "bucket already present");
                    Ok(())
                } else {
                    Err(StoreError::Configuration(format!(
                        "creating bucket '{}': {service}",
                        self.bucket
                    )))
                }
            }
        }
    }
}

/// Percent-encode a key for use in the `x-amz-copy-source` header.
fn encode_copy_source(bucket: &BucketName, key: &RelativeKey) -> String {
    let encoded: String = key
        .as_str()
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                char::from(b).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect();
    format!("{bucket}/{encoded}")
}

#[async_trait::async_trait]
impl IObjectStore for S3ObjectStore {
    async fn list(&self) -> anyhow::Result<Vec<FileRecord>> {
        let mut records = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(self.bucket.as_str());
            if let Some(t) = &token {
                request = request.continuation_token(t.clone());
            }
            let response = request.send().await.map_err(|e| {
                StoreError::Request(format!("listing bucket: {}", DisplayErrorContext(&e)))
            })?;

            for object in response.contents() {
                let (Some(raw_key), Some(etag)) = (object.key(), object.e_tag()) else {
                    continue;
                };
                let key = match RelativeKey::new(raw_key) {
                    Ok(key) => key,
                    Err(e) => {
                        warn!(key = %raw_key, error = %e, "skipping unrepresentable object key");
                        continue;
                    }
                };
                let hatch = match Hatch::from_etag(etag) {
                    Ok(hatch) => hatch,
                    Err(e) => {
                        warn!(key = %raw_key, error = %e, "skipping object with unusable ETag");
                        continue;
                    }
                };
                records.push(FileRecord::new(key, hatch));
            }

            if response.is_truncated() == Some(true) {
                token = response.next_continuation_token().map(str::to_string);
                if token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(bucket = %self.bucket, objects = records.len(), "bucket listing complete");
        Ok(records)
    }

    async fn get(&self, key: &RelativeKey) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                StoreError::Request(format!("getting '{key}': {}", DisplayErrorContext(&e)))
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Request(format!("reading body of '{key}': {e}")))?
            .into_bytes()
            .to_vec();

        debug!(%key, bytes = data.len(), "object downloaded");
        Ok(data)
    }

    async fn put(&self, key: &RelativeKey, data: &[u8]) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| {
                StoreError::Request(format!("putting '{key}': {}", DisplayErrorContext(&e)))
            })?;

        debug!(%key, bytes = data.len(), "object uploaded");
        Ok(())
    }

    async fn rename(&self, from: &RelativeKey, to: &RelativeKey) -> anyhow::Result<()> {
        self.client
            .copy_object()
            .bucket(self.bucket.as_str())
            .copy_source(encode_copy_source(&self.bucket, from))
            .key(to.as_str())
            .send()
            .await
            .map_err(|e| {
                StoreError::Request(format!(
                    "copying '{from}' to '{to}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        self.client
            .delete_object()
            .bucket(self.bucket.as_str())
            .key(from.as_str())
            .send()
            .await
            .map_err(|e| {
                StoreError::Request(format!(
                    "deleting '{from}' after copy: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(%from, %to, "object renamed");
        Ok(())
    }

    async fn delete(&self, key: &RelativeKey) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(self.bucket.as_str())
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                StoreError::Request(format!("deleting '{key}': {}", DisplayErrorContext(&e)))
            })?;

        debug!(%key, "object deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_copy_source_plain_key() {
        let bucket = BucketName::new("my-bucket").unwrap();
        let key = RelativeKey::new("sub1/deep.file").unwrap();
        assert_eq!(
            encode_copy_source(&bucket, &key),
            "my-bucket/sub1/deep.file"
        );
    }

    #[test]
    fn test_encode_copy_source_escapes_spaces() {
        let bucket = BucketName::new("my-bucket").unwrap();
        let key = RelativeKey::new("with space/a+b.txt").unwrap();
        assert_eq!(
            encode_copy_source(&bucket, &key),
            "my-bucket/with%20space/a%2Bb.txt"
        );
    }
}
