//! S3 client construction
//!
//! Builds the SDK client from [`BucketConfig`] and the standard AWS
//! credential chain. Credentials are never read from bucketlink's own
//! configuration file; the environment, shared profile, or instance
//! metadata provide them.
//!
//! An `endpoint` override switches the client to path-style addressing,
//! which S3-compatible stores (MinIO, localstack) expect.

use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use tracing::debug;

use bucketlink_core::config::BucketConfig;

/// Build an S3 client for the given bucket settings.
pub async fn connect(config: &BucketConfig) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint.clone());
    }
    let shared = loader.load().await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared);
    if config.endpoint.is_some() {
        builder = builder.force_path_style(true);
    }

    debug!(
        region = ?config.region,
        endpoint = ?config.endpoint,
        "S3 client configured"
    );
    Client::from_conf(builder.build())
}
