//! bucketlink Store - S3 adapter for the object store port
//!
//! Provides:
//! - Client construction from configuration and the standard AWS
//!   credential chain (environment, profile, instance metadata)
//! - [`provider::S3ObjectStore`] implementing `IObjectStore`
//! - Bucket existence probing and optional creation
//!
//! ## Modules
//!
//! - [`client`] - SDK client construction (region/endpoint overrides)
//! - [`provider`] - the port implementation (list/get/put/rename/delete)
//! - [`error`] - store error types

pub mod client;
pub mod error;
pub mod provider;

pub use error::StoreError;
pub use provider::S3ObjectStore;
