//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IObjectStore`] - remote bucket operations (S3 via `bucketlink-store`)
//! - [`ILocalTree`] - local filesystem operations (`bucketlink-sync`)

pub mod local_tree;
pub mod object_store;

pub use local_tree::ILocalTree;
pub use object_store::IObjectStore;
