//! Domain model for bidirectional tree synchronization
//!
//! - [`newtypes`] - validated wrappers: `RelativeKey`, `Hatch`, `BucketName`,
//!   `LocalRoot`, `RunId`
//! - [`record`] - `FileRecord`, `TreeSnapshot`, and diff classification
//! - [`plan`] - `Action`, `PlanStep`, `SyncPlan`
//! - [`policy`] - the push/pull × safe/unsafe policy table
//! - [`namer`] - revision naming for keep-both renames
//! - [`errors`] - domain error types

pub mod errors;
pub mod namer;
pub mod newtypes;
pub mod plan;
pub mod policy;
pub mod record;

pub use errors::DomainError;
pub use newtypes::{BucketName, Hatch, LocalRoot, RelativeKey, RunId};
pub use plan::{Action, PlanStep, SyncPlan};
pub use policy::{build_plan, ConflictMode, Direction};
pub use record::{classify, FileRecord, Relation, TreeSnapshot};
