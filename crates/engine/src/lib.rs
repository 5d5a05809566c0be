//! Document operations for docop
//!
//! The four operations the mutation core exposes, each a plain synchronous
//! function over explicit collaborators:
//!
//! - [`update`]: Query, merge a patch into each match, replace
//! - [`find_or_create`]: Query, create the candidate only if nothing matched
//! - [`remove`]: Query, delete each match, collect acknowledgements
//! - [`bulk_insert`] / [`BulkJob`]: Sequential creates under a revocable host
//!   budget, with a first-class resume cursor
//!
//! All failures are fatal to the invocation; there is no internal retry.
//! Bulk work resumes externally, by re-invoking over the suffix the last
//! response pointed at.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bulk;
pub mod find_or_create;
pub mod remove;
pub mod update;

#[cfg(test)]
mod testing;

pub use bulk::{bulk_insert, BulkJob, BulkOutcome, StepOutcome};
pub use find_or_create::find_or_create;
pub use remove::remove;
pub use update::{update, UpdateOutcome};
