//! Operator-aware deep merge for docop
//!
//! This crate patches a document's field mapping with a sparse update
//! description. Literal patch values replace or recursively merge; values
//! tagged with a sigil-prefixed operation marker (`{"$push": 3}`) resolve
//! against a closed operator registry and mutate the value in place.
//!
//! - [`operator`]: The registry — every operator, its argument rules, and
//!   its return value
//! - [`engine`]: The recursive merge algorithm and the merge result policy
//!
//! # Example
//!
//! ```
//! use docop_merge::apply;
//! use serde_json::json;
//!
//! let mut target = json!({"tags": [1, 2], "meta": {"a": 1}})
//!     .as_object().cloned().unwrap();
//! let patch = json!({"tags": {"$push": 3}, "meta": {"b": 2}})
//!     .as_object().cloned().unwrap();
//!
//! apply(&mut target, &patch)?;
//!
//! assert_eq!(target.get("tags"), Some(&json!([1, 2, 3])));
//! assert_eq!(target.get("meta"), Some(&json!({"a": 1, "b": 2})));
//! # Ok::<(), docop_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod operator;

pub use engine::apply;
pub use operator::{Operator, SIGIL};
