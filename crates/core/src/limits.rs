//! Size limits for documents
//!
//! This module enforces the following limits to prevent memory issues:
//!
//! | Limit | Value | Constant |
//! |-------|-------|----------|
//! | Max document size | 16 MB | [`MAX_DOCUMENT_BYTES`] |
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//!
//! The store validates documents on create and replace; the merge engine uses
//! the nesting limit as its recursion guard.

use crate::document::Fields;
use thiserror::Error;

/// Maximum document size in bytes (16 MB)
///
/// Documents larger than this are rejected to prevent memory issues.
/// This limit is checked on create and replace operations.
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024; // 16 MB

/// Maximum nesting depth in a document (100 levels)
///
/// Prevents stack overflow during recursive operations like serialization
/// and merge traversal.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Error type for document limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Document exceeds maximum size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual document size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Document nesting exceeds maximum depth
    #[error("document nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },
}

/// Calculate the maximum nesting depth of a JSON value
///
/// Returns 0 for primitives (null, bool, number, string),
/// and counts nested objects/arrays.
pub fn nesting_depth(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)
        | serde_json::Value::String(_) => 0,
        serde_json::Value::Array(arr) => 1 + arr.iter().map(nesting_depth).max().unwrap_or(0),
        serde_json::Value::Object(obj) => 1 + obj.values().map(nesting_depth).max().unwrap_or(0),
    }
}

/// Approximate size in bytes of a field mapping
///
/// An estimate based on the JSON string representation. Actual in-memory
/// size may differ.
pub fn approximate_size(fields: &Fields) -> usize {
    serde_json::to_string(fields).map(|s| s.len()).unwrap_or(0)
}

/// Validate a field mapping against all document limits
///
/// Checks byte size and nesting depth. The depth of the mapping itself counts
/// as one level, matching how the mapping nests inside its document.
pub fn validate_fields(fields: &Fields) -> Result<(), LimitError> {
    let size = approximate_size(fields);
    if size > MAX_DOCUMENT_BYTES {
        return Err(LimitError::DocumentTooLarge {
            size,
            max: MAX_DOCUMENT_BYTES,
        });
    }

    let depth = 1 + fields.values().map(nesting_depth).max().unwrap_or(0);
    if depth > MAX_NESTING_DEPTH {
        return Err(LimitError::NestingTooDeep {
            depth,
            max: MAX_NESTING_DEPTH,
        });
    }

    Ok(())
}
