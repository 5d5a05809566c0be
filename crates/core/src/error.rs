//! Error types for the docop core
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! There is no internal retry or backoff anywhere in the core: every error is
//! fatal to the current invocation. Bulk work is retried externally, by
//! re-invoking with the resume cursor reported by the last successful response.

use crate::document::DocId;
use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for docop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document mutation core
#[derive(Debug, Error)]
pub enum Error {
    /// Query gateway failure
    #[error("query failed: {0}")]
    Query(String),

    /// Document store failure (create/replace/delete completion)
    #[error("store error: {0}")]
    Store(String),

    /// Document not found for replace/delete addressing
    #[error("document {0} not found")]
    DocumentNotFound(DocId),

    /// The host write budget refused a write with no resume protocol
    #[error("write rejected: host budget exhausted")]
    BudgetExhausted,

    /// Invalid input, reported before any store interaction
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error in the stored representation
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Patch named an operator the registry does not know
    #[error("unknown operator ${0}")]
    UnknownOperator(String),

    /// Operator marker aimed at a key absent from the target document
    #[error("operator ${operator} has no target at \"{key}\"")]
    OperatorTargetMissing {
        /// Operator name, without the sigil
        operator: &'static str,
        /// Patch key the marker was found under
        key: String,
    },

    /// Operator applied to a value of the wrong shape
    #[error("operator ${operator} expects an array at \"{key}\", found {actual}")]
    OperatorTargetMismatch {
        /// Operator name, without the sigil
        operator: &'static str,
        /// Patch key the marker was found under
        key: String,
        /// Type name of the value actually present
        actual: &'static str,
    },

    /// Operator invoked with arguments it cannot accept
    #[error("bad arguments for ${operator}: {detail}")]
    OperatorArguments {
        /// Operator name, without the sigil
        operator: &'static str,
        /// What was wrong with the arguments
        detail: String,
    },

    /// Patch recursion exceeded the nesting limit
    #[error("patch nesting depth {depth} exceeds maximum {max}")]
    PatchTooDeep {
        /// Depth reached before the guard fired
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Document limit violation
    #[error("limit exceeded: {0}")]
    Limit(#[from] LimitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MAX_NESTING_DEPTH;

    #[test]
    fn test_error_display_query() {
        let err = Error::Query("syntax error near WHERE".to_string());
        let msg = err.to_string();
        assert!(msg.contains("query failed"));
        assert!(msg.contains("syntax error near WHERE"));
    }

    #[test]
    fn test_error_display_store() {
        let err = Error::Store("write failed".to_string());
        assert!(err.to_string().contains("store error"));
    }

    #[test]
    fn test_error_display_document_not_found() {
        let id = DocId::new();
        let err = Error::DocumentNotFound(id);
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn test_error_display_budget_exhausted() {
        let msg = Error::BudgetExhausted.to_string();
        assert!(msg.contains("budget exhausted"));
    }

    #[test]
    fn test_error_display_unknown_operator() {
        let err = Error::UnknownOperator("frobnicate".to_string());
        assert_eq!(err.to_string(), "unknown operator $frobnicate");
    }

    #[test]
    fn test_error_display_operator_target_mismatch() {
        let err = Error::OperatorTargetMismatch {
            operator: "push",
            key: "tags".to_string(),
            actual: "string",
        };
        let msg = err.to_string();
        assert!(msg.contains("$push"));
        assert!(msg.contains("\"tags\""));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_error_display_patch_too_deep() {
        let err = Error::PatchTooDeep {
            depth: 128,
            max: MAX_NESTING_DEPTH,
        };
        assert!(err.to_string().contains("128"));
    }

    #[test]
    fn test_error_from_limit() {
        let limit = LimitError::NestingTooDeep {
            depth: 200,
            max: MAX_NESTING_DEPTH,
        };
        let err: Error = limit.into();
        assert!(matches!(err, Error::Limit(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::BudgetExhausted)
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
