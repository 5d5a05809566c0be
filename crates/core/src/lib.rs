//! Core types and traits for docop
//!
//! This crate defines the foundational vocabulary used throughout the system:
//! - DocId: Unique identifier for a stored document
//! - Fields / Document: The stored record and its field mapping
//! - Error / Result: Error type hierarchy shared by all crates
//! - Traits: Collaborator seams (QueryGateway, DocumentStore)
//! - Limits: Document size and nesting ceilings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod limits;
pub mod traits;

// Re-export commonly used types and traits
pub use document::{DocId, Document, Fields};
pub use error::{Error, Result};
pub use limits::{
    nesting_depth, validate_fields, LimitError, MAX_DOCUMENT_BYTES, MAX_NESTING_DEPTH,
};
pub use traits::{DeleteAck, DocumentStore, InsertOutcome, QueryGateway};
