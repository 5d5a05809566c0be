//! docop - Server-side document mutation core
//!
//! docop implements the mutation logic a document store runs next to its
//! data: an operator-aware deep merge that patches documents with sparse
//! update descriptions, and four operations composed over injected
//! collaborators — update, find-or-create, remove, and a quota-aware bulk
//! insert that survives host preemption through a resumable cursor.
//!
//! # Quick Start
//!
//! ```
//! use docop::{invoke, MemoryCollection, OperationKind, Request};
//! use serde_json::json;
//!
//! let collection = MemoryCollection::new();
//!
//! // Insert a batch; the body is the count persisted
//! let count = invoke(
//!     &collection,
//!     Request::new(
//!         OperationKind::BulkInsert,
//!         vec![json!([{"name": "a", "tags": [1]}, {"name": "b", "tags": []}])],
//!     ),
//! )?;
//! assert_eq!(count, json!(2));
//!
//! // Patch with an operator marker
//! let updated = invoke(
//!     &collection,
//!     Request::new(
//!         OperationKind::Update,
//!         vec![json!(r#"name == "a""#), json!({"tags": {"$push": 2}}), json!(true)],
//!     ),
//! )?;
//! assert_eq!(updated["fields"]["tags"], json!([1, 2]));
//! # Ok::<(), docop::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `docop-core`: Documents, identity, errors, limits, collaborator traits
//! - `docop-merge`: The operator registry and recursive merge engine
//! - `docop-storage`: The write budget and an in-memory reference collection
//! - `docop-engine`: The four operations
//! - This crate: Re-exports plus the [`dispatch`] surface (operation name +
//!   positional JSON arguments → response body)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dispatch;

pub use dispatch::{invoke, OperationKind, Request};

// Re-export the vocabulary so embedders need only this crate
pub use docop_core::{
    DeleteAck, DocId, Document, DocumentStore, Error, Fields, InsertOutcome, LimitError,
    QueryGateway, Result, MAX_DOCUMENT_BYTES, MAX_NESTING_DEPTH,
};
pub use docop_engine::{
    bulk_insert, find_or_create, remove, update, BulkJob, BulkOutcome, StepOutcome, UpdateOutcome,
};
pub use docop_merge::{apply as merge, Operator, SIGIL};
pub use docop_storage::{MemoryCollection, WriteBudget};
