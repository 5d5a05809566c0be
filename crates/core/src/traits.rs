//! Collaborator traits for query and persistence
//!
//! The mutation core never talks to a concrete store. Every operation takes
//! its collaborators as explicit arguments, bound by the two traits defined
//! here. This keeps the query engine and the persistence primitives external,
//! specified only at their interface, and makes every operation testable with
//! stub collaborators.

use crate::document::{DocId, Document, Fields};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Synchronous admission signal for a create request
///
/// The store answers every create with one of these before anything else can
/// happen. `Rejected` is the host revoking the invocation's execution budget:
/// nothing was written, nothing will complete later, and a bulk caller should
/// finalize with its current cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The store persisted the document and assigned its identity
    Accepted(Document),
    /// The host refused the write for this invocation; nothing was written
    Rejected,
}

impl InsertOutcome {
    /// True if the host refused the write
    pub fn is_rejected(&self) -> bool {
        matches!(self, InsertOutcome::Rejected)
    }
}

/// Acknowledgement of a completed delete
///
/// Carries the deleted document's prior state, which is what a remove
/// operation reports back per deleted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAck {
    /// Identity of the deleted document
    pub id: DocId,
    /// The document as it was immediately before deletion
    pub prior: Document,
}

/// Query execution over a collection
///
/// Accepts a query string and returns the matching documents. The query
/// language itself is outside this core; implementations decide what the
/// string means.
pub trait QueryGateway {
    /// Execute a query and return all matching documents
    ///
    /// Match order is the implementation's document order; "first match"
    /// semantics in the operations refer to this order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`](crate::Error::Query) if the query cannot be
    /// executed. Gateway failure is always fatal to the calling operation.
    fn query(&self, query: &str) -> Result<Vec<Document>>;
}

/// Single-document persistence primitives
///
/// Create, replace, and delete one document by identity. All three calls are
/// synchronous: when they return, the effect is durable (or refused, or
/// failed). The host quota is visible here and nowhere else.
pub trait DocumentStore {
    /// Create a document from candidate fields
    ///
    /// On admission, the store assigns a fresh identity and persists the
    /// document, returning it in [`InsertOutcome::Accepted`]. A
    /// [`InsertOutcome::Rejected`] means the host quota refused the write and
    /// nothing happened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`](crate::Error::Store) or a limit violation if
    /// the write was admitted but failed to complete.
    fn create(&self, fields: Fields) -> Result<InsertOutcome>;

    /// Replace a stored document, addressed by the identity it carries
    ///
    /// The document is persisted exactly as passed; callers bump version
    /// metadata themselves (see [`Document::touch`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`](crate::Error::DocumentNotFound) if
    /// no document with that identity exists.
    fn replace(&self, doc: &Document) -> Result<()>;

    /// Delete a document by identity
    ///
    /// Destructive calls have no resume protocol: under an exhausted host
    /// quota this fails with
    /// [`Error::BudgetExhausted`](crate::Error::BudgetExhausted) rather than
    /// reporting a resumable rejection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`](crate::Error::DocumentNotFound) if
    /// no document with that identity exists.
    fn delete(&self, id: &DocId) -> Result<DeleteAck>;
}
