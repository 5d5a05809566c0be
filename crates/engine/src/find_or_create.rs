//! Find-or-create operation
//!
//! The idempotent insert: query first, create only when nothing matched.
//! Re-invoking with the same query returns the existing document and performs
//! no additional write, which is what makes this safe under at-least-once
//! delivery.

use docop_core::{Document, DocumentStore, Error, Fields, InsertOutcome, QueryGateway, Result};
use tracing::debug;

/// Return the first document matching `query`, creating `candidate` if none
///
/// # Errors
///
/// Gateway failure aborts before any write. A create refused by the host
/// budget fails with [`Error::BudgetExhausted`] — single creates have no
/// resume protocol — and a create that was admitted but failed to complete
/// surfaces as its store error.
pub fn find_or_create<G, S>(
    gateway: &G,
    store: &S,
    query: &str,
    candidate: Fields,
) -> Result<Document>
where
    G: QueryGateway,
    S: DocumentStore,
{
    let docs = gateway.query(query)?;
    if let Some(existing) = docs.into_iter().next() {
        debug!(query, id = %existing.id, "find_or_create: found existing");
        return Ok(existing);
    }

    match store.create(candidate)? {
        InsertOutcome::Accepted(doc) => {
            debug!(query, id = %doc.id, "find_or_create: created");
            Ok(doc)
        }
        InsertOutcome::Rejected => Err(Error::BudgetExhausted),
    }
}
