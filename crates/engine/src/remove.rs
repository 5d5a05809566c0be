//! Remove operation
//!
//! Finds documents through the query gateway and deletes each match through
//! the store, serially, in selection order. Acknowledgements accumulate
//! positionally, so the result lines up with the match order rather than
//! with whatever order deletions happened to complete in.

use docop_core::{DeleteAck, DocumentStore, QueryGateway, Result};
use tracing::debug;

/// Delete every document matching `query`, or only the first with `first_only`
///
/// Returns one acknowledgement per deleted document, in selection order;
/// empty when nothing matched (and no delete call is issued).
///
/// # Errors
///
/// Gateway failure aborts before any delete. A delete failure — including an
/// exhausted host budget — aborts mid-operation; documents already deleted
/// stay deleted.
pub fn remove<G, S>(
    gateway: &G,
    store: &S,
    query: &str,
    first_only: bool,
) -> Result<Vec<DeleteAck>>
where
    G: QueryGateway,
    S: DocumentStore,
{
    let mut docs = gateway.query(query)?;
    if first_only {
        docs.truncate(1);
    }
    debug!(query, matched = docs.len(), "remove: deleting matches");

    let mut acks = Vec::with_capacity(docs.len());
    for doc in &docs {
        acks.push(store.delete(&doc.id)?);
    }
    Ok(acks)
}
