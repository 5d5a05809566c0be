//! Update operation
//!
//! Finds documents through the query gateway, patches each with the merge
//! engine, and replaces them through the store. Every replacement is awaited
//! before the next is issued; any replacement failure aborts the whole
//! operation. Documents already replaced stay replaced — there is no
//! rollback, only the fatal error.

use docop_core::{Document, DocumentStore, Fields, QueryGateway, Result};
use tracing::debug;

/// What an update produced, shaped by its first-match flag
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// First-match mode: the updated document, if any matched
    First(Option<Document>),
    /// All-matches mode: every updated document, in match order
    All(Vec<Document>),
}

impl UpdateOutcome {
    /// Number of documents updated
    pub fn updated(&self) -> usize {
        match self {
            UpdateOutcome::First(doc) => usize::from(doc.is_some()),
            UpdateOutcome::All(docs) => docs.len(),
        }
    }
}

/// Find documents matching `query`, merge `patch` into each, and replace them
///
/// With `first_only`, at most the first match is updated and the outcome
/// carries a single optional document; otherwise every match is updated.
///
/// # Errors
///
/// Gateway failure aborts before any write. Merge rejections and replacement
/// failures abort mid-operation; replacements already persisted are not
/// rolled back.
pub fn update<G, S>(
    gateway: &G,
    store: &S,
    query: &str,
    patch: &Fields,
    first_only: bool,
) -> Result<UpdateOutcome>
where
    G: QueryGateway,
    S: DocumentStore,
{
    let mut docs = gateway.query(query)?;
    if first_only {
        docs.truncate(1);
    }
    debug!(query, matched = docs.len(), "update: applying patch");

    for doc in &mut docs {
        docop_merge::apply(&mut doc.fields, patch)?;
        doc.touch();
        store.replace(doc)?;
    }

    if first_only {
        Ok(UpdateOutcome::First(docs.into_iter().next()))
    } else {
        Ok(UpdateOutcome::All(docs))
    }
}
