//! In-memory reference collection
//!
//! [`MemoryCollection`] implements both collaborator traits over a single
//! in-process document list. Documents are stored MessagePack-encoded, in
//! insertion order, behind one `RwLock`; the write budget gates create and
//! delete the way a host quota would.
//!
//! ## Filter syntax
//!
//! The query side understands a deliberately tiny filter form — this is test
//! and demo scaffolding, not a query language:
//!
//! - `*` (or an empty string) matches every document
//! - `field == <json literal>` matches on field equality, e.g.
//!   `name == "foo"` or `count == 3`
//! - clauses conjoin with `&&`: `name == "foo" && active == true`

use crate::budget::WriteBudget;
use docop_core::{
    validate_fields, DeleteAck, DocId, Document, DocumentStore, Error, Fields, InsertOutcome,
    QueryGateway, Result,
};
use parking_lot::RwLock;
use tracing::debug;

/// In-memory implementation of [`QueryGateway`] and [`DocumentStore`]
///
/// Thread-safe; clones of the underlying documents are handed out, never
/// references into the store.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    docs: RwLock<Vec<(DocId, Vec<u8>)>>,
    budget: WriteBudget,
}

impl MemoryCollection {
    /// Create an empty collection with an unlimited write budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection gated by the given write budget
    pub fn with_budget(budget: WriteBudget) -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            budget,
        }
    }

    /// The collection's write budget
    pub fn budget(&self) -> &WriteBudget {
        &self.budget
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// True if the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Fetch one document by identity
    pub fn get(&self, id: &DocId) -> Result<Option<Document>> {
        let docs = self.docs.read();
        match docs.iter().find(|(doc_id, _)| doc_id == id) {
            Some((_, bytes)) => Ok(Some(Self::decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize a document for storage
    fn encode(doc: &Document) -> Result<Vec<u8>> {
        rmp_serde::to_vec(doc).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a document from storage
    fn decode(bytes: &[u8]) -> Result<Document> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl DocumentStore for MemoryCollection {
    fn create(&self, fields: Fields) -> Result<InsertOutcome> {
        validate_fields(&fields)?;

        if !self.budget.try_consume() {
            debug!("create refused: write budget exhausted");
            return Ok(InsertOutcome::Rejected);
        }

        let doc = Document::new(DocId::new(), fields);
        let bytes = Self::encode(&doc)?;
        self.docs.write().push((doc.id, bytes));
        Ok(InsertOutcome::Accepted(doc))
    }

    fn replace(&self, doc: &Document) -> Result<()> {
        validate_fields(&doc.fields)?;
        let bytes = Self::encode(doc)?;

        let mut docs = self.docs.write();
        let slot = docs
            .iter_mut()
            .find(|(id, _)| *id == doc.id)
            .ok_or(Error::DocumentNotFound(doc.id))?;
        slot.1 = bytes;
        Ok(())
    }

    fn delete(&self, id: &DocId) -> Result<DeleteAck> {
        if !self.budget.try_consume() {
            debug!(%id, "delete refused: write budget exhausted");
            return Err(Error::BudgetExhausted);
        }

        let mut docs = self.docs.write();
        let position = docs
            .iter()
            .position(|(doc_id, _)| doc_id == id)
            .ok_or(Error::DocumentNotFound(*id))?;
        let prior = Self::decode(&docs[position].1)?;
        docs.remove(position);
        Ok(DeleteAck { id: *id, prior })
    }
}

impl QueryGateway for MemoryCollection {
    fn query(&self, query: &str) -> Result<Vec<Document>> {
        let filter = Filter::parse(query)?;
        let docs = self.docs.read();
        let mut matches = Vec::new();
        for (_, bytes) in docs.iter() {
            let doc = Self::decode(bytes)?;
            if filter.matches(&doc) {
                matches.push(doc);
            }
        }
        Ok(matches)
    }
}

/// Parsed form of the tiny filter syntax
enum Filter {
    All,
    Equals(Vec<(String, serde_json::Value)>),
}

impl Filter {
    fn parse(query: &str) -> Result<Filter> {
        let query = query.trim();
        if query.is_empty() || query == "*" {
            return Ok(Filter::All);
        }

        let mut clauses = Vec::new();
        for clause in query.split("&&") {
            let (field, literal) = clause.split_once("==").ok_or_else(|| {
                Error::Query(format!("unsupported filter clause: {:?}", clause.trim()))
            })?;
            let value: serde_json::Value = serde_json::from_str(literal.trim())
                .map_err(|e| Error::Query(format!("bad filter literal {:?}: {}", literal.trim(), e)))?;
            clauses.push((field.trim().to_string(), value));
        }
        Ok(Filter::Equals(clauses))
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals(clauses) => clauses
                .iter()
                .all(|(field, value)| doc.fields.get(field) == Some(value)),
        }
    }
}
