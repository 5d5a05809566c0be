//! Shared test support for the operation tests

use docop_core::{
    DeleteAck, DocId, Document, DocumentStore, Error, Fields, InsertOutcome, Result,
};
use docop_storage::MemoryCollection;
use std::cell::Cell;

/// Unwrap a JSON object literal into a field mapping
pub fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// A collection pre-populated with the given documents, unlimited budget
pub fn seeded(values: Vec<serde_json::Value>) -> MemoryCollection {
    let collection = MemoryCollection::new();
    for value in values {
        collection.create(fields(value)).unwrap();
    }
    collection
}

/// Store whose every call fails with a store error
pub struct BrokenStore;

impl DocumentStore for BrokenStore {
    fn create(&self, _fields: Fields) -> Result<InsertOutcome> {
        Err(Error::Store("store is down".to_string()))
    }

    fn replace(&self, _doc: &Document) -> Result<()> {
        Err(Error::Store("store is down".to_string()))
    }

    fn delete(&self, _id: &DocId) -> Result<DeleteAck> {
        Err(Error::Store("store is down".to_string()))
    }
}

/// Store that fails the nth create (1-based) and otherwise delegates to an
/// in-memory collection
pub struct FailingAt {
    inner: MemoryCollection,
    fail_at: usize,
    calls: Cell<usize>,
}

impl FailingAt {
    /// Fail the `fail_at`th create call
    pub fn new(fail_at: usize) -> Self {
        Self {
            inner: MemoryCollection::new(),
            fail_at,
            calls: Cell::new(0),
        }
    }

    /// Number of documents actually persisted
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl DocumentStore for FailingAt {
    fn create(&self, fields: Fields) -> Result<InsertOutcome> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_at {
            return Err(Error::Store("injected create failure".to_string()));
        }
        self.inner.create(fields)
    }

    fn replace(&self, doc: &Document) -> Result<()> {
        self.inner.replace(doc)
    }

    fn delete(&self, id: &DocId) -> Result<DeleteAck> {
        self.inner.delete(id)
    }
}
