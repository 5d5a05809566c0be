//! Operation dispatch
//!
//! The host invokes an operation by name with positional JSON arguments and
//! receives exactly one response body back. This module is that surface: a
//! closed name table ([`OperationKind`]), a [`Request`] value, and
//! [`invoke`], which parses arguments, runs the engine operation, and builds
//! the body.
//!
//! ## Response semantics
//!
//! `invoke` returning `Ok(body)` is the single set-body of the invocation;
//! `Err` is the aborted invocation, with no body set. Callers distinguish
//! the two to decide whether a retry is safe — bulk insert in particular
//! reports its resume cursor only through a set body.
//!
//! ## Argument shapes
//!
//! | operation | arguments | body |
//! |---|---|---|
//! | `update` | query, patch, one? | document (or null) / array of documents |
//! | `findOrCreate` | query, candidate | document |
//! | `remove` | query, one? | array of delete acknowledgements |
//! | `bulkInsert` | documents | integer count persisted |
//!
//! Trailing boolean flags default to false when absent or null. A null or
//! missing `documents` argument is rejected before any store interaction.

use docop_core::{Document, DocumentStore, Error, Fields, QueryGateway, Result};
use docop_engine::{bulk_insert, find_or_create, remove, update, UpdateOutcome};
use serde_json::Value;
use std::fmt;

/// The operations the dispatch surface exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Find, patch, and replace documents
    Update,
    /// Return the first match, creating the candidate if none
    FindOrCreate,
    /// Find and delete documents
    Remove,
    /// Sequential creates with a resumable cursor
    BulkInsert,
}

impl OperationKind {
    /// Every dispatchable operation
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Update,
        OperationKind::FindOrCreate,
        OperationKind::Remove,
        OperationKind::BulkInsert,
    ];

    /// The operation's wire name
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Update => "update",
            OperationKind::FindOrCreate => "findOrCreate",
            OperationKind::Remove => "remove",
            OperationKind::BulkInsert => "bulkInsert",
        }
    }

    /// Resolve an operation by wire name
    pub fn from_name(name: &str) -> Option<OperationKind> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One invocation: an operation and its positional arguments
#[derive(Debug, Clone)]
pub struct Request {
    /// The operation to run
    pub operation: OperationKind,
    /// Positional JSON arguments, per the table in the module docs
    pub args: Vec<Value>,
}

impl Request {
    /// Build a request
    pub fn new(operation: OperationKind, args: Vec<Value>) -> Self {
        Self { operation, args }
    }
}

/// Run one operation against a collection and build its response body
///
/// # Errors
///
/// Argument parsing failures are [`Error::InvalidInput`] and happen before
/// any store interaction. Everything else propagates from the operation
/// itself; on error no body exists.
pub fn invoke<C>(collection: &C, request: Request) -> Result<Value>
where
    C: QueryGateway + DocumentStore,
{
    let args = &request.args;
    match request.operation {
        OperationKind::Update => {
            let query = string_arg(args, 0, "query")?;
            let patch = object_arg(args, 1, "patch")?;
            let first_only = flag_arg(args, 2)?;
            match update(collection, collection, &query, &patch, first_only)? {
                UpdateOutcome::First(Some(doc)) => document_body(&doc),
                UpdateOutcome::First(None) => Ok(Value::Null),
                UpdateOutcome::All(docs) => {
                    let bodies = docs
                        .iter()
                        .map(document_body)
                        .collect::<Result<Vec<Value>>>()?;
                    Ok(Value::Array(bodies))
                }
            }
        }
        OperationKind::FindOrCreate => {
            let query = string_arg(args, 0, "query")?;
            let candidate = object_arg(args, 1, "candidate")?;
            let doc = find_or_create(collection, collection, &query, candidate)?;
            document_body(&doc)
        }
        OperationKind::Remove => {
            let query = string_arg(args, 0, "query")?;
            let first_only = flag_arg(args, 1)?;
            let acks = remove(collection, collection, &query, first_only)?;
            serde_json::to_value(acks).map_err(|e| Error::Serialization(e.to_string()))
        }
        OperationKind::BulkInsert => {
            let documents = documents_arg(args, 0)?;
            let count = bulk_insert(collection, documents)?;
            Ok(Value::from(count as u64))
        }
    }
}

fn document_body(doc: &Document) -> Result<Value> {
    serde_json::to_value(doc).map_err(|e| Error::Serialization(e.to_string()))
}

fn string_arg(args: &[Value], index: usize, name: &str) -> Result<String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::InvalidInput(format!(
            "argument {} ({}) must be a string, got {}",
            index,
            name,
            kind_of(other)
        ))),
        None => Err(Error::InvalidInput(format!(
            "missing argument {} ({})",
            index, name
        ))),
    }
}

fn object_arg(args: &[Value], index: usize, name: &str) -> Result<Fields> {
    match args.get(index) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(Error::InvalidInput(format!(
            "argument {} ({}) must be an object, got {}",
            index,
            name,
            kind_of(other)
        ))),
        None => Err(Error::InvalidInput(format!(
            "missing argument {} ({})",
            index, name
        ))),
    }
}

/// Trailing boolean flag: absent or null reads as false
fn flag_arg(args: &[Value], index: usize) -> Result<bool> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(Error::InvalidInput(format!(
            "argument {} must be a boolean, got {}",
            index,
            kind_of(other)
        ))),
    }
}

fn documents_arg(args: &[Value], index: usize) -> Result<Vec<Fields>> {
    let value = match args.get(index) {
        None | Some(Value::Null) => {
            return Err(Error::InvalidInput(
                "the documents argument is null or missing".to_string(),
            ))
        }
        Some(value) => value,
    };

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::InvalidInput(format!(
                "the documents argument must be an array, got {}",
                kind_of(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map.clone()),
            other => Err(Error::InvalidInput(format!(
                "document {} must be an object, got {}",
                i,
                kind_of(other)
            ))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
