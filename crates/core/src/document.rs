//! Document types
//!
//! This module defines the stored record and its identity:
//! - DocId: Unique identifier for a document, assigned by the store on create
//! - Fields: The key/value mapping at the heart of a document
//! - Document: A stored record with identity, fields, and bookkeeping metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;
use uuid::Uuid;

/// The field mapping of a document
///
/// Keys are strings; values are JSON: primitives (number/string/boolean/null),
/// nested objects, or arrays. Key order carries no meaning.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Unique identifier for a document
///
/// A DocId is a wrapper around a UUID v4. It is the opaque identity the store
/// assigns on create and the address used by replace and delete. Callers never
/// mint meaningful ids; they only carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(Uuid);

impl DocId {
    /// Create a new random DocId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a DocId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a DocId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this DocId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored document
///
/// The unit the store persists and the operations mutate. Identity is assigned
/// by the store on create; `version` and the timestamps are bookkeeping only —
/// no operation's control flow depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identity, used for replace/delete addressing
    pub id: DocId,
    /// The document's field mapping
    pub fields: Fields,
    /// Document version (1 on create, +1 per replace)
    pub version: u64,
    /// Creation timestamp (millis since epoch)
    pub created_at: i64,
    /// Last modification timestamp (millis since epoch)
    pub updated_at: i64,
}

impl Document {
    /// Create a new document with initial fields
    ///
    /// Initializes version to 1 and sets timestamps to current time.
    pub fn new(id: DocId, fields: Fields) -> Self {
        let now = now_millis();
        Document {
            id,
            fields,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Increment version and update timestamp
    ///
    /// Call this after any modification to the document's fields.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = now_millis();
    }

    /// Get a field value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
