//! Bulk insert coordinator
//!
//! Drives repeated creates against the store while the host still accepts
//! work. The host may refuse any create, with no advance warning; when it
//! does, the coordinator finalizes with its cursor — the count of documents
//! confirmed persisted — and the caller resumes a follow-up invocation over
//! the remaining suffix.
//!
//! The resume state is a first-class value: [`BulkJob`] carries the document
//! sequence and the cursor, [`BulkJob::step`] is the single "next step"
//! continuation, and [`BulkJob::run`] loops it to an outcome. At most one
//! create is outstanding at any time, and the cursor only advances on
//! confirmed persistence — never speculatively.

use docop_core::{DocumentStore, Fields, InsertOutcome, Result};
use tracing::{debug, warn};

/// A resumable bulk insertion over an ordered document sequence
#[derive(Debug, Clone, PartialEq)]
pub struct BulkJob {
    documents: Vec<Fields>,
    cursor: usize,
}

/// What one [`BulkJob::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One more document confirmed persisted; the cursor advanced
    Persisted,
    /// The host refused the write; the cursor is the resume point
    Refused,
    /// Every document is persisted
    Complete,
}

/// Final report of a [`BulkJob::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Every document was persisted
    Complete {
        /// Count of documents persisted, equal to the input length
        persisted: usize,
    },
    /// The host cut the invocation off; resume from `persisted`
    Preempted {
        /// Count of documents confirmed persisted before preemption
        persisted: usize,
    },
}

impl BulkOutcome {
    /// Count of documents confirmed persisted in this invocation
    ///
    /// This is the resume cursor: a follow-up invocation passes the input
    /// suffix starting here.
    pub fn persisted(&self) -> usize {
        match *self {
            BulkOutcome::Complete { persisted } | BulkOutcome::Preempted { persisted } => persisted,
        }
    }

    /// True when the whole input sequence was persisted
    pub fn is_complete(&self) -> bool {
        matches!(self, BulkOutcome::Complete { .. })
    }
}

impl BulkJob {
    /// Start a job over an ordered document sequence, cursor at zero
    pub fn new(documents: Vec<Fields>) -> Self {
        Self {
            documents,
            cursor: 0,
        }
    }

    /// Index of the next document not yet confirmed persisted
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The not-yet-persisted suffix of the input sequence
    pub fn remaining(&self) -> &[Fields] {
        &self.documents[self.cursor..]
    }

    /// True when every document is persisted
    pub fn is_complete(&self) -> bool {
        self.cursor == self.documents.len()
    }

    /// Attempt to persist the next document
    ///
    /// Issues at most one create. On admission the cursor advances; on
    /// refusal it stands, and the job can be re-stepped once the host grants
    /// a fresh invocation.
    ///
    /// # Errors
    ///
    /// A create that was admitted but failed to complete is fatal. The
    /// cursor is untouched: progress already persisted is durable and
    /// monotonic, and only the unprocessed suffix needs the retry.
    pub fn step<S: DocumentStore>(&mut self, store: &S) -> Result<StepOutcome> {
        let Some(fields) = self.documents.get(self.cursor) else {
            return Ok(StepOutcome::Complete);
        };

        match store.create(fields.clone())? {
            InsertOutcome::Accepted(_) => {
                self.cursor += 1;
                if self.is_complete() {
                    Ok(StepOutcome::Complete)
                } else {
                    Ok(StepOutcome::Persisted)
                }
            }
            InsertOutcome::Rejected => Ok(StepOutcome::Refused),
        }
    }

    /// Drive the job until completion or host refusal
    pub fn run<S: DocumentStore>(&mut self, store: &S) -> Result<BulkOutcome> {
        loop {
            match self.step(store)? {
                StepOutcome::Persisted => continue,
                StepOutcome::Refused => {
                    warn!(
                        persisted = self.cursor,
                        total = self.documents.len(),
                        "bulk insert preempted by host"
                    );
                    return Ok(BulkOutcome::Preempted {
                        persisted: self.cursor,
                    });
                }
                StepOutcome::Complete => {
                    debug!(persisted = self.cursor, "bulk insert complete");
                    return Ok(BulkOutcome::Complete {
                        persisted: self.cursor,
                    });
                }
            }
        }
    }
}

/// Persist `documents` in order, returning the count persisted this invocation
///
/// An empty input returns 0 with no store interaction. The returned count is
/// the resume cursor whether or not the run completed; callers compare it to
/// the input length to decide whether to re-invoke with the suffix.
///
/// # Errors
///
/// A create that was admitted but failed to complete is fatal; the count
/// persisted up to that point is durable but unreported, so callers treat
/// the error as "retry the whole remaining suffix".
pub fn bulk_insert<S: DocumentStore>(store: &S, documents: Vec<Fields>) -> Result<usize> {
    if documents.is_empty() {
        return Ok(0);
    }
    let mut job = BulkJob::new(documents);
    Ok(job.run(store)?.persisted())
}
