//! Append-only decision logging.
//!
//! The engine itself keeps no history; attach a [`RecordingObserver`] to an
//! [`Engine`](crate::Engine) and every decision lands in a shared
//! [`DecisionLog`], one record per `operation` call, whichever way the call
//! ended. The log is intentionally minimal: it captures the facts an
//! external reviewer needs without interpreting them.

use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::engine::EngineObserver;
use crate::entity::Entity;
use crate::op::Operation;
use crate::verdict::Verdict;

/// One recorded engine decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    /// Monotonic sequence number, assigned by the log.
    pub sequence: u64,
    /// When the decision was recorded.
    pub timestamp: SystemTime,
    /// Operation key.
    pub op: String,
    /// Operation display name.
    pub op_name: String,
    /// Whether the operation reads.
    pub is_read: bool,
    /// Whether the operation writes.
    pub is_write: bool,
    /// Whether execution was requested (as opposed to decide-only).
    pub execute: bool,
    /// Access-controller test result.
    pub access_test: bool,
    /// Minimum-integrity test result.
    pub min_test: bool,
    /// Whether the operation was allowed.
    pub allowed: bool,
    /// Whether the operation body reported a failure.
    pub error: bool,
    /// Whether the operation body requested destruction of the object.
    pub destroy: bool,
}

impl DecisionRecord {
    /// Builds a record from an operation and its verdict. The sequence
    /// number is assigned when the record enters a log.
    pub fn new(op: &dyn Operation, execute: bool, verdict: &Verdict) -> Self {
        Self {
            sequence: 0,
            timestamp: SystemTime::now(),
            op: op.key().to_string(),
            op_name: op.name().to_string(),
            is_read: op.is_read(),
            is_write: op.is_write(),
            execute,
            access_test: verdict.access_test(),
            min_test: verdict.min_test(),
            allowed: verdict.allowed(),
            error: verdict.error,
            destroy: verdict.destroy,
        }
    }
}

#[derive(Debug)]
struct DecisionLogInner {
    records: Vec<DecisionRecord>,
    next_sequence: u64,
    capacity: Option<usize>,
}

/// An append-only, thread-safe log of engine decisions.
///
/// Cloning shares the log: all clones append to and read from the same
/// storage.
#[derive(Debug)]
pub struct DecisionLog {
    inner: Arc<RwLock<DecisionLogInner>>,
}

impl Clone for DecisionLog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for DecisionLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DecisionLog {
    /// An unbounded in-memory log.
    pub fn in_memory() -> Self {
        Self::with_inner(None)
    }

    /// A log that keeps only the most recent `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_inner(Some(capacity))
    }

    fn with_inner(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DecisionLogInner {
                records: Vec::new(),
                next_sequence: 1,
                capacity,
            })),
        }
    }

    /// Appends a record and returns the sequence number assigned to it.
    pub fn record(&self, mut record: DecisionRecord) -> u64 {
        let mut inner = self.inner.write().expect("lock poisoned");
        let sequence = inner.next_sequence;
        record.sequence = sequence;
        inner.next_sequence += 1;
        inner.records.push(record);
        if let Some(capacity) = inner.capacity {
            if inner.records.len() > capacity {
                let excess = inner.records.len() - capacity;
                inner.records.drain(0..excess);
            }
        }
        sequence
    }

    /// Number of retained records.
    pub fn total(&self) -> usize {
        self.inner.read().expect("lock poisoned").records.len()
    }

    /// The most recent `n` records, oldest first.
    pub fn latest(&self, n: usize) -> Vec<DecisionRecord> {
        let inner = self.inner.read().expect("lock poisoned");
        let skip = inner.records.len().saturating_sub(n);
        inner.records[skip..].to_vec()
    }

    /// All records for a given operation key.
    pub fn for_op(&self, key: &str) -> Vec<DecisionRecord> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .records
            .iter()
            .filter(|record| record.op == key)
            .cloned()
            .collect()
    }

    /// All denied decisions.
    pub fn denied(&self) -> Vec<DecisionRecord> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .records
            .iter()
            .filter(|record| !record.allowed)
            .cloned()
            .collect()
    }

    /// All retained records.
    pub fn export(&self) -> Vec<DecisionRecord> {
        self.inner.read().expect("lock poisoned").records.clone()
    }

    /// Drops every record (primarily for tests).
    pub fn clear(&self) {
        self.inner.write().expect("lock poisoned").records.clear();
    }
}

/// An observer that appends one [`DecisionRecord`] per engine call.
///
/// The record is taken at the point the call ends: at the access test when
/// access is denied, at the minimum-integrity test when that fails or when
/// no execution was requested, and after the operation body otherwise.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: DecisionLog,
}

impl RecordingObserver {
    /// An observer over a fresh unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// An observer appending to an existing log.
    pub fn with_log(log: DecisionLog) -> Self {
        Self { log }
    }

    /// The log this observer appends to.
    pub fn log(&self) -> &DecisionLog {
        &self.log
    }
}

impl EngineObserver for RecordingObserver {
    fn after_test_access<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        op: &dyn Operation,
        execute: bool,
        verdict: &mut Verdict,
        allow: bool,
    ) {
        if !allow {
            self.log.record(DecisionRecord::new(op, execute, verdict));
        }
    }

    fn after_test_min<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        op: &dyn Operation,
        execute: bool,
        verdict: &mut Verdict,
        _i_subj: Option<&E::Integrity>,
        _allow_min_subj: bool,
        _i_obj: Option<&E::Integrity>,
        _allow_min_obj: bool,
    ) {
        if !verdict.min_test() || !execute {
            self.log.record(DecisionRecord::new(op, execute, verdict));
        }
    }

    fn execute_op<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        op: &dyn Operation,
        verdict: &mut Verdict,
    ) {
        self.log.record(DecisionRecord::new(op, true, verdict));
    }
}
