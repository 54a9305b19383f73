//! In-memory named-graph store
//!
//! DashMap keyed by graph context, FxHashMap of triples within each graph.
//! Writes to different graphs never contend.
//!
//! # Design
//!
//! - Every inserted triple is stamped with a global sequence number so reads
//!   come back in insertion order regardless of hash layout
//! - Writes apply immediately; an open transaction keeps an undo journal
//!   that rollback replays in reverse
//! - A graph whose last triple is removed disappears, so `exists` tracks
//!   whether any statement remains under that context
//!
//! Transaction state belongs to one handle and one thread. A handle shared
//! across threads keeps a separate journal per thread, so each request
//! thread commits or rolls back only its own writes.
//! [`MemoryTripleStore::connect`] returns another handle over the same data
//! with its own transaction state. Other handles and threads can observe
//! writes of a transaction that has not committed yet.

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use rmap_core::{Iri, RmapError, RmapResult, Statement, Triple};

use crate::store::{StatementPattern, TripleStore};

/// Triples of one named graph with their insertion sequence
#[derive(Debug, Default)]
struct Graph {
    triples: FxHashMap<Triple, u64>,
}

#[derive(Debug, Default)]
struct Shared {
    graphs: DashMap<Option<Iri>, Graph>,
    sequence: AtomicU64,
}

#[derive(Debug)]
enum Undo {
    Added(Statement),
    Removed(Statement, u64),
}

/// In-memory [`TripleStore`]
///
/// # Example
///
/// ```ignore
/// use rmap_storage::{MemoryTripleStore, TripleStore};
///
/// let store = MemoryTripleStore::new();
/// store.begin_transaction()?;
/// store.add_statement(&stmt)?;
/// store.commit_transaction()?;
/// ```
pub struct MemoryTripleStore {
    shared: Arc<Shared>,
    /// Open transactions, one undo journal per thread
    journals: Mutex<FxHashMap<ThreadId, Vec<Undo>>>,
}

impl MemoryTripleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            journals: Mutex::new(FxHashMap::default()),
        }
    }

    /// Another handle over the same data with independent transaction state
    pub fn connect(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            journals: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of non-empty named graphs (including the default graph)
    pub fn graph_count(&self) -> usize {
        self.shared.graphs.len()
    }

    /// Total statements across all graphs
    pub fn statement_count(&self) -> usize {
        self.shared
            .graphs
            .iter()
            .map(|entry| entry.value().triples.len())
            .sum()
    }

    fn next_sequence(&self) -> u64 {
        self.shared.sequence.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn record(&self, undo: Undo) {
        if let Some(journal) = self.journals.lock().get_mut(&thread::current().id()) {
            journal.push(undo);
        }
    }

    /// Close the calling thread's transaction, returning its journal
    fn take_journal(&self) -> Option<Vec<Undo>> {
        self.journals.lock().remove(&thread::current().id())
    }

    /// Insert with a given sequence; false if already present
    fn insert_raw(&self, stmt: &Statement, seq: u64) -> bool {
        let mut graph = self
            .shared
            .graphs
            .entry(stmt.context.clone())
            .or_default();
        if graph.triples.contains_key(&stmt.triple()) {
            return false;
        }
        graph.triples.insert(stmt.triple(), seq);
        true
    }

    /// Remove; returns the removed triple's sequence
    fn remove_raw(&self, stmt: &Statement) -> Option<u64> {
        let (removed, now_empty) = match self.shared.graphs.get_mut(&stmt.context) {
            Some(mut graph) => {
                let removed = graph.triples.remove(&stmt.triple());
                (removed, graph.triples.is_empty())
            }
            None => (None, false),
        };
        if now_empty {
            self.shared
                .graphs
                .remove_if(&stmt.context, |_, g| g.triples.is_empty());
        }
        removed
    }
}

impl Default for MemoryTripleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryTripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTripleStore")
            .field("graph_count", &self.graph_count())
            .field("statement_count", &self.statement_count())
            .field("transaction_open", &self.has_transaction_open())
            .finish()
    }
}

impl TripleStore for MemoryTripleStore {
    fn add_statement(&self, stmt: &Statement) -> RmapResult<()> {
        let seq = self.next_sequence();
        if self.insert_raw(stmt, seq) {
            self.record(Undo::Added(stmt.clone()));
        }
        Ok(())
    }

    fn remove_statements(&self, stmts: &[Statement]) -> RmapResult<()> {
        for stmt in stmts {
            if let Some(seq) = self.remove_raw(stmt) {
                self.record(Undo::Removed(stmt.clone(), seq));
            }
        }
        Ok(())
    }

    fn get_statements(&self, pattern: &StatementPattern) -> RmapResult<Vec<Statement>> {
        let mut found: Vec<(u64, Statement)> = Vec::new();
        let mut collect = |context: &Option<Iri>, graph: &Graph| {
            for (triple, seq) in &graph.triples {
                let stmt = Statement {
                    subject: triple.subject.clone(),
                    predicate: triple.predicate.clone(),
                    object: triple.object.clone(),
                    context: context.clone(),
                };
                if pattern.matches(&stmt) {
                    found.push((*seq, stmt));
                }
            }
        };
        match &pattern.context {
            Some(context) => {
                let key = Some(context.clone());
                if let Some(graph) = self.shared.graphs.get(&key) {
                    collect(&key, graph.value());
                }
            }
            None => {
                for entry in self.shared.graphs.iter() {
                    collect(entry.key(), entry.value());
                }
            }
        }
        found.sort_by_key(|(seq, _)| *seq);
        Ok(found.into_iter().map(|(_, s)| s).collect())
    }

    fn exists(&self, id: &Iri) -> RmapResult<bool> {
        Ok(self.shared.graphs.contains_key(&Some(id.clone())))
    }

    fn begin_transaction(&self) -> RmapResult<()> {
        let mut journals = self.journals.lock();
        let owner = thread::current().id();
        if journals.contains_key(&owner) {
            return Err(RmapError::internal("transaction already open"));
        }
        journals.insert(owner, Vec::new());
        tracing::trace!(target: "rmap::store", "transaction opened");
        Ok(())
    }

    fn commit_transaction(&self) -> RmapResult<()> {
        let journal = self
            .take_journal()
            .ok_or_else(|| RmapError::internal("no transaction open to commit"))?;
        tracing::trace!(target: "rmap::store", writes = journal.len(), "transaction committed");
        Ok(())
    }

    fn rollback_transaction(&self) -> RmapResult<()> {
        let journal = self
            .take_journal()
            .ok_or_else(|| RmapError::internal("no transaction open to roll back"))?;
        let undone = journal.len();
        for undo in journal.into_iter().rev() {
            match undo {
                Undo::Added(stmt) => {
                    self.remove_raw(&stmt);
                }
                Undo::Removed(stmt, seq) => {
                    self.insert_raw(&stmt, seq);
                }
            }
        }
        tracing::debug!(target: "rmap::store", undone, "transaction rolled back");
        Ok(())
    }

    fn has_transaction_open(&self) -> bool {
        self.journals.lock().contains_key(&thread::current().id())
    }
}
