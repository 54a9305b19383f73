//! The triple store interface
//!
//! The provenance engine talks to storage only through [`TripleStore`]. A
//! store is a transactional set of statements grouped into named graphs.
//! One store value is one connection: transaction state belongs to the
//! value, so composed operations sharing a store share a transaction.
//!
//! ## Error Handling
//!
//! | Error | Condition |
//! |-------|-----------|
//! | `Internal` | Transaction misuse or backend failure |

use rmap_core::{Iri, Resource, RmapResult, Statement, Term};

use crate::query::{self, Bindings, PatternQuery};

/// Statement match pattern; `None` slots match anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementPattern {
    pub subject: Option<Resource>,
    pub predicate: Option<Iri>,
    pub object: Option<Term>,
    pub context: Option<Iri>,
}

impl StatementPattern {
    /// Pattern matching every statement
    pub fn any() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<Resource>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn predicate(mut self, predicate: &Iri) -> Self {
        self.predicate = Some(predicate.clone());
        self
    }

    pub fn object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn context(mut self, context: &Iri) -> Self {
        self.context = Some(context.clone());
        self
    }

    /// True when `stmt` matches every bound slot
    pub fn matches(&self, stmt: &Statement) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == stmt.subject)
            && self.predicate.as_ref().map_or(true, |p| *p == stmt.predicate)
            && self.object.as_ref().map_or(true, |o| *o == stmt.object)
            && self
                .context
                .as_ref()
                .map_or(true, |c| stmt.context.as_ref() == Some(c))
    }
}

/// Transactional named-graph store
///
/// Writes made while a transaction is open become permanent on
/// [`commit_transaction`](TripleStore::commit_transaction) and are undone
/// by [`rollback_transaction`](TripleStore::rollback_transaction). Writes
/// made with no transaction open commit immediately.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
pub trait TripleStore: Send + Sync {
    /// Add one statement; adding a present statement is a no-op
    fn add_statement(&self, stmt: &Statement) -> RmapResult<()>;

    /// Add several statements
    fn add_statements(&self, stmts: &[Statement]) -> RmapResult<()> {
        for stmt in stmts {
            self.add_statement(stmt)?;
        }
        Ok(())
    }

    /// Remove the given statements; absent statements are ignored
    fn remove_statements(&self, stmts: &[Statement]) -> RmapResult<()>;

    /// All statements matching the pattern, in insertion order
    fn get_statements(&self, pattern: &StatementPattern) -> RmapResult<Vec<Statement>>;

    /// All statements in the named graph `context`
    fn get_named_graph(&self, context: &Iri) -> RmapResult<Vec<Statement>> {
        self.get_statements(&StatementPattern::any().context(context))
    }

    /// True when a named graph `id` holds at least one statement
    fn exists(&self, id: &Iri) -> RmapResult<bool> {
        Ok(!self.get_named_graph(id)?.is_empty())
    }

    /// Open a transaction; fails if one is already open
    fn begin_transaction(&self) -> RmapResult<()>;

    /// Make the open transaction's writes permanent
    fn commit_transaction(&self) -> RmapResult<()>;

    /// Undo the open transaction's writes
    fn rollback_transaction(&self) -> RmapResult<()>;

    fn has_transaction_open(&self) -> bool;

    /// Evaluate a conjunctive pattern query
    fn query(&self, query: &PatternQuery) -> RmapResult<Vec<Bindings>> {
        query::evaluate(self, query)
    }
}
