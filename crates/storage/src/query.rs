//! Conjunctive pattern queries
//!
//! A [`PatternQuery`] is a list of quad patterns whose slots are either
//! fixed terms or named variables. Evaluation joins the patterns left to
//! right: each pattern is resolved against the store with the bindings
//! collected so far substituted in, so put the most selective pattern first.
//!
//! This is the only query form the engine needs; there are no filters,
//! optionals or unions. Filtering is done by the caller on the bindings.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

use rmap_core::{Iri, Resource, RmapResult, Statement, Term};

use crate::store::{StatementPattern, TripleStore};

/// One solution: variable name to bound term
pub type Bindings = BTreeMap<String, Term>;

/// Pattern slot: a fixed term or a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Var(String),
    Value(Term),
}

/// Variable slot
pub fn var(name: &str) -> Slot {
    Slot::Var(name.to_string())
}

impl From<&Iri> for Slot {
    fn from(iri: &Iri) -> Self {
        Slot::Value(Term::Iri(iri.clone()))
    }
}

impl From<Iri> for Slot {
    fn from(iri: Iri) -> Self {
        Slot::Value(Term::Iri(iri))
    }
}

impl From<Term> for Slot {
    fn from(term: Term) -> Self {
        Slot::Value(term)
    }
}

impl From<&Term> for Slot {
    fn from(term: &Term) -> Self {
        Slot::Value(term.clone())
    }
}

impl From<&Resource> for Slot {
    fn from(r: &Resource) -> Self {
        Slot::Value(Term::from(r.clone()))
    }
}

/// Quad pattern; a context slot only matches named graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadPattern {
    pub subject: Slot,
    pub predicate: Slot,
    pub object: Slot,
    pub context: Slot,
}

/// Conjunction of quad patterns with an optional projection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternQuery {
    patterns: Vec<QuadPattern>,
    select: Vec<String>,
    distinct: bool,
}

impl PatternQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quad pattern
    pub fn pattern(
        mut self,
        subject: impl Into<Slot>,
        predicate: impl Into<Slot>,
        object: impl Into<Slot>,
        context: impl Into<Slot>,
    ) -> Self {
        self.patterns.push(QuadPattern {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            context: context.into(),
        });
        self
    }

    /// Keep only these variables in each solution
    pub fn select(mut self, vars: &[&str]) -> Self {
        self.select = vars.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Drop duplicate solutions, keeping first occurrence order
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn patterns(&self) -> &[QuadPattern] {
        &self.patterns
    }
}

/// Evaluate `query` against `store`
pub fn evaluate<S: TripleStore + ?Sized>(store: &S, query: &PatternQuery) -> RmapResult<Vec<Bindings>> {
    let mut solutions = vec![Bindings::new()];
    for pattern in &query.patterns {
        let mut next = Vec::new();
        for solution in &solutions {
            let Some(lookup) = bind_pattern(pattern, solution) else {
                continue;
            };
            for stmt in store.get_statements(&lookup)? {
                if let Some(extended) = extend(pattern, solution, &stmt) {
                    next.push(extended);
                }
            }
        }
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }

    if !query.select.is_empty() {
        for solution in &mut solutions {
            solution.retain(|k, _| query.select.contains(k));
        }
    }
    if query.distinct {
        let mut seen = FxHashSet::default();
        solutions.retain(|s| seen.insert(s.clone()));
    }
    Ok(solutions)
}

fn resolve<'a>(slot: &'a Slot, bindings: &'a Bindings) -> Option<&'a Term> {
    match slot {
        Slot::Value(t) => Some(t),
        Slot::Var(name) => bindings.get(name),
    }
}

/// Substitute bound variables; `None` when a bound value cannot occupy its slot
fn bind_pattern(pattern: &QuadPattern, bindings: &Bindings) -> Option<StatementPattern> {
    let mut lookup = StatementPattern::any();
    if let Some(t) = resolve(&pattern.subject, bindings) {
        lookup.subject = Some(t.as_resource()?);
    }
    if let Some(t) = resolve(&pattern.predicate, bindings) {
        lookup.predicate = Some(t.as_iri()?.clone());
    }
    if let Some(t) = resolve(&pattern.object, bindings) {
        lookup.object = Some(t.clone());
    }
    if let Some(t) = resolve(&pattern.context, bindings) {
        lookup.context = Some(t.as_iri()?.clone());
    }
    Some(lookup)
}

fn extend(pattern: &QuadPattern, bindings: &Bindings, stmt: &Statement) -> Option<Bindings> {
    let mut out = bindings.clone();
    bind_slot(&mut out, &pattern.subject, Term::from(stmt.subject.clone()))?;
    bind_slot(&mut out, &pattern.predicate, Term::Iri(stmt.predicate.clone()))?;
    bind_slot(&mut out, &pattern.object, stmt.object.clone())?;
    if let Slot::Var(_) = pattern.context {
        let context = stmt.context.clone()?;
        bind_slot(&mut out, &pattern.context, Term::Iri(context))?;
    }
    Some(out)
}

/// Bind a variable, or check consistency if it repeats within one pattern
fn bind_slot(bindings: &mut Bindings, slot: &Slot, value: Term) -> Option<()> {
    if let Slot::Var(name) = slot {
        match bindings.get(name) {
            Some(existing) if *existing != value => return None,
            Some(_) => {}
            None => {
                bindings.insert(name.clone(), value);
            }
        }
    }
    Some(())
}

/// Read a bound IRI out of a solution
pub fn bound_iri<'a>(bindings: &'a Bindings, var: &str) -> Option<&'a Iri> {
    bindings.get(var).and_then(Term::as_iri)
}
