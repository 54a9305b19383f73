//! Conversion between raw statement sets and domain objects.
//!
//! Parsing enforces the structural invariants of each object type, so a
//! value that comes out of [`as_disco`], [`as_agent`] or [`as_event`] is
//! well-formed. The `*_to_statements` functions are the inverses and place
//! every statement in the object's own named graph.

mod agent;
pub mod connectivity;
mod disco;
mod event;

pub use agent::{agent_to_statements, as_agent};
pub use disco::{as_disco, disco_to_statements, validate_disco};
pub use event::{as_event, event_to_statements};

use rmap_core::{vocab, Iri, Resource, RmapResult, Statement, Term};

/// Asserted subject and official id of a submitted object
#[derive(Debug, Clone)]
pub(crate) struct Identifiers {
    pub asserted: Resource,
    pub official: Iri,
}

/// Locate the `rdf:type class` statement
///
/// The statement's context is the official id; when it has none, one is
/// minted with `mint`.
pub(crate) fn identifiers<F>(
    stmts: &[Statement],
    class: &Iri,
    mint: &mut F,
) -> RmapResult<Option<Identifiers>>
where
    F: FnMut() -> RmapResult<Iri>,
{
    let class = Term::Iri(class.clone());
    let Some(type_stmt) = stmts
        .iter()
        .find(|s| s.predicate == *vocab::rdf::TYPE && s.object == class)
    else {
        return Ok(None);
    };
    let official = match &type_stmt.context {
        Some(ctx) => ctx.clone(),
        None => mint()?,
    };
    Ok(Some(Identifiers {
        asserted: type_stmt.subject.clone(),
        official,
    }))
}

pub(crate) fn stmt(subject: &Iri, predicate: &Iri, object: impl Into<Term>, context: &Iri) -> Statement {
    Statement::new(subject.clone(), predicate.clone(), object, Some(context.clone()))
}
