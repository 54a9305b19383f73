//! Lookups shared by every object kind.

use rmap_core::{vocab, Iri, ObjectType, Resource, RmapError, RmapResult, Statement, Term};
use rmap_storage::{StatementPattern, TripleStore};

/// True when graph `id` declares `id rdf:type class`
pub fn is_type<S: TripleStore + ?Sized>(store: &S, id: &Iri, object_type: ObjectType) -> RmapResult<bool> {
    let found = store.get_statements(
        &StatementPattern::any()
            .subject(id.clone())
            .predicate(&vocab::rdf::TYPE)
            .object(object_type.class_iri())
            .context(id),
    )?;
    Ok(!found.is_empty())
}

/// The object type declared in graph `id`, if any
pub fn object_type<S: TripleStore + ?Sized>(store: &S, id: &Iri) -> RmapResult<Option<ObjectType>> {
    for t in [ObjectType::Disco, ObjectType::Agent, ObjectType::Event] {
        if is_type(store, id, t)? {
            return Ok(Some(t));
        }
    }
    Ok(None)
}

/// All statements of graph `id`; `NotFound` when it is empty
pub fn named_graph<S: TripleStore + ?Sized>(store: &S, id: &Iri) -> RmapResult<Vec<Statement>> {
    let stmts = store.get_named_graph(id)?;
    if stmts.is_empty() {
        return Err(RmapError::not_found(format!("no graph found for {}", id)));
    }
    Ok(stmts)
}

/// Statements anywhere with `resource` as subject or object
pub fn statements_touching<S: TripleStore + ?Sized>(
    store: &S,
    resource: &Resource,
    context: Option<&Iri>,
) -> RmapResult<Vec<Statement>> {
    let mut as_subject = StatementPattern::any().subject(resource.clone());
    let mut as_object = StatementPattern::any().object(Term::from(resource.clone()));
    if let Some(c) = context {
        as_subject = as_subject.context(c);
        as_object = as_object.context(c);
    }
    let mut out = store.get_statements(&as_subject)?;
    for stmt in store.get_statements(&as_object)? {
        // self-referencing statements already came back as subject matches
        if stmt.subject != *resource {
            out.push(stmt);
        }
    }
    Ok(out)
}
