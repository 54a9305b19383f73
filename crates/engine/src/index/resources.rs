use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rmap_core::{
    vocab, Iri, ObjectType, Resource, ResultBatch, RmapResult, SearchParams, Term, Triple,
};
use rmap_storage::{bound_iri, var, PatternQuery, TripleStore};

use super::filter;
use super::generating_agents;
use crate::events::EventStore;
use crate::objects::{is_type, object_type, statements_touching};

/// Objects and statements that mention a resource
#[derive(Clone)]
pub struct ResourceIndex {
    store: Arc<dyn TripleStore>,
    events: EventStore,
}

impl ResourceIndex {
    pub fn new(store: Arc<dyn TripleStore>, events: EventStore) -> Self {
        Self { store, events }
    }

    /// Contexts of statements touching `resource` that are of `kind`
    fn contexts_of(&self, resource: &Iri, kind: ObjectType) -> RmapResult<Vec<Iri>> {
        let mut out: Vec<Iri> = Vec::new();
        for stmt in statements_touching(&*self.store, &Resource::Iri(resource.clone()), None)? {
            let Some(context) = stmt.context else {
                continue;
            };
            if !out.contains(&context) && is_type(&*self.store, &context, kind)? {
                out.push(context);
            }
        }
        Ok(out)
    }

    /// Filtered DiSCOs touching `resource`, unpaged
    fn matching_discos(&self, resource: &Iri, params: &SearchParams) -> RmapResult<Vec<Iri>> {
        let mut out = Vec::new();
        for disco in self.contexts_of(resource, ObjectType::Disco)? {
            if filter::object_matches(&self.events, &disco, params)? {
                out.push(disco);
            }
        }
        Ok(out)
    }

    /// DiSCOs with a statement that has `resource` as subject or object
    pub fn related_discos(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        let candidates = self.contexts_of(resource, ObjectType::Disco)?;
        filter::page_filtered(candidates, params, |id| {
            filter::object_matches(&self.events, id, params)
        })
    }

    /// Agents that asserted the DiSCOs touching `resource`
    pub fn asserting_agents(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        let mut agents = Vec::new();
        for disco in self.matching_discos(resource, params)? {
            agents.extend(generating_agents(&self.events, &disco)?);
        }
        filter::page_filtered(agents, params, |_| Ok(true))
    }

    /// Asserting agents plus agents whose own graph mentions `resource`
    pub fn related_agents(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        let mut agents = Vec::new();
        for disco in self.matching_discos(resource, params)? {
            agents.extend(generating_agents(&self.events, &disco)?);
        }
        for agent in self.contexts_of(resource, ObjectType::Agent)? {
            if filter::status_matches(&self.events, &agent, params.status())? {
                agents.push(agent);
            }
        }
        filter::page_filtered(agents, params, |_| Ok(true))
    }

    /// Events on the DiSCOs and agents touching `resource`
    pub fn related_events(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        let mut candidates = Vec::new();
        for disco in self.contexts_of(resource, ObjectType::Disco)? {
            if filter::status_matches(&self.events, &disco, params.status())? {
                candidates.extend(self.events.disco_related_event_ids(&disco)?);
            }
        }
        for agent in self.contexts_of(resource, ObjectType::Agent)? {
            if filter::status_matches(&self.events, &agent, params.status())? {
                candidates.extend(self.events.agent_related_event_ids(&agent)?);
            }
        }
        filter::page_filtered(candidates, params, |id| {
            filter::event_matches(&self.events, id, params)
        })
    }

    /// Statements with `resource` as subject or object
    ///
    /// The status filter applies to each statement's context. Literal, IRI
    /// and `rdf:type` objects can be excluded through the params.
    pub fn related_triples(
        &self,
        resource: &Iri,
        context: Option<&Iri>,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Triple>> {
        let stmts = statements_touching(&*self.store, &Resource::Iri(resource.clone()), context)?;
        let mut candidates = Vec::new();
        let mut admitted: BTreeMap<Iri, bool> = BTreeMap::new();
        for stmt in stmts {
            let Some(ctx) = &stmt.context else {
                continue;
            };
            if excluded(&stmt.predicate, &stmt.object, params) {
                continue;
            }
            let pass = match admitted.get(ctx) {
                Some(pass) => *pass,
                None => {
                    let pass = self.context_matches(ctx, params)?;
                    admitted.insert(ctx.clone(), pass);
                    pass
                }
            };
            if pass {
                candidates.push(stmt.triple());
            }
        }
        filter::page_filtered(candidates, params, |_| Ok(true))
    }

    fn context_matches(&self, context: &Iri, params: &SearchParams) -> RmapResult<bool> {
        match object_type(&*self.store, context)? {
            Some(ObjectType::Event) => filter::event_matches(&self.events, context, params),
            Some(_) => filter::object_matches(&self.events, context, params),
            None => Ok(false),
        }
    }

    /// `rdf:type` values of `resource` asserted in graph `context`
    pub fn rdf_types_in_context(&self, resource: &Iri, context: &Iri) -> RmapResult<BTreeSet<Iri>> {
        let query = PatternQuery::new()
            .pattern(resource, &*vocab::rdf::TYPE, var("type"), context)
            .select(&["type"]);
        Ok(self
            .store
            .query(&query)?
            .iter()
            .filter_map(|b| bound_iri(b, "type").cloned())
            .collect())
    }

    /// `rdf:type` values of `resource`, keyed by the graph asserting them
    pub fn rdf_types_all_contexts(
        &self,
        resource: &Iri,
        params: &SearchParams,
    ) -> RmapResult<BTreeMap<Iri, BTreeSet<Iri>>> {
        let query = PatternQuery::new()
            .pattern(resource, &*vocab::rdf::TYPE, var("type"), var("ctx"))
            .select(&["type", "ctx"]);
        let mut out: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        let mut admitted: BTreeMap<Iri, bool> = BTreeMap::new();
        for bindings in self.store.query(&query)? {
            let (Some(ty), Some(ctx)) = (bound_iri(&bindings, "type"), bound_iri(&bindings, "ctx")) else {
                continue;
            };
            let pass = match admitted.get(ctx) {
                Some(pass) => *pass,
                None => {
                    let pass = self.context_matches(ctx, params)?;
                    admitted.insert(ctx.clone(), pass);
                    pass
                }
            };
            if pass {
                out.entry(ctx.clone()).or_default().insert(ty.clone());
            }
        }
        Ok(out)
    }
}

fn excluded(predicate: &Iri, object: &Term, params: &SearchParams) -> bool {
    (params.exclude_literals() && object.is_literal())
        || (params.exclude_iris() && object.as_iri().is_some())
        || (params.exclude_types() && *predicate == *vocab::rdf::TYPE)
}
