use std::sync::Arc;

use rmap_core::{vocab, Iri, Resource, ResultBatch, RmapResult, SearchParams, Term};
use rmap_storage::{bound_iri, var, PatternQuery, TripleStore};

use super::filter;
use super::generating_agents;
use crate::events::EventStore;

/// Objects whose graph holds a given triple
#[derive(Clone)]
pub struct StatementIndex {
    store: Arc<dyn TripleStore>,
    events: EventStore,
}

impl StatementIndex {
    pub fn new(store: Arc<dyn TripleStore>, events: EventStore) -> Self {
        Self { store, events }
    }

    /// Graphs holding `(subject, predicate, object)` typed as `class`
    fn holders(&self, subject: &Resource, predicate: &Iri, object: &Term, class: &Iri) -> RmapResult<Vec<Iri>> {
        let query = PatternQuery::new()
            .pattern(subject, predicate, object, var("ctx"))
            .pattern(var("ctx"), &*vocab::rdf::TYPE, class, var("ctx"))
            .select(&["ctx"])
            .distinct();
        Ok(self
            .store
            .query(&query)?
            .iter()
            .filter_map(|b| bound_iri(b, "ctx").cloned())
            .collect())
    }

    fn matching_discos(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<Vec<Iri>> {
        let mut out = Vec::new();
        for disco in self.holders(subject, predicate, object, &vocab::rmap::DISCO)? {
            if filter::object_matches(&self.events, &disco, params)? {
                out.push(disco);
            }
        }
        Ok(out)
    }

    /// DiSCOs containing the triple
    pub fn related_discos(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        let candidates = self.holders(subject, predicate, object, &vocab::rmap::DISCO)?;
        filter::page_filtered(candidates, params, |id| {
            filter::object_matches(&self.events, id, params)
        })
    }

    /// Agents that asserted DiSCOs containing the triple
    pub fn asserting_agents(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        let mut agents = Vec::new();
        for disco in self.matching_discos(subject, predicate, object, params)? {
            agents.extend(generating_agents(&self.events, &disco)?);
        }
        filter::page_filtered(agents, params, |_| Ok(true))
    }

    /// Asserting agents plus agents whose own graph holds the triple
    pub fn related_agents(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        let mut agents = Vec::new();
        for disco in self.matching_discos(subject, predicate, object, params)? {
            agents.extend(generating_agents(&self.events, &disco)?);
        }
        for agent in self.holders(subject, predicate, object, &vocab::rmap::AGENT)? {
            if filter::status_matches(&self.events, &agent, params.status())? {
                agents.push(agent);
            }
        }
        filter::page_filtered(agents, params, |_| Ok(true))
    }
}
