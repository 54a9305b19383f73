//! The provenance engine facade.
//!
//! [`RmapService`] wires the components over one store connection and
//! exposes every read and write operation. Collaborators are passed in
//! explicitly; [`RmapService::in_memory`] wires the in-process defaults.
//!
//! # Example
//!
//! ```ignore
//! let rmap = RmapService::in_memory(RmapConfig::default())?;
//! rmap.create_agent(&agent, &RequestEventDetails::new(agent.id.clone()))?;
//! let event = rmap.create_disco(&disco, &RequestEventDetails::new(agent.id.clone()))?;
//! assert_eq!(rmap.disco_status(&disco.id)?, Status::Active);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rmap_core::{
    Agent, Disco, Event, Iri, RequestEventDetails, Resource, ResultBatch, RmapConfig, RmapResult,
    SearchParams, Status, StatusFilter, Term, Triple,
};
use rmap_storage::{MemoryTripleStore, TripleStore};

use crate::agents::AgentRegistry;
use crate::discos::{DiscoStore, DiscoView};
use crate::events::EventStore;
use crate::ids::{IdService, RandomIdService};
use crate::index::{ResourceIndex, StatementIndex};
use crate::lineage::LineageIndex;
use crate::sink::{EventSink, NoopEventSink};

/// Provenance engine over one store connection
#[derive(Clone)]
pub struct RmapService {
    store: Arc<dyn TripleStore>,
    config: RmapConfig,
    events: EventStore,
    agents: AgentRegistry,
    discos: DiscoStore,
    lineage: LineageIndex,
    resources: ResourceIndex,
    statements: StatementIndex,
}

impl RmapService {
    pub fn new(
        store: Arc<dyn TripleStore>,
        ids: Arc<dyn IdService>,
        sink: Arc<dyn EventSink>,
        config: RmapConfig,
    ) -> RmapResult<Self> {
        config.validate()?;
        let events = EventStore::new(store.clone(), sink, config.publish_timeout_duration());
        let agents = AgentRegistry::new(
            store.clone(),
            events.clone(),
            ids.clone(),
            config.admin_agent_id.clone(),
        );
        let lineage = LineageIndex::new(events.clone());
        let discos = DiscoStore::new(
            store.clone(),
            events.clone(),
            agents.clone(),
            lineage.clone(),
            ids,
        );
        let resources = ResourceIndex::new(store.clone(), events.clone());
        let statements = StatementIndex::new(store.clone(), events.clone());
        tracing::debug!(
            target: "rmap::store",
            admin = ?config.admin_agent_id,
            default_limit = config.default_query_limit,
            "service initialised"
        );
        Ok(Self {
            store,
            config,
            events,
            agents,
            discos,
            lineage,
            resources,
            statements,
        })
    }

    /// Service over a fresh in-memory store with random ids and no sink
    pub fn in_memory(config: RmapConfig) -> RmapResult<Self> {
        let ids = Arc::new(RandomIdService::from_config(&config));
        Self::new(
            Arc::new(MemoryTripleStore::new()),
            ids,
            Arc::new(NoopEventSink),
            config,
        )
    }

    pub fn config(&self) -> &RmapConfig {
        &self.config
    }

    /// Search params carrying the configured defaults
    pub fn search_params(&self) -> SearchParams {
        self.config.search_params()
    }

    pub fn store(&self) -> &Arc<dyn TripleStore> {
        &self.store
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn is_agent_id(&self, id: &Iri) -> RmapResult<bool> {
        self.agents.is_agent_id(id)
    }

    pub fn is_event_id(&self, id: &Iri) -> RmapResult<bool> {
        self.events.is_event(id)
    }

    pub fn is_disco_id(&self, id: &Iri) -> RmapResult<bool> {
        self.discos.is_disco_id(id)
    }

    // =========================================================================
    // DiSCOs
    // =========================================================================

    pub fn create_disco(&self, disco: &Disco, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.discos.create(disco, requester)
    }

    pub fn update_disco(
        &self,
        old: &Iri,
        new: &Disco,
        requester: &RequestEventDetails,
    ) -> RmapResult<Event> {
        self.discos.update(old, Some(new), requester, false)
    }

    pub fn inactivate_disco(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.discos.update(id, None, requester, true)
    }

    pub fn tombstone_disco(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.discos.tombstone(id, requester)
    }

    pub fn delete_disco(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.discos.delete(id, requester)
    }

    pub fn read_disco(&self, id: &Iri) -> RmapResult<Disco> {
        self.discos.read(id, false)
    }

    /// Read that also returns tombstoned DiSCOs
    pub fn read_disco_allow_tombstoned(&self, id: &Iri) -> RmapResult<Disco> {
        self.discos.read(id, true)
    }

    pub fn read_disco_view(&self, id: &Iri) -> RmapResult<DiscoView> {
        self.discos.read_view(id)
    }

    pub fn disco_status(&self, id: &Iri) -> RmapResult<Status> {
        self.discos.status(id)
    }

    pub fn disco_events(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.discos.events(id)
    }

    pub fn disco_creating_event(&self, id: &Iri) -> RmapResult<Iri> {
        self.discos.creating_event(id)
    }

    pub fn disco_asserting_agent(&self, id: &Iri) -> RmapResult<Iri> {
        self.discos.asserting_agent(id)
    }

    pub fn disco_related_agents(&self, id: &Iri, status: StatusFilter) -> RmapResult<BTreeSet<Iri>> {
        self.discos.related_agents(id, status)
    }

    pub fn is_same_creator(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<bool> {
        self.discos.is_same_creator(id, requester)
    }

    pub fn all_versions(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.discos.all_versions(id)
    }

    pub fn all_agent_versions(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.discos.all_agent_versions(id)
    }

    pub fn latest_version(&self, id: &Iri) -> RmapResult<Iri> {
        self.discos.latest_version(id)
    }

    pub fn previous_version(&self, id: &Iri) -> RmapResult<Option<Iri>> {
        self.discos.previous_version(id)
    }

    pub fn next_version(&self, id: &Iri) -> RmapResult<Option<Iri>> {
        self.discos.next_version(id)
    }

    // =========================================================================
    // Lineage
    // =========================================================================

    pub fn lineage_progenitor(&self, id: &Iri) -> RmapResult<Iri> {
        self.lineage.find_progenitor(id)
    }

    pub fn lineage_members(&self, progenitor: &Iri) -> RmapResult<Vec<Iri>> {
        self.lineage.members(progenitor)
    }

    pub fn derivatives(&self, id: &Iri) -> RmapResult<BTreeSet<Iri>> {
        self.lineage.derivatives_from(id)
    }

    // =========================================================================
    // Agents
    // =========================================================================

    pub fn create_agent(&self, agent: &Agent, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.agents.create(agent, requester)
    }

    pub fn update_agent(&self, agent: &Agent, requester: &RequestEventDetails) -> RmapResult<Event> {
        self.agents.update(agent, requester)
    }

    pub fn read_agent(&self, id: &Iri) -> RmapResult<Agent> {
        self.agents.read(id)
    }

    pub fn agent_status(&self, id: &Iri) -> RmapResult<Status> {
        self.agents.status(id)
    }

    pub fn validate_requester(&self, requester: &RequestEventDetails) -> RmapResult<()> {
        self.agents.validate_requester(requester)
    }

    pub fn has_admin_rights(&self, requester: &RequestEventDetails) -> bool {
        self.agents.has_admin_rights(requester)
    }

    pub fn agent_discos(&self, agent: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.agents.discos_created_by(agent, params)
    }

    pub fn agent_events(&self, agent: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.agents.events_initiated_by(agent, params)
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn read_event(&self, id: &Iri) -> RmapResult<Event> {
        self.events.read(id)
    }

    pub fn event_related_discos(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        Ok(self.events.affected_discos(&self.events.read(id)?))
    }

    pub fn event_related_agents(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        Ok(self.events.affected_agents(&self.events.read(id)?))
    }

    pub fn latest_event(&self, ids: &[Iri]) -> RmapResult<Iri> {
        self.events.latest(ids)
    }

    // =========================================================================
    // Resources and statements
    // =========================================================================

    pub fn resource_related_discos(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.resources.related_discos(resource, params)
    }

    pub fn resource_asserting_agents(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.resources.asserting_agents(resource, params)
    }

    pub fn resource_related_agents(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.resources.related_agents(resource, params)
    }

    pub fn resource_related_events(&self, resource: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.resources.related_events(resource, params)
    }

    pub fn resource_related_triples(
        &self,
        resource: &Iri,
        context: Option<&Iri>,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Triple>> {
        self.resources.related_triples(resource, context, params)
    }

    pub fn resource_rdf_types(&self, resource: &Iri, context: &Iri) -> RmapResult<BTreeSet<Iri>> {
        self.resources.rdf_types_in_context(resource, context)
    }

    pub fn resource_rdf_types_all_contexts(
        &self,
        resource: &Iri,
        params: &SearchParams,
    ) -> RmapResult<BTreeMap<Iri, BTreeSet<Iri>>> {
        self.resources.rdf_types_all_contexts(resource, params)
    }

    pub fn statement_related_discos(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        self.statements.related_discos(subject, predicate, object, params)
    }

    pub fn statement_related_agents(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        self.statements.related_agents(subject, predicate, object, params)
    }

    pub fn statement_asserting_agents(
        &self,
        subject: &Resource,
        predicate: &Iri,
        object: &Term,
        params: &SearchParams,
    ) -> RmapResult<ResultBatch<Iri>> {
        self.statements.asserting_agents(subject, predicate, object, params)
    }
}
