//! Agent registry: identities that assert DiSCOs and initiate events.
//!
//! Agents have no inactive state. Their status is derived from the event
//! log in the order DELETED, TOMBSTONED, then ACTIVE via the creation event.
//!
//! ## Error Handling
//!
//! | Error | Condition |
//! |-------|-----------|
//! | `NotFound` | No agent with the given id |
//! | `AgentNotFound` | Requester does not resolve to an agent |
//! | `DefectiveArgument` | Id already in use, or an update that changes nothing |
//! | `Internal` | An agent with no creation event |

use std::sync::Arc;

use rmap_core::{
    vocab, Agent, Event, EventDetail, Iri, Literal, ObjectType, RequestEventDetails, ResultBatch,
    RmapError, RmapResult, SearchParams, Statement, Status, TargetType, Term,
};
use rmap_storage::TripleStore;

use crate::adapter::{agent_to_statements, as_agent};
use crate::events::EventStore;
use crate::ids::IdService;
use crate::index::filter;
use crate::objects::{is_type, named_graph};
use crate::txn::in_transaction;

/// Create, update and look up agents
#[derive(Clone)]
pub struct AgentRegistry {
    store: Arc<dyn TripleStore>,
    events: EventStore,
    ids: Arc<dyn IdService>,
    admin: Option<Iri>,
}

impl AgentRegistry {
    pub fn new(
        store: Arc<dyn TripleStore>,
        events: EventStore,
        ids: Arc<dyn IdService>,
        admin: Option<Iri>,
    ) -> Self {
        Self {
            store,
            events,
            ids,
            admin,
        }
    }

    pub fn is_agent_id(&self, id: &Iri) -> RmapResult<bool> {
        is_type(&*self.store, id, ObjectType::Agent)
    }

    /// Derived status of agent `id`
    pub fn status(&self, id: &Iri) -> RmapResult<Status> {
        if !self.is_agent_id(id)? {
            return Err(RmapError::not_found(format!("no agent with id {}", id)));
        }
        if self.events.is_referenced(&vocab::rmap::DELETED_OBJECT, id)? {
            return Ok(Status::Deleted);
        }
        if self.events.is_referenced(&vocab::rmap::TOMBSTONED_OBJECT, id)? {
            return Ok(Status::Tombstoned);
        }
        if self.events.is_referenced(&vocab::prov::GENERATED, id)? {
            return Ok(Status::Active);
        }
        Err(RmapError::internal(format!("agent {} has no creation event", id)))
    }

    pub fn read(&self, id: &Iri) -> RmapResult<Agent> {
        if !self.is_agent_id(id)? {
            return Err(RmapError::not_found(format!("no agent with id {}", id)));
        }
        as_agent(&named_graph(&*self.store, id)?, || {
            Err(RmapError::internal(format!("stored agent {} has no context", id)))
        })
    }

    /// Fails `AgentNotFound` unless the requester is a known agent
    pub fn validate_requester(&self, requester: &RequestEventDetails) -> RmapResult<()> {
        if self.is_agent_id(&requester.system_agent)? {
            Ok(())
        } else {
            Err(RmapError::agent_not_found(requester.system_agent.clone()))
        }
    }

    pub fn has_admin_rights(&self, requester: &RequestEventDetails) -> bool {
        self.admin.as_ref() == Some(&requester.system_agent)
    }

    /// Register `agent`; agents may create themselves
    pub fn create(&self, agent: &Agent, requester: &RequestEventDetails) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            if requester.system_agent != agent.id {
                self.validate_requester(requester)?;
            }
            if self.store.exists(&agent.id)? {
                return Err(RmapError::defective(format!(
                    "id {} is already in use",
                    agent.id
                )));
            }
            self.store.add_statements(&agent_to_statements(agent))?;
            let event = Event::begin(
                self.ids.create_id()?,
                TargetType::Agent,
                requester,
                EventDetail::Creation {
                    created: vec![agent.id.clone()],
                },
            )
            .with_progenitor(agent.id.clone());
            self.events.append(event)
        })?;
        tracing::info!(target: "rmap::agent", agent = %agent.id, event = %event.id, "agent created");
        Ok(event)
    }

    /// Replace the changed fields of an existing agent
    pub fn update(&self, agent: &Agent, requester: &RequestEventDetails) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            self.validate_requester(requester)?;
            let current = self.read(&agent.id)?;
            let changes = diff(&current, agent);
            if changes.is_empty() {
                return Err(RmapError::defective(format!(
                    "agent {} update changes nothing",
                    agent.id
                )));
            }

            let mut description = match &requester.description {
                Some(d) => format!("{}; Updates: ", d),
                None => "Updates: ".to_string(),
            };
            for change in &changes {
                description.push_str(&change.summary);
                self.store.remove_statements(&[change.old.clone()])?;
                self.store.add_statement(&change.new)?;
            }

            let mut event = Event::begin(
                self.ids.create_id()?,
                TargetType::Agent,
                requester,
                EventDetail::UpdateWithReplace {
                    updated: agent.id.clone(),
                },
            )
            .with_progenitor(agent.id.clone());
            event.description = Some(description);
            self.events.append(event)
        })?;
        tracing::info!(target: "rmap::agent", agent = %agent.id, event = %event.id, "agent updated");
        Ok(event)
    }

    /// DiSCOs generated by events `agent` initiated
    pub fn discos_created_by(&self, agent: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.require_agent(agent)?;
        let mut candidates = Vec::new();
        for id in self.events.events_by_agent(agent)? {
            let event = self.events.read(&id)?;
            if event.target_type == TargetType::Disco {
                candidates.extend(event.detail.created().iter().cloned());
            }
        }
        filter::page_filtered(candidates, params, |id| {
            filter::object_matches(&self.events, id, params)
        })
    }

    /// Events whose associated agent is `agent`
    pub fn events_initiated_by(&self, agent: &Iri, params: &SearchParams) -> RmapResult<ResultBatch<Iri>> {
        self.require_agent(agent)?;
        let candidates = self.events.events_by_agent(agent)?;
        filter::page_filtered(candidates, params, |id| {
            filter::event_matches(&self.events, id, params)
        })
    }

    fn require_agent(&self, id: &Iri) -> RmapResult<()> {
        if self.is_agent_id(id)? {
            Ok(())
        } else {
            Err(RmapError::not_found(format!("no agent with id {}", id)))
        }
    }
}

struct FieldChange {
    old: Statement,
    new: Statement,
    summary: String,
}

fn diff(current: &Agent, updated: &Agent) -> Vec<FieldChange> {
    let id = &current.id;
    let field = |predicate: &Iri, old: Term, new: Term, summary: String| FieldChange {
        old: Statement::new(id.clone(), predicate.clone(), old, Some(id.clone())),
        new: Statement::new(id.clone(), predicate.clone(), new, Some(id.clone())),
        summary,
    };

    let mut changes = Vec::new();
    if current.name != updated.name {
        changes.push(field(
            &vocab::foaf::NAME,
            Literal::string(current.name.clone()).into(),
            Literal::string(updated.name.clone()).into(),
            format!("foaf:name=\"{}\" -> \"{}\"; ", current.name, updated.name),
        ));
    }
    if current.id_provider != updated.id_provider {
        changes.push(field(
            &vocab::rmap::IDENTITY_PROVIDER,
            current.id_provider.clone().into(),
            updated.id_provider.clone().into(),
            format!(
                "rmap:identityProvider={} -> {}; ",
                current.id_provider, updated.id_provider
            ),
        ));
    }
    if current.auth_id != updated.auth_id {
        changes.push(field(
            &vocab::rmap::USER_AUTH_ID,
            current.auth_id.clone().into(),
            updated.auth_id.clone().into(),
            format!("rmap:userAuthId={} -> {}; ", current.auth_id, updated.auth_id),
        ));
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RandomIdService;
    use crate::sink::NoopEventSink;
    use rmap_core::{ErrorKind, EventType};
    use rmap_storage::MemoryTripleStore;
    use std::time::Duration;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn registry(admin: Option<Iri>) -> AgentRegistry {
        let store: Arc<dyn TripleStore> = Arc::new(MemoryTripleStore::new());
        let events = EventStore::new(store.clone(), Arc::new(NoopEventSink), Duration::from_secs(1));
        AgentRegistry::new(store, events, Arc::new(RandomIdService::default()), admin)
    }

    fn agent(id: &str) -> Agent {
        Agent::new(
            iri(id),
            "Lab",
            iri("http://idp.example.org"),
            iri(&format!("http://idp.example.org/{}", &id[5..])),
        )
    }

    fn as_self(a: &Agent) -> RequestEventDetails {
        RequestEventDetails::new(a.id.clone())
    }

    #[test]
    fn self_create_then_read() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        let event = reg.create(&a, &as_self(&a)).unwrap();
        assert_eq!(event.event_type(), EventType::Creation);
        assert_eq!(event.lineage_progenitor, Some(a.id.clone()));
        assert_eq!(reg.read(&a.id).unwrap(), a);
        assert_eq!(reg.status(&a.id).unwrap(), Status::Active);
        assert!(reg.validate_requester(&as_self(&a)).is_ok());
    }

    #[test]
    fn unknown_requester_rejected() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        let err = reg
            .create(&a, &RequestEventDetails::new(iri("rmap:ghost")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AgentNotFound);
        assert!(!reg.is_agent_id(&a.id).unwrap());
    }

    #[test]
    fn duplicate_id_rejected() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        reg.create(&a, &as_self(&a)).unwrap();
        let err = reg.create(&a, &as_self(&a)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
    }

    #[test]
    fn update_replaces_changed_fields() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        reg.create(&a, &as_self(&a)).unwrap();

        let mut renamed = a.clone();
        renamed.name = "Alice's Lab".to_string();
        let event = reg
            .update(&renamed, &as_self(&a).with_description("rename"))
            .unwrap();
        assert_eq!(event.event_type(), EventType::UpdateWithReplace);
        assert_eq!(
            event.description.as_deref(),
            Some("rename; Updates: foaf:name=\"Lab\" -> \"Alice's Lab\"; ")
        );
        assert_eq!(reg.read(&a.id).unwrap(), renamed);
    }

    #[test]
    fn noop_update_rejected() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        reg.create(&a, &as_self(&a)).unwrap();
        let err = reg.update(&a, &as_self(&a)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
    }

    #[test]
    fn status_of_unknown_is_not_found() {
        let reg = registry(None);
        assert!(reg.status(&iri("rmap:nobody")).unwrap_err().is_not_found());
        assert!(reg.read(&iri("rmap:nobody")).unwrap_err().is_not_found());
    }

    #[test]
    fn admin_rights() {
        let reg = registry(Some(iri("rmap:admin")));
        assert!(reg.has_admin_rights(&RequestEventDetails::new(iri("rmap:admin"))));
        assert!(!reg.has_admin_rights(&RequestEventDetails::new(iri("rmap:alice"))));
    }

    #[test]
    fn events_initiated_by_lists_creation_and_update() {
        let reg = registry(None);
        let a = agent("rmap:alice");
        reg.create(&a, &as_self(&a)).unwrap();
        let mut changed = a.clone();
        changed.auth_id = iri("http://idp.example.org/other");
        reg.update(&changed, &as_self(&a)).unwrap();

        let batch = reg
            .events_initiated_by(&a.id, &SearchParams::default())
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch.has_next);
    }
}
