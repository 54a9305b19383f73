//! DiSCO store: create, version, tombstone and delete aggregations.
//!
//! A DiSCO's status is never stored. It is recomputed from the event log on
//! every call with the priority DELETED > TOMBSTONED > INACTIVE > ACTIVE.
//!
//! Updates are guarded optimistically: only the newest member of a lineage
//! may be updated, and a caller holding an older id gets `NotLatestVersion`
//! with the id to retry against. The check and the write are not atomic
//! against other connections; a concurrent writer can slip in between.
//!
//! ## Error Handling
//!
//! | Error | Condition |
//! |-------|-----------|
//! | `NotFound` | Unknown DiSCO id |
//! | `Deleted` / `Tombstoned` | Read or change of a removed DiSCO |
//! | `DefectiveArgument` | Malformed DiSCO, reused id, inactivation by another agent |
//! | `AgentNotFound` | Requester is not a known agent |
//! | `NotLatestVersion` | Update of a superseded lineage member |
//! | `InactiveVersion` | Update of a DiSCO that is not ACTIVE |
//! | `PermissionDenied` | Tombstone or delete by neither creator nor admin |

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use rmap_core::{
    vocab, BlankNode, Disco, Event, EventDetail, Iri, ObjectType, RequestEventDetails, Resource,
    RmapError, RmapResult, Status, StatusFilter, TargetType, Term, Triple,
};
use rmap_storage::TripleStore;

use crate::adapter::{as_disco, disco_to_statements, validate_disco};
use crate::agents::AgentRegistry;
use crate::events::EventStore;
use crate::ids::IdService;
use crate::lineage::LineageIndex;
use crate::objects::{is_type, named_graph};
use crate::txn::in_transaction;

/// A DiSCO with its status and neighbours in the lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoView {
    pub disco: Disco,
    pub status: Status,
    pub previous: Option<Iri>,
    pub next: Option<Iri>,
    pub latest: Iri,
}

/// DiSCO lifecycle operations
#[derive(Clone)]
pub struct DiscoStore {
    store: Arc<dyn TripleStore>,
    events: EventStore,
    agents: AgentRegistry,
    lineage: LineageIndex,
    ids: Arc<dyn IdService>,
}

impl DiscoStore {
    pub fn new(
        store: Arc<dyn TripleStore>,
        events: EventStore,
        agents: AgentRegistry,
        lineage: LineageIndex,
        ids: Arc<dyn IdService>,
    ) -> Self {
        Self {
            store,
            events,
            agents,
            lineage,
            ids,
        }
    }

    // =========================================================================
    // Identity and status
    // =========================================================================

    /// True for stored DiSCOs and for DiSCOs a deletion event removed
    pub fn is_disco_id(&self, id: &Iri) -> RmapResult<bool> {
        if is_type(&*self.store, id, ObjectType::Disco)? {
            return Ok(true);
        }
        for event in self
            .events
            .events_with_object(&vocab::rmap::DELETED_OBJECT, &Term::Iri(id.clone()))?
        {
            if self.events.target_type(&event)? == TargetType::Disco {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn status(&self, id: &Iri) -> RmapResult<Status> {
        if !self.is_disco_id(id)? {
            return Err(RmapError::not_found(format!("no DiSCO with id {}", id)));
        }
        let priority = [
            (&*vocab::rmap::DELETED_OBJECT, Status::Deleted),
            (&*vocab::rmap::TOMBSTONED_OBJECT, Status::Tombstoned),
            (&*vocab::rmap::INACTIVATED_OBJECT, Status::Inactive),
            (&*vocab::prov::GENERATED, Status::Active),
        ];
        for (predicate, status) in priority {
            if self.events.is_referenced(predicate, id)? {
                return Ok(status);
            }
        }
        Err(RmapError::not_found(format!("no events found for DiSCO {}", id)))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Parse DiSCO `id`, gated on its status
    pub fn read(&self, id: &Iri, allow_tombstoned: bool) -> RmapResult<Disco> {
        match self.status(id)? {
            Status::Deleted => return Err(RmapError::deleted(id)),
            Status::Tombstoned if !allow_tombstoned => return Err(RmapError::tombstoned(id)),
            _ => {}
        }
        as_disco(&named_graph(&*self.store, id)?, || {
            Err(RmapError::internal(format!("stored DiSCO {} has no context", id)))
        })
    }

    /// Read plus status and lineage neighbours
    pub fn read_view(&self, id: &Iri) -> RmapResult<DiscoView> {
        let disco = self.read(id, false)?;
        let status = self.status(id)?;
        let versions = self.all_versions(id)?;
        let (previous, next) = neighbours(&versions, id);
        let latest = versions
            .last()
            .cloned()
            .ok_or_else(|| RmapError::internal(format!("DiSCO {} has no lineage members", id)))?;
        Ok(DiscoView {
            disco,
            status,
            previous,
            next,
            latest,
        })
    }

    /// The event that generated `id`
    pub fn creating_event(&self, id: &Iri) -> RmapResult<Iri> {
        let mut creating = Vec::new();
        for event in self.events.generating_events(id)? {
            if self.events.target_type(&event)? == TargetType::Disco
                && self.events.event_type(&event)?.creates_objects()
            {
                creating.push(event);
            }
        }
        match creating.len() {
            0 => Err(RmapError::not_found(format!("no creating event for DiSCO {}", id))),
            1 => Ok(creating.remove(0)),
            n => Err(RmapError::internal(format!(
                "DiSCO {} has {} creating events",
                id, n
            ))),
        }
    }

    /// Agent whose event generated `id`
    pub fn asserting_agent(&self, id: &Iri) -> RmapResult<Iri> {
        self.events.associated_agent(&self.creating_event(id)?)
    }

    pub fn is_same_creator(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<bool> {
        Ok(self.asserting_agent(id)? == requester.system_agent)
    }

    /// Agents behind the events on `id` plus agents its graph references
    ///
    /// Empty unless the DiSCO status equals `status`; `All` skips the check.
    pub fn related_agents(&self, id: &Iri, status: StatusFilter) -> RmapResult<BTreeSet<Iri>> {
        let required = match status {
            StatusFilter::All => None,
            StatusFilter::Active => Some(Status::Active),
            StatusFilter::Inactive => Some(Status::Inactive),
            StatusFilter::Tombstoned => Some(Status::Tombstoned),
            StatusFilter::Deleted => Some(Status::Deleted),
        };
        let mut agents = BTreeSet::new();
        if let Some(required) = required {
            if self.status(id)? != required {
                return Ok(agents);
            }
        }
        for event in self.events.disco_related_event_ids(id)? {
            agents.insert(self.events.associated_agent(&event)?);
        }
        for stmt in self.store.get_named_graph(id)? {
            let referenced = [
                stmt.subject.as_iri().cloned(),
                stmt.object.as_iri().cloned(),
            ];
            for candidate in referenced.into_iter().flatten() {
                if !agents.contains(&candidate) && self.agents.is_agent_id(&candidate)? {
                    agents.insert(candidate);
                }
            }
        }
        Ok(agents)
    }

    /// Events on `id` ordered by end time
    pub fn events(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        let related = self.events.disco_related_event_ids(id)?;
        self.events.sort_by_end_time(&related)
    }

    // =========================================================================
    // Versions
    // =========================================================================

    /// Every member of `id`'s lineage, oldest first
    pub fn all_versions(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        let progenitor = self.lineage.find_progenitor(id)?;
        self.lineage.members(&progenitor)
    }

    /// Lineage members asserted by the agent that asserted `id`
    pub fn all_agent_versions(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        let agent = self.asserting_agent(id)?;
        let mut out = Vec::new();
        for member in self.all_versions(id)? {
            if self.asserting_agent(&member)? == agent {
                out.push(member);
            }
        }
        Ok(out)
    }

    pub fn latest_version(&self, id: &Iri) -> RmapResult<Iri> {
        self.lineage.latest_member(id)
    }

    pub fn previous_version(&self, id: &Iri) -> RmapResult<Option<Iri>> {
        Ok(neighbours(&self.all_versions(id)?, id).0)
    }

    pub fn next_version(&self, id: &Iri) -> RmapResult<Option<Iri>> {
        Ok(neighbours(&self.all_versions(id)?, id).1)
    }

    pub fn derivatives(&self, id: &Iri) -> RmapResult<BTreeSet<Iri>> {
        self.lineage.derivatives_from(id)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store a new DiSCO as the root of its own lineage
    pub fn create(&self, disco: &Disco, requester: &RequestEventDetails) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            self.agents.validate_requester(requester)?;
            self.write_new(disco)?;
            let event = Event::begin(
                self.ids.create_id()?,
                TargetType::Disco,
                requester,
                EventDetail::Creation {
                    created: vec![disco.id.clone()],
                },
            )
            .with_progenitor(disco.id.clone());
            self.events.append(event)
        })?;
        tracing::info!(target: "rmap::disco", disco = %disco.id, event = %event.id, "DiSCO created");
        Ok(event)
    }

    /// Supersede `old` with `new`, or just inactivate it
    ///
    /// The requester who created `old` gets an update in the same lineage.
    /// Any other agent gets a derivation that roots a new lineage at `new`
    /// and leaves `old` untouched.
    pub fn update(
        &self,
        old: &Iri,
        new: Option<&Disco>,
        requester: &RequestEventDetails,
        just_inactivate: bool,
    ) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            self.agents.validate_requester(requester)?;
            if !self.is_disco_id(old)? {
                return Err(RmapError::not_found(format!("no DiSCO with id {}", old)));
            }
            let progenitor = self.lineage.find_progenitor(old)?;
            let latest = self
                .lineage
                .members(&progenitor)?
                .pop()
                .ok_or_else(|| RmapError::internal(format!("lineage {} has no members", progenitor)))?;
            if latest != *old {
                return Err(RmapError::not_latest_version(old, latest));
            }
            if self.status(old)? != Status::Active {
                return Err(RmapError::inactive_version(old));
            }
            let same_creator = self.is_same_creator(old, requester)?;

            let detail = if just_inactivate {
                if !same_creator {
                    return Err(RmapError::defective(
                        "agent is not the creating agent; cannot inactivate another agent's DiSCO",
                    ));
                }
                EventDetail::Inactivation {
                    inactivated: old.clone(),
                }
            } else {
                let new = new.ok_or_else(|| RmapError::defective("no new DiSCO provided for update"))?;
                if new.id == *old {
                    return Err(RmapError::defective(
                        "the DiSCO provided has the same id as the DiSCO being replaced",
                    ));
                }
                self.write_new(new)?;
                if same_creator {
                    EventDetail::Update {
                        created: vec![new.id.clone()],
                        inactivated: old.clone(),
                        derived: new.id.clone(),
                    }
                } else {
                    EventDetail::Derivation {
                        created: vec![new.id.clone()],
                        source: old.clone(),
                        derived: new.id.clone(),
                    }
                }
            };

            let lineage_root = match &detail {
                EventDetail::Derivation { derived, .. } => derived.clone(),
                _ => progenitor,
            };
            let event = Event::begin(self.ids.create_id()?, TargetType::Disco, requester, detail)
                .with_progenitor(lineage_root);
            self.events.append(event)
        })?;
        tracing::info!(
            target: "rmap::disco",
            disco = %old,
            event = %event.id,
            event_type = %event.event_type(),
            "DiSCO updated"
        );
        Ok(event)
    }

    /// Gate reads of `id`; its graph is kept
    pub fn tombstone(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            self.authorize_removal(id, requester)?;
            match self.status(id)? {
                Status::Deleted => return Err(RmapError::deleted(id)),
                Status::Tombstoned => return Err(RmapError::tombstoned(id)),
                _ => {}
            }
            let event = Event::begin(
                self.ids.create_id()?,
                TargetType::Disco,
                requester,
                EventDetail::Tombstone {
                    tombstoned: id.clone(),
                },
            )
            .with_progenitor(self.lineage.find_progenitor(id)?);
            self.events.append(event)
        })?;
        tracing::info!(target: "rmap::disco", disco = %id, event = %event.id, "DiSCO tombstoned");
        Ok(event)
    }

    /// Remove the graph of `id`; only the deletion event remains
    pub fn delete(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<Event> {
        let event = in_transaction(&*self.store, || {
            self.authorize_removal(id, requester)?;
            if self.status(id)? == Status::Deleted {
                return Err(RmapError::deleted(id));
            }
            let graph = named_graph(&*self.store, id)?;
            self.store.remove_statements(&graph)?;
            let event = Event::begin(
                self.ids.create_id()?,
                TargetType::Disco,
                requester,
                EventDetail::Deletion { deleted: id.clone() },
            )
            .with_progenitor(self.lineage.find_progenitor(id)?);
            self.events.append(event)
        })?;
        tracing::info!(target: "rmap::disco", disco = %id, event = %event.id, "DiSCO deleted");
        Ok(event)
    }

    fn authorize_removal(&self, id: &Iri, requester: &RequestEventDetails) -> RmapResult<()> {
        self.agents.validate_requester(requester)?;
        if !self.is_disco_id(id)? {
            return Err(RmapError::not_found(format!("no DiSCO with id {}", id)));
        }
        if self.is_same_creator(id, requester)? || self.agents.has_admin_rights(requester) {
            Ok(())
        } else {
            Err(RmapError::permission_denied(format!(
                "agent {} is neither the creator of DiSCO {} nor an administrator",
                requester.system_agent, id
            )))
        }
    }

    /// Validate, resolve blank nodes and persist a DiSCO graph
    fn write_new(&self, disco: &Disco) -> RmapResult<()> {
        validate_disco(disco)?;
        if self.store.exists(&disco.id)? {
            return Err(RmapError::defective(format!("id {} is already in use", disco.id)));
        }
        let resolved = self.resolve_blank_nodes(disco)?;
        self.store.add_statements(&disco_to_statements(&resolved))
    }

    /// Replace blank nodes with minted IRIs, one IRI per label
    fn resolve_blank_nodes(&self, disco: &Disco) -> RmapResult<Disco> {
        let mut minted: FxHashMap<BlankNode, Iri> = FxHashMap::default();
        let mut resolve_resource = |r: &Resource| -> RmapResult<Resource> {
            match r {
                Resource::Blank(b) => {
                    if let Some(iri) = minted.get(b) {
                        return Ok(Resource::Iri(iri.clone()));
                    }
                    let iri = self.ids.create_id()?;
                    minted.insert(b.clone(), iri.clone());
                    Ok(Resource::Iri(iri))
                }
                Resource::Iri(_) => Ok(r.clone()),
            }
        };

        let mut out = disco.clone();
        out.related_statements = disco
            .related_statements
            .iter()
            .map(|t| -> RmapResult<Triple> {
                let subject = resolve_resource(&t.subject)?;
                let object = match &t.object {
                    Term::Blank(b) => Term::from(resolve_resource(&Resource::Blank(b.clone()))?),
                    other => other.clone(),
                };
                Ok(Triple::new(subject, t.predicate.clone(), object))
            })
            .collect::<RmapResult<Vec<_>>>()?;
        Ok(out)
    }
}

fn neighbours(versions: &[Iri], id: &Iri) -> (Option<Iri>, Option<Iri>) {
    match versions.iter().position(|v| v == id) {
        Some(pos) => (
            pos.checked_sub(1).map(|p| versions[p].clone()),
            versions.get(pos + 1).cloned(),
        ),
        None => (None, None),
    }
}
