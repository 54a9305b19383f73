//! Event store: the append-only log every object status is derived from.
//!
//! Each event is persisted as its own named graph. Lookups that ask "which
//! events reference X through predicate P" verify that the match lives in an
//! event graph about that event, so stray triples elsewhere in the store
//! cannot masquerade as lifecycle records.

use chrono::{DateTime, Duration as ChronoDuration, SubsecRound, Utc};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use rmap_core::{
    vocab, Event, EventDetail, EventType, Iri, Literal, ObjectType, RmapError, RmapResult,
    TargetType, Term,
};
use rmap_storage::{StatementPattern, TripleStore};

use crate::adapter::{as_event, event_to_statements};
use crate::objects::{is_type, named_graph};
use crate::sink::EventSink;
use crate::txn::in_transaction;

/// Append and query events
#[derive(Clone)]
pub struct EventStore {
    store: Arc<dyn TripleStore>,
    sink: Arc<dyn EventSink>,
    publish_timeout: Duration,
    /// Last end time handed out; end times strictly increase
    clock: Arc<Mutex<DateTime<Utc>>>,
}

impl EventStore {
    pub fn new(store: Arc<dyn TripleStore>, sink: Arc<dyn EventSink>, publish_timeout: Duration) -> Self {
        Self {
            store,
            sink,
            publish_timeout,
            clock: Arc::new(Mutex::new(DateTime::<Utc>::MIN_UTC)),
        }
    }

    /// Persist `event` and offer it to the sink
    ///
    /// Stamps the end time, truncated to the persisted millisecond precision
    /// and strictly after any end time this store handed out before, so
    /// lineage ordering by end time is total. Returns the event as stored.
    pub fn append(&self, mut event: Event) -> RmapResult<Event> {
        self.stamp(&mut event);
        let stmts = event_to_statements(&event);
        in_transaction(&*self.store, || self.store.add_statements(&stmts))?;
        tracing::debug!(
            target: "rmap::event",
            event = %event.id,
            event_type = %event.event_type(),
            agent = %event.associated_agent,
            "event appended"
        );
        self.publish(&event);
        Ok(event)
    }

    fn stamp(&self, event: &mut Event) {
        let mut last = self.clock.lock();
        let now = Utc::now().trunc_subsecs(3);
        let end = if now > *last {
            now
        } else {
            *last + ChronoDuration::milliseconds(1)
        };
        *last = end;
        event.end_time = end;
        event.start_time = event.start_time.trunc_subsecs(3).min(end);
    }

    fn publish(&self, event: &Event) {
        let handle = self.sink.publish(&event.id, event);
        match handle.wait(self.publish_timeout) {
            Ok(()) => {
                tracing::trace!(target: "rmap::event", event = %event.id, "event published")
            }
            Err(e) => tracing::warn!(
                target: "rmap::event",
                event = %event.id,
                error = %e,
                "event publication failed"
            ),
        }
    }

    /// Parse the event graph `id`
    pub fn read(&self, id: &Iri) -> RmapResult<Event> {
        if !self.is_event(id)? {
            return Err(RmapError::not_found(format!("no event with id {}", id)));
        }
        as_event(&named_graph(&*self.store, id)?)
    }

    pub fn is_event(&self, id: &Iri) -> RmapResult<bool> {
        is_type(&*self.store, id, ObjectType::Event)
    }

    // =========================================================================
    // Single-field lookups
    // =========================================================================

    fn field(&self, id: &Iri, predicate: &Iri) -> RmapResult<Term> {
        let found = self.store.get_statements(
            &StatementPattern::any()
                .subject(id.clone())
                .predicate(predicate)
                .context(id),
        )?;
        found
            .into_iter()
            .next()
            .map(|s| s.object)
            .ok_or_else(|| RmapError::not_found(format!("event {} has no <{}>", id, predicate)))
    }

    fn iri_field(&self, id: &Iri, predicate: &Iri) -> RmapResult<Iri> {
        match self.field(id, predicate)? {
            Term::Iri(iri) => Ok(iri),
            other => Err(RmapError::internal(format!(
                "event {} has non-IRI <{}> value {}",
                id, predicate, other
            ))),
        }
    }

    fn time_field(&self, id: &Iri, predicate: &Iri) -> RmapResult<DateTime<Utc>> {
        let value = self.field(id, predicate)?;
        value
            .as_literal()
            .and_then(Literal::as_date_time)
            .ok_or_else(|| {
                RmapError::internal(format!("event {} has malformed <{}> {}", id, predicate, value))
            })
    }

    pub fn event_type(&self, id: &Iri) -> RmapResult<EventType> {
        let iri = self.iri_field(id, &vocab::rmap::EVENT_TYPE)?;
        EventType::from_iri(&iri)
            .ok_or_else(|| RmapError::internal(format!("event {} has unknown type {}", id, iri)))
    }

    pub fn target_type(&self, id: &Iri) -> RmapResult<TargetType> {
        let iri = self.iri_field(id, &vocab::rmap::EVENT_TARGET_TYPE)?;
        TargetType::from_iri(&iri).ok_or_else(|| {
            RmapError::internal(format!("event {} has unknown target type {}", id, iri))
        })
    }

    pub fn start_time(&self, id: &Iri) -> RmapResult<DateTime<Utc>> {
        self.time_field(id, &vocab::prov::STARTED_AT_TIME)
    }

    pub fn end_time(&self, id: &Iri) -> RmapResult<DateTime<Utc>> {
        self.time_field(id, &vocab::prov::ENDED_AT_TIME)
    }

    pub fn associated_agent(&self, id: &Iri) -> RmapResult<Iri> {
        self.iri_field(id, &vocab::prov::WAS_ASSOCIATED_WITH)
    }

    pub fn lineage_progenitor(&self, id: &Iri) -> RmapResult<Iri> {
        self.iri_field(id, &vocab::rmap::LINEAGE_PROGENITOR)
    }

    pub fn derived_object(&self, id: &Iri) -> RmapResult<Iri> {
        self.iri_field(id, &vocab::rmap::DERIVED_OBJECT)
    }

    /// Objects event `id` generated
    pub fn generated_ids(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        let found = self.store.get_statements(
            &StatementPattern::any()
                .subject(id.clone())
                .predicate(&vocab::prov::GENERATED)
                .context(id),
        )?;
        Ok(found
            .into_iter()
            .filter_map(|s| s.object.as_iri().cloned())
            .collect())
    }

    // =========================================================================
    // Reference lookups
    // =========================================================================

    /// Events whose own graph holds `(event, predicate, object)`
    pub fn events_with_object(&self, predicate: &Iri, object: &Term) -> RmapResult<Vec<Iri>> {
        let found = self.store.get_statements(
            &StatementPattern::any()
                .predicate(predicate)
                .object(object.clone()),
        )?;
        let mut out = Vec::new();
        for stmt in found {
            if !stmt.subject_is_context() {
                continue;
            }
            let Some(event) = stmt.subject.as_iri() else {
                continue;
            };
            if !out.contains(event) && self.is_event(event)? {
                out.push(event.clone());
            }
        }
        Ok(out)
    }

    /// True when some event references `id` through `predicate`
    pub fn is_referenced(&self, predicate: &Iri, id: &Iri) -> RmapResult<bool> {
        Ok(!self
            .events_with_object(predicate, &Term::Iri(id.clone()))?
            .is_empty())
    }

    /// Events that generated `id`
    pub fn generating_events(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.events_with_object(&vocab::prov::GENERATED, &Term::Iri(id.clone()))
    }

    fn related_by(&self, id: &Iri, predicates: &[&Iri]) -> RmapResult<Vec<Iri>> {
        let object = Term::Iri(id.clone());
        let mut out: Vec<Iri> = Vec::new();
        for predicate in predicates {
            for event in self.events_with_object(predicate, &object)? {
                if !out.contains(&event) {
                    out.push(event);
                }
            }
        }
        Ok(out)
    }

    /// Every event that touched DiSCO `id`
    pub fn disco_related_event_ids(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.related_by(
            id,
            &[
                &vocab::rmap::DELETED_OBJECT,
                &vocab::rmap::TOMBSTONED_OBJECT,
                &vocab::rmap::INACTIVATED_OBJECT,
                &vocab::rmap::DERIVED_OBJECT,
                &vocab::rmap::HAS_SOURCE_OBJECT,
                &vocab::prov::GENERATED,
            ],
        )
    }

    /// Every event that touched Agent `id`
    pub fn agent_related_event_ids(&self, id: &Iri) -> RmapResult<Vec<Iri>> {
        self.related_by(
            id,
            &[
                &vocab::rmap::DELETED_OBJECT,
                &vocab::rmap::TOMBSTONED_OBJECT,
                &vocab::rmap::UPDATED_OBJECT,
                &vocab::prov::GENERATED,
            ],
        )
    }

    /// Events initiated by `agent`
    pub fn events_by_agent(&self, agent: &Iri) -> RmapResult<Vec<Iri>> {
        self.events_with_object(&vocab::prov::WAS_ASSOCIATED_WITH, &Term::Iri(agent.clone()))
    }

    // =========================================================================
    // Affected objects
    // =========================================================================

    /// DiSCOs affected by `event`; empty for Agent events
    pub fn affected_discos(&self, event: &Event) -> Vec<Iri> {
        if event.target_type != TargetType::Disco {
            return Vec::new();
        }
        let mut out = event.detail.created().to_vec();
        let extra = match &event.detail {
            EventDetail::Update { inactivated, .. } => Some(inactivated),
            EventDetail::Derivation { source, .. } => Some(source),
            EventDetail::Inactivation { inactivated } => Some(inactivated),
            EventDetail::Tombstone { tombstoned } => Some(tombstoned),
            EventDetail::Deletion { deleted } => Some(deleted),
            EventDetail::Creation { .. } | EventDetail::UpdateWithReplace { .. } => None,
        };
        if let Some(id) = extra {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Agents affected by `event`; empty for DiSCO events
    pub fn affected_agents(&self, event: &Event) -> Vec<Iri> {
        if event.target_type != TargetType::Agent {
            return Vec::new();
        }
        match &event.detail {
            EventDetail::Creation { created } => created.clone(),
            EventDetail::UpdateWithReplace { updated } => vec![updated.clone()],
            EventDetail::Tombstone { tombstoned } => vec![tombstoned.clone()],
            EventDetail::Deletion { deleted } => vec![deleted.clone()],
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// The event in `ids` with the greatest end time
    pub fn latest(&self, ids: &[Iri]) -> RmapResult<Iri> {
        self.sort_by_end_time(ids)?
            .pop()
            .ok_or_else(|| RmapError::not_found("no events to choose the latest from"))
    }

    /// `ids` ordered by end time, ties broken by id
    pub fn sort_by_end_time(&self, ids: &[Iri]) -> RmapResult<Vec<Iri>> {
        let mut timed = ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|id| -> RmapResult<_> { Ok((self.end_time(id)?, id.clone())) })
            .collect::<RmapResult<Vec<_>>>()?;
        timed.sort();
        Ok(timed.into_iter().map(|(_, id)| id).collect())
    }
}
