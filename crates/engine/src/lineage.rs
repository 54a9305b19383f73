//! Lineage: the version history of a DiSCO.
//!
//! Every creating event records the progenitor of the lineage it adds to.
//! Same-creator updates keep the progenitor; a derivation by another agent
//! starts a new lineage rooted at the derived DiSCO.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use rmap_core::{vocab, EventType, Iri, RmapError, RmapResult, TargetType, Term};

use crate::events::EventStore;

/// Lineage lookups over the event log
#[derive(Clone)]
pub struct LineageIndex {
    events: EventStore,
}

impl LineageIndex {
    pub fn new(events: EventStore) -> Self {
        Self { events }
    }

    /// Progenitor of the lineage `disco` belongs to
    pub fn find_progenitor(&self, disco: &Iri) -> RmapResult<Iri> {
        let mut found = BTreeSet::new();
        for event in self.events.generating_events(disco)? {
            match self.events.lineage_progenitor(&event) {
                Ok(progenitor) => {
                    found.insert(progenitor);
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        let mut found = found.into_iter();
        match (found.next(), found.next()) {
            (Some(progenitor), None) => Ok(progenitor),
            (None, _) => Err(RmapError::not_found(format!(
                "no lineage found for {}",
                disco
            ))),
            (Some(_), Some(_)) => {
                tracing::error!(target: "rmap::disco", disco = %disco, "multiple lineage progenitors");
                Err(RmapError::internal(format!(
                    "{} belongs to more than one lineage",
                    disco
                )))
            }
        }
    }

    /// Lineage members with the end time of their generating event
    ///
    /// Ordered by end time, ties broken by id.
    pub fn members_with_dates(&self, progenitor: &Iri) -> RmapResult<Vec<(DateTime<Utc>, Iri)>> {
        let mut members = Vec::new();
        let events = self
            .events
            .events_with_object(&vocab::rmap::LINEAGE_PROGENITOR, &Term::Iri(progenitor.clone()))?;
        for event in events {
            if self.events.target_type(&event)? != TargetType::Disco
                || !self.events.event_type(&event)?.creates_objects()
            {
                continue;
            }
            let end = self.events.end_time(&event)?;
            for id in self.events.generated_ids(&event)? {
                members.push((end, id));
            }
        }
        members.sort();
        members.dedup_by(|a, b| a.1 == b.1);
        Ok(members)
    }

    /// Lineage members ordered by end time
    pub fn members(&self, progenitor: &Iri) -> RmapResult<Vec<Iri>> {
        Ok(self
            .members_with_dates(progenitor)?
            .into_iter()
            .map(|(_, id)| id)
            .collect())
    }

    /// Newest member of the lineage `disco` belongs to
    pub fn latest_member(&self, disco: &Iri) -> RmapResult<Iri> {
        let progenitor = self.find_progenitor(disco)?;
        self.members(&progenitor)?
            .pop()
            .ok_or_else(|| RmapError::internal(format!("lineage {} has no members", progenitor)))
    }

    /// DiSCOs derived by other agents from any member of `disco`'s lineage
    pub fn derivatives_from(&self, disco: &Iri) -> RmapResult<BTreeSet<Iri>> {
        let progenitor = self.find_progenitor(disco)?;
        let mut out = BTreeSet::new();
        for member in self.members(&progenitor)? {
            let sourced = self
                .events
                .events_with_object(&vocab::rmap::HAS_SOURCE_OBJECT, &Term::Iri(member))?;
            for event in sourced {
                if self.events.event_type(&event)? == EventType::Derivation {
                    out.insert(self.events.derived_object(&event)?);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NoopEventSink;
    use rmap_core::{ErrorKind, Event, EventDetail, RequestEventDetails};
    use rmap_storage::MemoryTripleStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn setup() -> (EventStore, LineageIndex) {
        let events = EventStore::new(
            Arc::new(MemoryTripleStore::new()),
            Arc::new(NoopEventSink),
            Duration::from_secs(1),
        );
        (events.clone(), LineageIndex::new(events))
    }

    fn append(events: &EventStore, id: &str, progenitor: &str, detail: EventDetail) {
        let ev = Event::begin(
            iri(id),
            TargetType::Disco,
            &RequestEventDetails::new(iri("rmap:agent")),
            detail,
        )
        .with_progenitor(iri(progenitor));
        events.append(ev).unwrap();
    }

    #[test]
    fn update_chain_is_one_lineage() {
        let (events, lineage) = setup();
        append(&events, "rmap:e1", "rmap:d1", EventDetail::Creation { created: vec![iri("rmap:d1")] });
        append(
            &events,
            "rmap:e2",
            "rmap:d1",
            EventDetail::Update {
                created: vec![iri("rmap:d2")],
                inactivated: iri("rmap:d1"),
                derived: iri("rmap:d2"),
            },
        );
        append(&events, "rmap:e3", "rmap:d1", EventDetail::Inactivation { inactivated: iri("rmap:d2") });

        assert_eq!(lineage.find_progenitor(&iri("rmap:d2")).unwrap(), iri("rmap:d1"));
        assert_eq!(
            lineage.members(&iri("rmap:d1")).unwrap(),
            vec![iri("rmap:d1"), iri("rmap:d2")]
        );
        assert_eq!(lineage.latest_member(&iri("rmap:d1")).unwrap(), iri("rmap:d2"));
        let dated = lineage.members_with_dates(&iri("rmap:d1")).unwrap();
        assert!(dated[0].0 < dated[1].0);
    }

    #[test]
    fn derivation_starts_new_lineage() {
        let (events, lineage) = setup();
        append(&events, "rmap:e1", "rmap:d1", EventDetail::Creation { created: vec![iri("rmap:d1")] });
        append(
            &events,
            "rmap:e2",
            "rmap:d3",
            EventDetail::Derivation {
                created: vec![iri("rmap:d3")],
                source: iri("rmap:d1"),
                derived: iri("rmap:d3"),
            },
        );
        assert_eq!(lineage.find_progenitor(&iri("rmap:d3")).unwrap(), iri("rmap:d3"));
        assert_eq!(lineage.members(&iri("rmap:d1")).unwrap(), vec![iri("rmap:d1")]);
        assert_eq!(
            lineage.derivatives_from(&iri("rmap:d1")).unwrap().into_iter().collect::<Vec<_>>(),
            vec![iri("rmap:d3")]
        );
    }

    #[test]
    fn two_progenitors_is_internal() {
        let (events, lineage) = setup();
        append(&events, "rmap:e1", "rmap:p1", EventDetail::Creation { created: vec![iri("rmap:d")] });
        append(&events, "rmap:e2", "rmap:p2", EventDetail::Creation { created: vec![iri("rmap:d")] });
        let err = lineage.find_progenitor(&iri("rmap:d")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn unknown_disco_has_no_lineage() {
        let (_, lineage) = setup();
        assert!(lineage.find_progenitor(&iri("rmap:none")).unwrap_err().is_not_found());
    }
}
