use chrono::{DateTime, Utc};

use rmap_core::{
    vocab, Event, EventDetail, EventType, Iri, Literal, RmapError, RmapResult, Statement,
    TargetType, Term,
};

use super::stmt;

/// Fields collected from an event graph before variant dispatch
#[derive(Default)]
struct RawEvent {
    event_type: Option<EventType>,
    target_type: Option<TargetType>,
    agent: Option<Iri>,
    key: Option<Iri>,
    description: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    progenitor: Option<Iri>,
    generated: Vec<Iri>,
    source: Option<Iri>,
    derived: Option<Iri>,
    inactivated: Option<Iri>,
    tombstoned: Option<Iri>,
    deleted: Option<Iri>,
    updated: Option<Iri>,
}

/// Build an Event from its named graph
///
/// All statements must share one context, which is the event id, and must
/// be about the event. Fails with `DefectiveArgument` naming the first
/// missing field.
pub fn as_event(stmts: &[Statement]) -> RmapResult<Event> {
    let first = stmts
        .first()
        .ok_or_else(|| RmapError::defective("no statements for Event"))?;
    let id = first
        .context
        .clone()
        .ok_or_else(|| RmapError::defective("Event statements must have a context"))?;

    let mut raw = RawEvent::default();
    for s in stmts {
        if s.context.as_ref() != Some(&id) {
            return Err(RmapError::defective(format!(
                "Event statements span more than one context: {}",
                s
            )));
        }
        if s.subject.as_iri() != Some(&id) {
            return Err(RmapError::defective(format!("unexpected statement in Event: {}", s)));
        }
        let p = &s.predicate;
        if *p == *vocab::rdf::TYPE {
            if s.object != Term::Iri(vocab::rmap::EVENT.clone()) {
                return Err(RmapError::defective(format!("unexpected Event type {}", s.object)));
            }
        } else if *p == *vocab::rmap::EVENT_TYPE {
            let t = iri_object(s)?;
            raw.event_type = Some(EventType::from_iri(&t).ok_or_else(|| {
                RmapError::defective(format!("unrecognized event type {}", t))
            })?);
        } else if *p == *vocab::rmap::EVENT_TARGET_TYPE {
            let t = iri_object(s)?;
            raw.target_type = Some(TargetType::from_iri(&t).ok_or_else(|| {
                RmapError::defective(format!("unrecognized event target type {}", t))
            })?);
        } else if *p == *vocab::prov::WAS_ASSOCIATED_WITH {
            raw.agent = Some(iri_object(s)?);
        } else if *p == *vocab::prov::USED {
            raw.key = Some(iri_object(s)?);
        } else if *p == *vocab::dcterms::DESCRIPTION {
            raw.description = Some(s.object.lexical().to_string());
        } else if *p == *vocab::prov::STARTED_AT_TIME {
            raw.start = Some(time_object(s)?);
        } else if *p == *vocab::prov::ENDED_AT_TIME {
            raw.end = Some(time_object(s)?);
        } else if *p == *vocab::rmap::LINEAGE_PROGENITOR {
            raw.progenitor = Some(iri_object(s)?);
        } else if *p == *vocab::prov::GENERATED {
            raw.generated.push(iri_object(s)?);
        } else if *p == *vocab::rmap::HAS_SOURCE_OBJECT {
            raw.source = Some(iri_object(s)?);
        } else if *p == *vocab::rmap::DERIVED_OBJECT {
            raw.derived = Some(iri_object(s)?);
        } else if *p == *vocab::rmap::INACTIVATED_OBJECT {
            raw.inactivated = Some(iri_object(s)?);
        } else if *p == *vocab::rmap::TOMBSTONED_OBJECT {
            raw.tombstoned = Some(iri_object(s)?);
        } else if *p == *vocab::rmap::DELETED_OBJECT {
            raw.deleted = Some(iri_object(s)?);
        } else if *p == *vocab::rmap::UPDATED_OBJECT {
            raw.updated = Some(iri_object(s)?);
        } else {
            return Err(RmapError::defective(format!("unexpected statement in Event: {}", s)));
        }
    }

    let event_type = required(raw.event_type, "rmap:eventType")?;
    let detail = match event_type {
        EventType::Creation => EventDetail::Creation {
            created: non_empty(raw.generated, "prov:generated")?,
        },
        EventType::Update => EventDetail::Update {
            created: non_empty(raw.generated, "prov:generated")?,
            inactivated: required(raw.inactivated, "rmap:inactivatedObject")?,
            derived: required(raw.derived, "rmap:derivedObject")?,
        },
        EventType::Derivation => EventDetail::Derivation {
            created: non_empty(raw.generated, "prov:generated")?,
            source: required(raw.source, "rmap:hasSourceObject")?,
            derived: required(raw.derived, "rmap:derivedObject")?,
        },
        EventType::Inactivation => EventDetail::Inactivation {
            inactivated: required(raw.inactivated, "rmap:inactivatedObject")?,
        },
        EventType::Tombstone => EventDetail::Tombstone {
            tombstoned: required(raw.tombstoned, "rmap:tombstonedObject")?,
        },
        EventType::Deletion => EventDetail::Deletion {
            deleted: required(raw.deleted, "rmap:deletedObject")?,
        },
        EventType::UpdateWithReplace => EventDetail::UpdateWithReplace {
            updated: required(raw.updated, "rmap:updatedObject")?,
        },
    };

    Ok(Event {
        id,
        target_type: required(raw.target_type, "rmap:eventTargetType")?,
        associated_agent: required(raw.agent, "prov:wasAssociatedWith")?,
        associated_key: raw.key,
        description: raw.description,
        start_time: required(raw.start, "prov:startedAtTime")?,
        end_time: required(raw.end, "prov:endedAtTime")?,
        lineage_progenitor: raw.progenitor,
        detail,
    })
}

/// Statements persisting `event`, all in its named graph
pub fn event_to_statements(event: &Event) -> Vec<Statement> {
    let id = &event.id;
    let mut out = vec![
        stmt(id, &vocab::rdf::TYPE, &*vocab::rmap::EVENT, id),
        stmt(id, &vocab::rmap::EVENT_TYPE, event.event_type().iri(), id),
        stmt(id, &vocab::rmap::EVENT_TARGET_TYPE, event.target_type.iri(), id),
        stmt(id, &vocab::prov::WAS_ASSOCIATED_WITH, &event.associated_agent, id),
    ];
    if let Some(key) = &event.associated_key {
        out.push(stmt(id, &vocab::prov::USED, key, id));
    }
    if let Some(description) = &event.description {
        out.push(stmt(id, &vocab::dcterms::DESCRIPTION, Literal::string(description.clone()), id));
    }
    out.push(stmt(id, &vocab::prov::STARTED_AT_TIME, Literal::date_time(event.start_time), id));
    out.push(stmt(id, &vocab::prov::ENDED_AT_TIME, Literal::date_time(event.end_time), id));
    if let Some(progenitor) = &event.lineage_progenitor {
        out.push(stmt(id, &vocab::rmap::LINEAGE_PROGENITOR, progenitor, id));
    }

    for created in event.detail.created() {
        out.push(stmt(id, &vocab::prov::GENERATED, created, id));
    }
    match &event.detail {
        EventDetail::Creation { .. } => {}
        EventDetail::Update { inactivated, derived, .. } => {
            out.push(stmt(id, &vocab::rmap::INACTIVATED_OBJECT, inactivated, id));
            out.push(stmt(id, &vocab::rmap::DERIVED_OBJECT, derived, id));
        }
        EventDetail::Derivation { source, derived, .. } => {
            out.push(stmt(id, &vocab::rmap::HAS_SOURCE_OBJECT, source, id));
            out.push(stmt(id, &vocab::rmap::DERIVED_OBJECT, derived, id));
        }
        EventDetail::Inactivation { inactivated } => {
            out.push(stmt(id, &vocab::rmap::INACTIVATED_OBJECT, inactivated, id));
        }
        EventDetail::Tombstone { tombstoned } => {
            out.push(stmt(id, &vocab::rmap::TOMBSTONED_OBJECT, tombstoned, id));
        }
        EventDetail::Deletion { deleted } => {
            out.push(stmt(id, &vocab::rmap::DELETED_OBJECT, deleted, id));
        }
        EventDetail::UpdateWithReplace { updated } => {
            out.push(stmt(id, &vocab::rmap::UPDATED_OBJECT, updated, id));
        }
    }
    out
}

fn required<T>(value: Option<T>, field: &str) -> RmapResult<T> {
    value.ok_or_else(|| RmapError::defective(format!("Event is missing {}", field)))
}

fn non_empty(ids: Vec<Iri>, field: &str) -> RmapResult<Vec<Iri>> {
    if ids.is_empty() {
        return Err(RmapError::defective(format!("Event is missing {}", field)));
    }
    Ok(ids)
}

fn iri_object(s: &Statement) -> RmapResult<Iri> {
    s.object.as_iri().cloned().ok_or_else(|| {
        RmapError::defective(format!("object of <{}> must be an IRI", s.predicate))
    })
}

fn time_object(s: &Statement) -> RmapResult<DateTime<Utc>> {
    s.object
        .as_literal()
        .and_then(Literal::as_date_time)
        .ok_or_else(|| {
            RmapError::defective(format!("object of <{}> must be a timestamp", s.predicate))
        })
}
