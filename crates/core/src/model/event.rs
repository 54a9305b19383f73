//! Event records
//!
//! An [`Event`] is an immutable record of one state change. The variant data
//! lives in [`EventDetail`]; the event type is derived from it so the two can
//! never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::request::RequestEventDetails;
use crate::term::Iri;
use crate::vocab;

/// Kind of state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Creation,
    Update,
    UpdateWithReplace,
    Derivation,
    Inactivation,
    Tombstone,
    Deletion,
}

impl EventType {
    /// Vocabulary term persisted as the `rmap:eventType` object
    pub fn iri(&self) -> &'static Iri {
        match self {
            EventType::Creation => &vocab::rmap::CREATION,
            EventType::Update => &vocab::rmap::UPDATE,
            EventType::UpdateWithReplace => &vocab::rmap::REPLACE,
            EventType::Derivation => &vocab::rmap::DERIVATION,
            EventType::Inactivation => &vocab::rmap::INACTIVATION,
            EventType::Tombstone => &vocab::rmap::TOMBSTONE,
            EventType::Deletion => &vocab::rmap::DELETION,
        }
    }

    /// Inverse of [`EventType::iri`]
    pub fn from_iri(iri: &Iri) -> Option<Self> {
        [
            EventType::Creation,
            EventType::Update,
            EventType::UpdateWithReplace,
            EventType::Derivation,
            EventType::Inactivation,
            EventType::Tombstone,
            EventType::Deletion,
        ]
        .into_iter()
        .find(|t| t.iri() == iri)
    }

    /// True for the event types that generate a new object
    pub fn creates_objects(&self) -> bool {
        matches!(
            self,
            EventType::Creation | EventType::Update | EventType::Derivation
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventType::Creation => "creation",
            EventType::Update => "update",
            EventType::UpdateWithReplace => "replace",
            EventType::Derivation => "derivation",
            EventType::Inactivation => "inactivation",
            EventType::Tombstone => "tombstone",
            EventType::Deletion => "deletion",
        })
    }
}

/// Kind of object an event acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    Disco,
    Agent,
}

impl TargetType {
    /// Vocabulary term persisted as the `rmap:eventTargetType` object
    pub fn iri(&self) -> &'static Iri {
        match self {
            TargetType::Disco => &vocab::rmap::DISCO,
            TargetType::Agent => &vocab::rmap::AGENT,
        }
    }

    /// Inverse of [`TargetType::iri`]
    pub fn from_iri(iri: &Iri) -> Option<Self> {
        if iri == &*vocab::rmap::DISCO {
            Some(TargetType::Disco)
        } else if iri == &*vocab::rmap::AGENT {
            Some(TargetType::Agent)
        } else {
            None
        }
    }
}

/// Variant-specific event fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetail {
    Creation {
        created: Vec<Iri>,
    },
    /// Same-creator update: `inactivated` is superseded by `derived`
    Update {
        created: Vec<Iri>,
        inactivated: Iri,
        derived: Iri,
    },
    /// In-place replacement of an Agent's fields
    UpdateWithReplace {
        updated: Iri,
    },
    /// Different-creator fork: `derived` starts a new lineage from `source`
    Derivation {
        created: Vec<Iri>,
        source: Iri,
        derived: Iri,
    },
    Inactivation {
        inactivated: Iri,
    },
    Tombstone {
        tombstoned: Iri,
    },
    Deletion {
        deleted: Iri,
    },
}

impl EventDetail {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetail::Creation { .. } => EventType::Creation,
            EventDetail::Update { .. } => EventType::Update,
            EventDetail::UpdateWithReplace { .. } => EventType::UpdateWithReplace,
            EventDetail::Derivation { .. } => EventType::Derivation,
            EventDetail::Inactivation { .. } => EventType::Inactivation,
            EventDetail::Tombstone { .. } => EventType::Tombstone,
            EventDetail::Deletion { .. } => EventType::Deletion,
        }
    }

    /// Ids generated by this event; empty for non-creating events
    pub fn created(&self) -> &[Iri] {
        match self {
            EventDetail::Creation { created }
            | EventDetail::Update { created, .. }
            | EventDetail::Derivation { created, .. } => created,
            _ => &[],
        }
    }
}

/// Immutable record of one state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Iri,
    pub target_type: TargetType,
    pub associated_agent: Iri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_key: Option<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage_progenitor: Option<Iri>,
    pub detail: EventDetail,
}

impl Event {
    /// Start an event on behalf of a requester
    ///
    /// `end_time` starts equal to `start_time`; the event store stamps the
    /// final end time when the event is appended.
    pub fn begin(
        id: Iri,
        target_type: TargetType,
        requester: &RequestEventDetails,
        detail: EventDetail,
    ) -> Self {
        let now = Utc::now();
        Event {
            id,
            target_type,
            associated_agent: requester.system_agent.clone(),
            associated_key: requester.agent_key_id.clone(),
            description: requester.description.clone(),
            start_time: now,
            end_time: now,
            lineage_progenitor: None,
            detail,
        }
    }

    pub fn with_progenitor(mut self, progenitor: Iri) -> Self {
        self.lineage_progenitor = Some(progenitor);
        self
    }

    pub fn event_type(&self) -> EventType {
        self.detail.event_type()
    }
}
