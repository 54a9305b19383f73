//! Object types and derived status

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::term::Iri;
use crate::vocab;

/// Kind of RMap object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// Aggregation of resources
    Disco,
    /// Asserting identity
    Agent,
    /// Lifecycle record
    Event,
}

impl ObjectType {
    /// The `rdf:type` class IRI for this object type
    pub fn class_iri(&self) -> &'static Iri {
        match self {
            ObjectType::Disco => &vocab::rmap::DISCO,
            ObjectType::Agent => &vocab::rmap::AGENT,
            ObjectType::Event => &vocab::rmap::EVENT,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Disco => "DiSCO",
            ObjectType::Agent => "Agent",
            ObjectType::Event => "Event",
        })
    }
}

/// Status derived from the event log
///
/// Never persisted. DiSCOs can be in any of these states; Agents are never
/// `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
    Tombstoned,
    Deleted,
}

impl Status {
    /// True for statuses that block further updates
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Active)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
            Status::Tombstoned => "TOMBSTONED",
            Status::Deleted => "DELETED",
        })
    }
}
