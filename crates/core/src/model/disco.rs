use serde::{Deserialize, Serialize};

use crate::term::{Iri, Term, Triple};

/// Distributed Scholarly Compound Object
///
/// An immutable aggregation of resources plus statements relating them. The
/// id doubles as the named-graph context of every statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disco {
    pub id: Iri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Term>,
    /// Caller's own external id for the DiSCO
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov_generated_by: Option<Iri>,
    /// Non-empty, in submission order
    pub aggregated_resources: Vec<Iri>,
    #[serde(default)]
    pub related_statements: Vec<Triple>,
}

impl Disco {
    /// A DiSCO with only its id and aggregated resources
    pub fn new(id: Iri, aggregated_resources: Vec<Iri>) -> Self {
        Disco {
            id,
            creator: None,
            description: None,
            provider_id: None,
            prov_generated_by: None,
            aggregated_resources,
            related_statements: Vec::new(),
        }
    }

    pub fn with_creator(mut self, creator: Iri) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn with_description(mut self, description: impl Into<Term>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_related(mut self, statements: Vec<Triple>) -> Self {
        self.related_statements = statements;
        self
    }
}
