use serde::{Deserialize, Serialize};

use crate::term::Iri;

/// Identity that asserts DiSCOs and initiates events
///
/// All fields are required; there are no partial agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Iri,
    /// Display name (`foaf:name`)
    pub name: String,
    /// Identity provider that authenticated the agent
    pub id_provider: Iri,
    /// Id of the agent at its identity provider
    pub auth_id: Iri,
}

impl Agent {
    pub fn new(id: Iri, name: impl Into<String>, id_provider: Iri, auth_id: Iri) -> Self {
        Agent {
            id,
            name: name.into(),
            id_provider,
            auth_id,
        }
    }
}
