//! Vocabulary terms used in persisted graphs

use once_cell::sync::Lazy;

use crate::term::Iri;

fn term(ns: &str, local: &str) -> Iri {
    Iri::from_trusted(format!("{}{}", ns, local))
}

/// RMap ontology
pub mod rmap {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://purl.org/ontology/rmap#";

    /// Class of DiSCOs
    pub static DISCO: Lazy<Iri> = Lazy::new(|| term(NS, "DiSCO"));
    /// Class of Agents
    pub static AGENT: Lazy<Iri> = Lazy::new(|| term(NS, "Agent"));
    /// Class of Events
    pub static EVENT: Lazy<Iri> = Lazy::new(|| term(NS, "Event"));

    pub static EVENT_TYPE: Lazy<Iri> = Lazy::new(|| term(NS, "eventType"));
    pub static EVENT_TARGET_TYPE: Lazy<Iri> = Lazy::new(|| term(NS, "eventTargetType"));

    pub static CREATION: Lazy<Iri> = Lazy::new(|| term(NS, "creation"));
    pub static UPDATE: Lazy<Iri> = Lazy::new(|| term(NS, "update"));
    pub static INACTIVATION: Lazy<Iri> = Lazy::new(|| term(NS, "inactivation"));
    pub static DERIVATION: Lazy<Iri> = Lazy::new(|| term(NS, "derivation"));
    pub static TOMBSTONE: Lazy<Iri> = Lazy::new(|| term(NS, "tombstone"));
    pub static DELETION: Lazy<Iri> = Lazy::new(|| term(NS, "deletion"));
    pub static REPLACE: Lazy<Iri> = Lazy::new(|| term(NS, "replace"));

    pub static HAS_SOURCE_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "hasSourceObject"));
    pub static DERIVED_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "derivedObject"));
    pub static INACTIVATED_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "inactivatedObject"));
    pub static TOMBSTONED_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "tombstonedObject"));
    pub static DELETED_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "deletedObject"));
    pub static UPDATED_OBJECT: Lazy<Iri> = Lazy::new(|| term(NS, "updatedObject"));
    pub static LINEAGE_PROGENITOR: Lazy<Iri> = Lazy::new(|| term(NS, "lineageProgenitor"));

    pub static IDENTITY_PROVIDER: Lazy<Iri> = Lazy::new(|| term(NS, "identityProvider"));
    pub static USER_AUTH_ID: Lazy<Iri> = Lazy::new(|| term(NS, "userAuthId"));
    pub static PROVIDER_ID: Lazy<Iri> = Lazy::new(|| term(NS, "providerId"));
}

/// W3C PROV-O
pub mod prov {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/prov#";

    pub static GENERATED: Lazy<Iri> = Lazy::new(|| term(NS, "generated"));
    pub static WAS_ASSOCIATED_WITH: Lazy<Iri> = Lazy::new(|| term(NS, "wasAssociatedWith"));
    pub static STARTED_AT_TIME: Lazy<Iri> = Lazy::new(|| term(NS, "startedAtTime"));
    pub static ENDED_AT_TIME: Lazy<Iri> = Lazy::new(|| term(NS, "endedAtTime"));
    pub static USED: Lazy<Iri> = Lazy::new(|| term(NS, "used"));
    pub static WAS_GENERATED_BY: Lazy<Iri> = Lazy::new(|| term(NS, "wasGeneratedBy"));
}

/// OAI-ORE
pub mod ore {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://www.openarchives.org/ore/terms/";

    pub static AGGREGATES: Lazy<Iri> = Lazy::new(|| term(NS, "aggregates"));
}

/// DCMI terms
pub mod dcterms {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub static CREATOR: Lazy<Iri> = Lazy::new(|| term(NS, "creator"));
    pub static DESCRIPTION: Lazy<Iri> = Lazy::new(|| term(NS, "description"));
}

/// Dublin Core elements
pub mod dc {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";

    pub static DESCRIPTION: Lazy<Iri> = Lazy::new(|| term(NS, "description"));
}

/// FOAF
pub mod foaf {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";

    pub static NAME: Lazy<Iri> = Lazy::new(|| term(NS, "name"));
}

/// RDF
pub mod rdf {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    pub static TYPE: Lazy<Iri> = Lazy::new(|| term(NS, "type"));
}

/// XML Schema datatypes
pub mod xsd {
    use super::*;

    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub static DATE_TIME: Lazy<Iri> = Lazy::new(|| term(NS, "dateTime"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_namespaced() {
        assert_eq!(rmap::DISCO.as_str(), "http://purl.org/ontology/rmap#DiSCO");
        assert_eq!(prov::GENERATED.as_str(), "http://www.w3.org/ns/prov#generated");
        assert_eq!(
            rdf::TYPE.as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
        );
        assert_ne!(*dc::DESCRIPTION, *dcterms::DESCRIPTION);
    }
}
