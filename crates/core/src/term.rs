//! RDF terms, triples and statements
//!
//! These are the neutral value types the domain layer works in:
//! - [`Iri`]: validated identifier
//! - [`BlankNode`]: graph-local identifier
//! - [`Literal`]: lexical value with optional datatype or language
//! - [`Resource`]: a subject position (IRI or blank node)
//! - [`Term`]: an object position (any of the above)
//! - [`Triple`] / [`Statement`]: a triple without / with its named-graph context

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RmapError, RmapResult};
use crate::vocab;

// =============================================================================
// Iri
// =============================================================================

/// Validated IRI
///
/// Non-empty and free of whitespace and the characters `<`, `>` and `"`.
/// No further syntax checking is done; ids minted by the id service such as
/// `rmap:abc123` are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(String);

impl Iri {
    /// Validate and wrap an IRI string
    pub fn new(value: impl Into<String>) -> RmapResult<Self> {
        let value = value.into();
        validate_iri(&value)?;
        Ok(Iri(value))
    }

    /// Wrap a string already known to be valid (vocabulary constants)
    pub(crate) fn from_trusted(value: String) -> Self {
        Iri(value)
    }

    /// The IRI as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate_iri(value: &str) -> RmapResult<()> {
    if value.trim().is_empty() {
        return Err(RmapError::defective("IRI cannot be empty"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
    {
        return Err(RmapError::defective(format!(
            "IRI {:?} contains illegal character {:?}",
            value, c
        )));
    }
    Ok(())
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Iri {
    type Err = RmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::new(s)
    }
}

impl TryFrom<String> for Iri {
    type Error = RmapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Iri::new(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// BlankNode / Literal
// =============================================================================

/// Blank node, identified by a label local to one submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankNode(String);

impl BlankNode {
    /// Create a blank node with the given label
    pub fn new(label: impl Into<String>) -> Self {
        BlankNode(label.into())
    }

    /// The blank node label
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Literal value
///
/// A literal carries at most one of `datatype` and `language`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form
    pub value: String,
    /// Datatype IRI, if typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Iri>,
    /// Language tag, if language-tagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal
    pub fn string(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Typed literal
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Literal {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Language-tagged literal
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// `xsd:dateTime` literal in RFC 3339 form, millisecond precision
    pub fn date_time(time: DateTime<Utc>) -> Self {
        Literal::typed(
            time.to_rfc3339_opts(SecondsFormat::Millis, true),
            vocab::xsd::DATE_TIME.clone(),
        )
    }

    /// Parse the lexical form as an RFC 3339 timestamp
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.value)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Resource / Term
// =============================================================================

/// A term allowed in subject position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    /// Named resource
    Iri(Iri),
    /// Anonymous resource
    Blank(BlankNode),
}

impl Resource {
    /// The IRI, if this is a named resource
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Resource::Iri(iri) => Some(iri),
            Resource::Blank(_) => None,
        }
    }

    /// The string value: IRI text or blank node label
    pub fn lexical(&self) -> &str {
        match self {
            Resource::Iri(iri) => iri.as_str(),
            Resource::Blank(b) => b.label(),
        }
    }
}

impl From<Iri> for Resource {
    fn from(iri: Iri) -> Self {
        Resource::Iri(iri)
    }
}

impl From<BlankNode> for Resource {
    fn from(b: BlankNode) -> Self {
        Resource::Blank(b)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => write!(f, "<{}>", iri),
            Resource::Blank(b) => b.fmt(f),
        }
    }
}

/// A term allowed in object position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// Named resource
    Iri(Iri),
    /// Anonymous resource
    Blank(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// The IRI, if this term is one
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this term is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// This term as a resource; `None` for literals
    pub fn as_resource(&self) -> Option<Resource> {
        match self {
            Term::Iri(iri) => Some(Resource::Iri(iri.clone())),
            Term::Blank(b) => Some(Resource::Blank(b.clone())),
            Term::Literal(_) => None,
        }
    }

    /// True for literals
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// The string value: IRI text, blank node label or literal lexical form
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::Blank(b) => b.label(),
            Term::Literal(l) => &l.value,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Term::Iri(iri.clone())
    }
}

impl From<Literal> for Term {
    fn from(l: Literal) -> Self {
        Term::Literal(l)
    }
}

impl From<BlankNode> for Term {
    fn from(b: BlankNode) -> Self {
        Term::Blank(b)
    }
}

impl From<Resource> for Term {
    fn from(r: Resource) -> Self {
        match r {
            Resource::Iri(iri) => Term::Iri(iri),
            Resource::Blank(b) => Term::Blank(b),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(b) => b.fmt(f),
            Term::Literal(l) => l.fmt(f),
        }
    }
}

// =============================================================================
// Triple / Statement
// =============================================================================

/// Subject-predicate-object triple with no context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject
    pub subject: Resource,
    /// Predicate
    pub predicate: Iri,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a triple
    pub fn new(subject: impl Into<Resource>, predicate: Iri, object: impl Into<Term>) -> Self {
        Triple {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Place this triple in a named graph
    pub fn in_context(self, context: &Iri) -> Statement {
        Statement {
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
            context: Some(context.clone()),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// Triple stored under an optional named-graph context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    /// Subject
    pub subject: Resource,
    /// Predicate
    pub predicate: Iri,
    /// Object
    pub object: Term,
    /// Named graph; `None` is the default graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Iri>,
}

impl Statement {
    /// Create a statement
    pub fn new(
        subject: impl Into<Resource>,
        predicate: Iri,
        object: impl Into<Term>,
        context: Option<Iri>,
    ) -> Self {
        Statement {
            subject: subject.into(),
            predicate,
            object: object.into(),
            context,
        }
    }

    /// The triple without its context
    pub fn triple(&self) -> Triple {
        Triple {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }

    /// True when the subject is the IRI naming this statement's context
    pub fn subject_is_context(&self) -> bool {
        match (&self.subject, &self.context) {
            (Resource::Iri(s), Some(c)) => s == c,
            _ => false,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.subject, self.predicate, self.object)?;
        match &self.context {
            Some(c) => write!(f, " <{}> .", c),
            None => f.write_str(" ."),
        }
    }
}
