//! Core types for the RMap provenance engine
//!
//! This crate holds everything the other crates share:
//! - [`term`]: IRIs, literals, triples and statements
//! - [`vocab`]: vocabulary terms used in persisted graphs
//! - [`model`]: Agents, DiSCOs, Events and request types
//! - [`error`]: the error taxonomy
//! - [`config`]: engine configuration

pub mod config;
pub mod error;
pub mod model;
pub mod term;
pub mod vocab;

pub use config::RmapConfig;
pub use error::{ErrorKind, RmapError, RmapResult};
pub use model::{
    Agent, DateRange, Disco, Event, EventDetail, EventType, ObjectType, OrderBy,
    RequestEventDetails, ResultBatch, SearchParams, Status, StatusFilter, TargetType,
};
pub use term::{BlankNode, Iri, Literal, Resource, Statement, Term, Triple};
