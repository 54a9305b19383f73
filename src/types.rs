//! Public types for the RMap API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Domain model
// ============================================================================

pub use rmap_core::{Agent, Disco, Event, EventDetail, EventType, ObjectType, Status, TargetType};

// Terms
pub use rmap_core::{BlankNode, Iri, Literal, Resource, Statement, Term, Triple};

// Requests and paging
pub use rmap_core::{
    DateRange, OrderBy, RequestEventDetails, ResultBatch, SearchParams, StatusFilter,
};

// Errors and configuration
pub use rmap_core::{ErrorKind, RmapConfig, RmapError, RmapResult};

// ============================================================================
// Pluggable collaborators
// ============================================================================

pub use rmap_engine::{
    DiscoView, EventSink, IdService, JsonLinesEventSink, NoopEventSink, PublishHandle,
    RandomIdService, UuidIdService,
};
pub use rmap_storage::{MemoryTripleStore, TripleStore};
