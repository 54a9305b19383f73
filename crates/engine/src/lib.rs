//! Provenance engine for RMap
//!
//! This crate implements the event-sourced object model:
//! - Event Store: append-only log every status is derived from
//! - Agent Registry: identities that assert and initiate
//! - DiSCO Store: create, update, derive, tombstone and delete aggregations
//! - Lineage Index: version history and cross-lineage derivations
//! - Resource and Statement indexes: filtered, paged listings
//!
//! All components are stateless facades over one [`TripleStore`] connection.
//! [`RmapService`] wires them together.
//!
//! [`TripleStore`]: rmap_storage::TripleStore

#![warn(clippy::all)]

pub mod adapter;
pub mod agents;
pub mod discos;
pub mod events;
pub mod ids;
pub mod index;
pub mod lineage;
mod objects;
pub mod service;
pub mod sink;
pub mod txn;

pub use agents::AgentRegistry;
pub use discos::{DiscoStore, DiscoView};
pub use events::EventStore;
pub use ids::{IdService, RandomIdService, UuidIdService};
pub use index::{ResourceIndex, StatementIndex};
pub use lineage::LineageIndex;
pub use service::RmapService;
pub use sink::{EventSink, JsonLinesEventSink, NoopEventSink, PublishHandle};
pub use txn::in_transaction;
