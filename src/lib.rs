//! RMap: an event-sourced provenance store for DiSCOs, Agents and Events.
//!
//! This crate re-exports the workspace crates behind one import path:
//! - [`rmap_core`]: terms, domain model, errors and configuration
//! - [`rmap_storage`]: the triple store interface and in-memory backend
//! - [`rmap_engine`]: the provenance engine and its [`RmapService`] facade

pub mod types;

pub use rmap_core;
pub use rmap_engine;
pub use rmap_storage;

pub use rmap_engine::RmapService;
pub use types::*;
