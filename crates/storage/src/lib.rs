//! Storage layer for the RMap provenance engine
//!
//! - [`TripleStore`]: the transactional named-graph store interface
//! - [`PatternQuery`]: conjunctive quad-pattern queries over any store
//! - [`MemoryTripleStore`]: in-memory implementation

pub mod memory;
pub mod query;
pub mod store;

pub use memory::MemoryTripleStore;
pub use query::{bound_iri, var, Bindings, PatternQuery, QuadPattern, Slot};
pub use store::{StatementPattern, TripleStore};
