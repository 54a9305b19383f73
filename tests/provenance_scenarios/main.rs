//! Provenance Scenario Test Suite
//!
//! End-to-end scenarios against the public `rmapdb` API.
//!
//! ## Test Areas
//!
//! - **Agents**: registration, field replacement, requester validation
//! - **DiSCOs**: lifecycle, lineage, version navigation
//! - **Queries**: resource and statement listings with filters
//! - **Plumbing**: configuration files, event sinks, id services
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test provenance_scenarios
//! ```

// Test modules
mod test_utils;

mod agents;
mod discos;
mod plumbing;
mod queries;
