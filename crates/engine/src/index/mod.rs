//! Listing queries: which objects touch a resource or hold a triple.
//!
//! Every listing takes [`SearchParams`](rmap_core::SearchParams) and returns
//! one page as a [`ResultBatch`](rmap_core::ResultBatch). Candidates are
//! gathered from the store, ordered, then filtered lazily until the page
//! plus one extra row is filled.

pub(crate) mod filter;
mod resources;
mod statements;

pub use resources::ResourceIndex;
pub use statements::StatementIndex;

use rmap_core::{Iri, RmapResult};

use crate::events::EventStore;

/// Agents associated with the events that generated `id`
pub(crate) fn generating_agents(events: &EventStore, id: &Iri) -> RmapResult<Vec<Iri>> {
    events
        .generating_events(id)?
        .iter()
        .map(|event| events.associated_agent(event))
        .collect()
}
