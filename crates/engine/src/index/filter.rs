//! Filters and paging shared by every listing query.

use rustc_hash::FxHashSet;
use std::hash::Hash;

use rmap_core::{vocab, Iri, OrderBy, ResultBatch, RmapResult, SearchParams, StatusFilter};

use crate::events::EventStore;

/// True when the derived status of `id` passes `filter`
pub(crate) fn status_matches(events: &EventStore, id: &Iri, filter: StatusFilter) -> RmapResult<bool> {
    let deleted = events.is_referenced(&vocab::rmap::DELETED_OBJECT, id)?;
    if filter == StatusFilter::Deleted {
        return Ok(deleted);
    }
    if deleted {
        return Ok(false);
    }
    let tombstoned = events.is_referenced(&vocab::rmap::TOMBSTONED_OBJECT, id)?;
    match filter {
        StatusFilter::Tombstoned => Ok(tombstoned),
        StatusFilter::All => Ok(!tombstoned),
        _ if tombstoned => Ok(false),
        StatusFilter::Active => Ok(!events.is_referenced(&vocab::rmap::INACTIVATED_OBJECT, id)?),
        StatusFilter::Inactive => events.is_referenced(&vocab::rmap::INACTIVATED_OBJECT, id),
        StatusFilter::Deleted => Ok(false),
    }
}

/// True when some event that generated `id` passes the agent and date filters
pub(crate) fn generation_matches(events: &EventStore, id: &Iri, params: &SearchParams) -> RmapResult<bool> {
    let agents = params.system_agents();
    let range = params.date_range();
    if agents.is_empty() && range.is_unbounded() {
        return Ok(true);
    }
    for event in events.generating_events(id)? {
        if !agents.is_empty() && !agents.contains(&events.associated_agent(&event)?) {
            continue;
        }
        if !range.is_unbounded() && !range.contains(&events.start_time(&event)?) {
            continue;
        }
        return Ok(true);
    }
    Ok(false)
}

/// Status, agent and date filters together
pub(crate) fn object_matches(events: &EventStore, id: &Iri, params: &SearchParams) -> RmapResult<bool> {
    Ok(status_matches(events, id, params.status())? && generation_matches(events, id, params)?)
}

/// Agent and date filters applied to an event itself
pub(crate) fn event_matches(events: &EventStore, id: &Iri, params: &SearchParams) -> RmapResult<bool> {
    let agents = params.system_agents();
    if !agents.is_empty() && !agents.contains(&events.associated_agent(id)?) {
        return Ok(false);
    }
    let range = params.date_range();
    Ok(range.is_unbounded() || range.contains(&events.start_time(id)?))
}

/// Drop duplicates, keeping first occurrences, and sort under `SelectOrder`
pub(crate) fn ordered<T: Ord + Hash + Clone>(rows: Vec<T>, order_by: OrderBy) -> Vec<T> {
    let mut seen = FxHashSet::default();
    let mut rows: Vec<T> = rows.into_iter().filter(|r| seen.insert(r.clone())).collect();
    if order_by == OrderBy::SelectOrder {
        rows.sort();
    }
    rows
}

/// Filter candidates lazily and cut one page
///
/// Stops evaluating `keep` once `offset + limit + 1` rows passed, which is
/// all the page needs to decide `has_next`.
pub(crate) fn page_filtered<T, F>(candidates: Vec<T>, params: &SearchParams, mut keep: F) -> RmapResult<ResultBatch<T>>
where
    T: Ord + Hash + Clone,
    F: FnMut(&T) -> RmapResult<bool>,
{
    let wanted = params.offset().saturating_add(params.limit()).saturating_add(1);
    let mut kept = Vec::new();
    for row in ordered(candidates, params.order_by()) {
        if kept.len() == wanted {
            break;
        }
        if keep(&row)? {
            kept.push(row);
        }
    }
    Ok(params.page(kept))
}
