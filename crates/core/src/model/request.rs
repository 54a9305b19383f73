//! Request context and search parameters
//!
//! [`RequestEventDetails`] accompanies every mutating call. [`SearchParams`]
//! carries the filters, ordering and paging of read queries, and
//! [`ResultBatch`] is the page handed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{RmapError, RmapResult};
use crate::term::Iri;

/// Built-in default page size
pub const DEFAULT_QUERY_LIMIT: usize = 200;
/// Built-in maximum page size
pub const MAX_QUERY_LIMIT: usize = 500;

/// Who is making a mutating request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEventDetails {
    /// Agent on whose behalf the request is made
    pub system_agent: Iri,
    /// API key or similar credential used, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_key_id: Option<Iri>,
    /// Free-text note recorded on the resulting event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequestEventDetails {
    pub fn new(system_agent: Iri) -> Self {
        RequestEventDetails {
            system_agent,
            agent_key_id: None,
            description: None,
        }
    }

    pub fn with_key(mut self, key: Iri) -> Self {
        self.agent_key_id = Some(key);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Status restriction applied to read queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Not inactivated, tombstoned or deleted
    Active,
    /// Inactivated, but neither tombstoned nor deleted
    Inactive,
    /// Tombstoned but not deleted
    Tombstoned,
    /// Deleted
    Deleted,
    /// Active or inactive; never tombstoned or deleted
    All,
}

impl FromStr for StatusFilter {
    type Err = RmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            "tombstoned" => Ok(StatusFilter::Tombstoned),
            "deleted" => Ok(StatusFilter::Deleted),
            "all" => Ok(StatusFilter::All),
            other => Err(RmapError::defective(format!(
                "unrecognized status filter {:?}",
                other
            ))),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderBy {
    /// Deterministic order by the selected values
    SelectOrder,
    /// Whatever order the store yields
    Unordered,
}

/// Inclusive date range on event start time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Self {
        DateRange { from, until }
    }

    /// True when `t` lies within the range
    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| *t >= from) && self.until.map_or(true, |until| *t <= until)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }
}

/// Filters, ordering and paging for read queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    date_range: DateRange,
    status: StatusFilter,
    system_agents: BTreeSet<Iri>,
    limit: Option<usize>,
    offset: usize,
    order_by: OrderBy,
    exclude_iris: bool,
    exclude_literals: bool,
    exclude_types: bool,
    default_limit: usize,
    max_limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams::new(
            DEFAULT_QUERY_LIMIT,
            MAX_QUERY_LIMIT,
            StatusFilter::Active,
            OrderBy::SelectOrder,
        )
    }
}

impl SearchParams {
    /// Parameters with the given defaults and nothing else set
    pub fn new(
        default_limit: usize,
        max_limit: usize,
        status: StatusFilter,
        order_by: OrderBy,
    ) -> Self {
        SearchParams {
            date_range: DateRange::default(),
            status,
            system_agents: BTreeSet::new(),
            limit: None,
            offset: 0,
            order_by,
            exclude_iris: false,
            exclude_literals: false,
            exclude_types: false,
            default_limit,
            max_limit,
        }
    }

    /// Page size; the configured default when unset
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(self.default_limit)
    }

    /// Set page size; must be in `1..=max_limit`
    pub fn set_limit(&mut self, limit: usize) -> RmapResult<()> {
        if limit == 0 || limit > self.max_limit {
            return Err(RmapError::defective(format!(
                "limit must be between 1 and {}, got {}",
                self.max_limit, limit
            )));
        }
        self.limit = Some(limit);
        Ok(())
    }

    /// Parse and set page size from request text
    pub fn set_limit_str(&mut self, limit: &str) -> RmapResult<()> {
        let n = limit
            .trim()
            .parse::<usize>()
            .map_err(|_| RmapError::defective(format!("limit {:?} is not a number", limit)))?;
        self.set_limit(n)
    }

    /// Zero-based position of the first row
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Parse and set the offset from request text; negative values are rejected
    pub fn set_offset_str(&mut self, offset: &str) -> RmapResult<()> {
        let n = offset
            .trim()
            .parse::<i64>()
            .map_err(|_| RmapError::defective(format!("offset {:?} is not a number", offset)))?;
        let n = usize::try_from(n)
            .map_err(|_| RmapError::defective("offset must be zero or greater"))?;
        self.offset = n;
        Ok(())
    }

    /// Set offset from a one-based page number and the current limit
    pub fn set_offset_by_page(&mut self, page: usize) -> RmapResult<()> {
        if page == 0 {
            return Err(RmapError::defective("page number must be 1 or greater"));
        }
        self.offset = (page - 1)
            .checked_mul(self.limit())
            .ok_or_else(|| RmapError::defective(format!("page number {} is out of range", page)))?;
        Ok(())
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Allow-list of asserting agents; empty means any agent
    pub fn system_agents(&self) -> &BTreeSet<Iri> {
        &self.system_agents
    }

    pub fn add_system_agent(&mut self, agent: Iri) {
        self.system_agents.insert(agent);
    }

    /// Replace the agent allow-list from a comma separated list of IRIs
    pub fn set_system_agents_csv(&mut self, csv: &str) -> RmapResult<()> {
        let mut agents = BTreeSet::new();
        for part in csv.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            agents.insert(Iri::new(part)?);
        }
        self.system_agents = agents;
        Ok(())
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.order_by = order_by;
    }

    pub fn exclude_iris(&self) -> bool {
        self.exclude_iris
    }

    pub fn exclude_literals(&self) -> bool {
        self.exclude_literals
    }

    /// True when `rdf:type` statements are excluded from triple results
    pub fn exclude_types(&self) -> bool {
        self.exclude_types
    }

    /// Set object-type exclusions for triple queries
    ///
    /// Excluding both IRIs and literals would leave nothing to return.
    pub fn set_exclusions(
        &mut self,
        exclude_iris: bool,
        exclude_literals: bool,
        exclude_types: bool,
    ) -> RmapResult<()> {
        if exclude_iris && exclude_literals {
            return Err(RmapError::defective(
                "cannot exclude both IRIs and literals from results",
            ));
        }
        self.exclude_iris = exclude_iris;
        self.exclude_literals = exclude_literals;
        self.exclude_types = exclude_types;
        Ok(())
    }

    /// Cut one page out of the full row set
    ///
    /// Skips `offset` rows, takes `limit + 1`, and lets [`ResultBatch`]
    /// decide whether a next page exists.
    pub fn page<T>(&self, rows: impl IntoIterator<Item = T>) -> ResultBatch<T> {
        let limit = self.limit();
        let fetched: Vec<T> = rows.into_iter().skip(self.offset).take(limit.saturating_add(1)).collect();
        ResultBatch::from_fetched(fetched, limit, self.offset)
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBatch<T> {
    pub results: Vec<T>,
    pub has_next: bool,
    /// One-based position of the first result
    pub start_position: usize,
}

impl<T> ResultBatch<T> {
    /// Build a page from a `limit + 1` fetch
    pub fn from_fetched(mut fetched: Vec<T>, limit: usize, offset: usize) -> Self {
        let has_next = fetched.len() > limit;
        if has_next {
            fetched.truncate(limit);
        }
        ResultBatch {
            results: fetched,
            has_next,
            start_position: offset.saturating_add(1),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.start_position > 1
    }

    /// One-based position of the last result; 0 when empty
    pub fn end_position(&self) -> usize {
        if self.results.is_empty() {
            0
        } else {
            self.start_position + self.results.len() - 1
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn limit_bounds() {
        let mut p = SearchParams::default();
        assert_eq!(p.limit(), DEFAULT_QUERY_LIMIT);
        assert!(p.set_limit(0).is_err());
        assert!(p.set_limit(MAX_QUERY_LIMIT + 1).is_err());
        p.set_limit(10).unwrap();
        assert_eq!(p.limit(), 10);
        assert!(p.set_limit_str("abc").is_err());
    }

    #[test]
    fn offset_validation() {
        let mut p = SearchParams::default();
        assert!(p.set_offset_str("-1").is_err());
        p.set_offset_str(" 5 ").unwrap();
        assert_eq!(p.offset(), 5);
        p.set_limit(20).unwrap();
        p.set_offset_by_page(3).unwrap();
        assert_eq!(p.offset(), 40);
        assert!(p.set_offset_by_page(0).is_err());
    }

    #[test]
    fn huge_page_number_is_rejected() {
        let mut p = SearchParams::default();
        p.set_limit(20).unwrap();
        let err = p.set_offset_by_page(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
        // offset untouched by the failed call
        assert_eq!(p.offset(), 0);

        p.set_offset(usize::MAX);
        let batch = p.page(vec![1, 2, 3]);
        assert!(batch.results.is_empty());
        assert!(!batch.has_next);
    }

    #[test]
    fn exclusions_conflict() {
        let mut p = SearchParams::default();
        assert!(p.set_exclusions(true, true, false).is_err());
        p.set_exclusions(false, true, true).unwrap();
        assert!(p.exclude_literals() && p.exclude_types());
    }

    #[test]
    fn agents_csv() {
        let mut p = SearchParams::default();
        p.set_system_agents_csv("rmap:a, rmap:b,,").unwrap();
        assert_eq!(p.system_agents().len(), 2);
        assert!(p.set_system_agents_csv("rmap:a, bad iri").is_err());
    }

    #[test]
    fn status_filter_parse() {
        assert_eq!("ACTIVE".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert_eq!(" all ".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!("gone".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn date_range_inclusive() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let r = DateRange::new(Some(t), Some(t));
        assert!(r.contains(&t));
        assert!(!r.contains(&(t + chrono::Duration::seconds(1))));
        assert!(DateRange::default().contains(&t));
    }

    #[test]
    fn batch_positions() {
        let mut p = SearchParams::default();
        p.set_limit(2).unwrap();
        p.set_offset(2);
        let batch = p.page(vec![1, 2, 3, 4, 5]);
        assert_eq!(batch.results, vec![3, 4]);
        assert!(batch.has_next);
        assert!(batch.has_previous());
        assert_eq!(batch.start_position, 3);
        assert_eq!(batch.end_position(), 4);

        p.set_offset(4);
        let last = p.page(vec![1, 2, 3, 4, 5]);
        assert_eq!(last.results, vec![5]);
        assert!(!last.has_next);

        p.set_offset(10);
        assert_eq!(p.page(vec![1, 2, 3]).end_position(), 0);
    }

    proptest! {
        #[test]
        fn page_never_exceeds_limit(total in 0usize..60, limit in 1usize..20, offset in 0usize..70) {
            let mut p = SearchParams::default();
            p.set_limit(limit).unwrap();
            p.set_offset(offset);
            let batch = p.page(0..total);
            prop_assert!(batch.len() <= limit);
            let remaining = total.saturating_sub(offset);
            prop_assert_eq!(batch.has_next, remaining > limit);
            prop_assert_eq!(batch.len(), remaining.min(limit));
        }
    }
}
