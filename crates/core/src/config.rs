//! Engine configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```ignore
//! use rmap_core::RmapConfig;
//!
//! let config = RmapConfig::new()
//!     .admin_agent(admin_iri)
//!     .query_limits(50, 100);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{RmapError, RmapResult};
use crate::model::request::{
    OrderBy, SearchParams, StatusFilter, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT,
};
use crate::term::Iri;

/// Provenance engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmapConfig {
    /// Agent granted administrator rights over every DiSCO
    #[serde(default)]
    pub admin_agent_id: Option<Iri>,

    /// Page size used when a search does not set one
    #[serde(default = "default_query_limit")]
    pub default_query_limit: usize,

    /// Largest page size a search may request
    #[serde(default = "max_query_limit")]
    pub max_query_limit: usize,

    #[serde(default = "default_status_filter")]
    pub default_status_filter: StatusFilter,

    #[serde(default = "default_order_by")]
    pub default_order_by: OrderBy,

    /// Bounded wait on event sink publication, in seconds
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,

    /// Prefix of ids minted by the random id service
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Exact length minted ids must have, when set
    #[serde(default)]
    pub id_length: Option<usize>,
}

fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

fn max_query_limit() -> usize {
    MAX_QUERY_LIMIT
}

fn default_status_filter() -> StatusFilter {
    StatusFilter::Active
}

fn default_order_by() -> OrderBy {
    OrderBy::SelectOrder
}

fn default_publish_timeout() -> u64 {
    30
}

fn default_id_prefix() -> String {
    "rmap:".to_string()
}

impl Default for RmapConfig {
    fn default() -> Self {
        RmapConfig {
            admin_agent_id: None,
            default_query_limit: default_query_limit(),
            max_query_limit: max_query_limit(),
            default_status_filter: default_status_filter(),
            default_order_by: default_order_by(),
            publish_timeout_secs: default_publish_timeout(),
            id_prefix: default_id_prefix(),
            id_length: None,
        }
    }
}

impl RmapConfig {
    /// Configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML configuration
    pub fn from_toml_str(text: &str) -> RmapResult<Self> {
        let config: RmapConfig = toml::from_str(text)
            .map_err(|e| RmapError::defective(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> RmapResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RmapError::defective(format!("cannot read configuration {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check limit consistency
    pub fn validate(&self) -> RmapResult<()> {
        if self.default_query_limit == 0 {
            return Err(RmapError::defective("default_query_limit must be positive"));
        }
        if self.max_query_limit < self.default_query_limit {
            return Err(RmapError::defective(format!(
                "max_query_limit ({}) is below default_query_limit ({})",
                self.max_query_limit, self.default_query_limit
            )));
        }
        if self.id_prefix.is_empty() {
            return Err(RmapError::defective("id_prefix cannot be empty"));
        }
        Ok(())
    }

    /// Set the administrator agent
    pub fn admin_agent(mut self, agent: Iri) -> Self {
        self.admin_agent_id = Some(agent);
        self
    }

    /// Set the default and maximum page sizes
    pub fn query_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.default_query_limit = default_limit;
        self.max_query_limit = max_limit;
        self
    }

    /// Set the event sink publication timeout
    pub fn publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the minted id prefix
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn publish_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }

    /// Fresh search parameters carrying this configuration's defaults
    pub fn search_params(&self) -> SearchParams {
        SearchParams::new(
            self.default_query_limit,
            self.max_query_limit,
            self.default_status_filter,
            self.default_order_by,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = RmapConfig::default();
        assert_eq!(c.default_query_limit, 200);
        assert_eq!(c.max_query_limit, 500);
        assert_eq!(c.publish_timeout_duration(), Duration::from_secs(30));
        assert_eq!(c.id_prefix, "rmap:");
        assert!(c.admin_agent_id.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let c = RmapConfig::from_toml_str(
            r#"
            admin_agent_id = "rmap:admin"
            default_query_limit = 10
            max_query_limit = 20
            default_status_filter = "All"
            "#,
        )
        .unwrap();
        assert_eq!(c.admin_agent_id.as_ref().map(Iri::as_str), Some("rmap:admin"));
        assert_eq!(c.search_params().limit(), 10);
        assert_eq!(c.search_params().status(), StatusFilter::All);
        assert_eq!(c.default_order_by, OrderBy::SelectOrder);
    }

    #[test]
    fn rejects_inconsistent_limits() {
        let err = RmapConfig::from_toml_str("default_query_limit = 50\nmax_query_limit = 5")
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DefectiveArgument);
        assert!(RmapConfig::from_toml_str("admin_agent_id = \"\"").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "publish_timeout_secs = 5\nid_prefix = \"ark:/1234/\"").unwrap();
        let c = RmapConfig::load(file.path()).unwrap();
        assert_eq!(c.publish_timeout_duration(), Duration::from_secs(5));
        assert_eq!(c.id_prefix, "ark:/1234/");
        assert!(RmapConfig::load("/nonexistent/rmap.toml").is_err());
    }
}
