//! Identifier minting.

use rand::distributions::Alphanumeric;
use rand::Rng;

use rmap_core::{Iri, RmapConfig, RmapError, RmapResult};

const RANDOM_ID_LENGTH: usize = 10;

/// Mints globally unique, never reused object ids
pub trait IdService: Send + Sync {
    fn create_id(&self) -> RmapResult<Iri>;

    /// True when `id` has the shape this service mints
    fn is_valid_id(&self, id: &Iri) -> bool;
}

/// `<prefix><10 lowercase alphanumerics>`
#[derive(Debug, Clone)]
pub struct RandomIdService {
    prefix: String,
    length: Option<usize>,
}

impl RandomIdService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            length: None,
        }
    }

    /// Prefix and optional length check from configuration
    pub fn from_config(config: &RmapConfig) -> Self {
        Self {
            prefix: config.id_prefix.clone(),
            length: config.id_length,
        }
    }

    /// Require minted ids to have exactly `length` characters
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
}

impl Default for RandomIdService {
    fn default() -> Self {
        Self::new("rmap:")
    }
}

impl IdService for RandomIdService {
    fn create_id(&self) -> RmapResult<Iri> {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_ID_LENGTH)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        let id = Iri::new(format!("{}{}", self.prefix, suffix))?;
        if !self.is_valid_id(&id) {
            return Err(RmapError::internal(format!(
                "minted id {} failed validation",
                id
            )));
        }
        Ok(id)
    }

    fn is_valid_id(&self, id: &Iri) -> bool {
        id.as_str().starts_with(&self.prefix)
            && self.length.map_or(true, |len| id.as_str().len() == len)
    }
}

/// `urn:uuid:<v4>`
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdService;

impl IdService for UuidIdService {
    fn create_id(&self) -> RmapResult<Iri> {
        Iri::new(uuid::Uuid::new_v4().urn().to_string())
    }

    fn is_valid_id(&self, id: &Iri) -> bool {
        id.as_str()
            .strip_prefix("urn:uuid:")
            .map_or(false, |u| uuid::Uuid::parse_str(u).is_ok())
    }
}
