//! Result cache.
//!
//! Indicator results are derived values. The cache is keyed so that a
//! changed response or a changed schema can never hit a stale entry: the
//! key carries a SHA-256 fingerprint of the definition's canonical JSON and
//! one of the submission's. The authored version is kept for invalidation
//! and logging only; an edit that keeps the version still changes the key.
//!
//! Caches are constructed by the caller and passed in explicitly.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use sha2::{Digest, Sha256};

use assay_core::IndicatorDefinition;

use crate::engine::{IndicatorResult, Submission};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache lock poisoned")]
    Poisoned,
    #[error("could not fingerprint cache key: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub indicator_code: String,
    pub schema_version: u32,
    pub schema_fingerprint: String,
    pub response_id: String,
    pub fingerprint: String,
}

impl CacheKey {
    pub fn new(
        definition: &IndicatorDefinition,
        response_id: &str,
        submission: &Submission,
    ) -> Result<Self, CacheError> {
        Ok(CacheKey {
            indicator_code: definition.code.clone(),
            schema_version: definition.version,
            schema_fingerprint: fingerprint(definition)?,
            response_id: response_id.to_string(),
            fingerprint: fingerprint(submission)?,
        })
    }
}

/// Hex SHA-256 of a value serialized as JSON. The model and submission
/// types only use ordered maps, so equal values always produce equal
/// fingerprints.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> Result<String, CacheError> {
    let bytes = serde_json::to_vec(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Storage for derived indicator results.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<IndicatorResult>, CacheError>;

    fn put(&self, key: CacheKey, result: IndicatorResult) -> Result<(), CacheError>;

    /// Drop every entry for an indicator, across versions and responses.
    fn invalidate_indicator(&self, indicator_code: &str) -> Result<usize, CacheError>;

    /// Drop every entry for one response, across indicators.
    fn invalidate_response(&self, response_id: &str) -> Result<usize, CacheError>;

    /// Drop every entry for one (indicator, response) pair, whatever schema
    /// or submission fingerprint it was stored under.
    fn invalidate_entry(&self, indicator_code: &str, response_id: &str)
        -> Result<usize, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

/// Process-local cache backed by a `RwLock`-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<CacheKey, IndicatorResult>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        InMemoryResultCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain<F>(&self, keep: F) -> Result<usize, CacheError>
    where
        F: Fn(&CacheKey) -> bool,
    {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|k, _| keep(k));
        Ok(before - entries.len())
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &CacheKey) -> Result<Option<IndicatorResult>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: CacheKey, result: IndicatorResult) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key, result);
        Ok(())
    }

    fn invalidate_indicator(&self, indicator_code: &str) -> Result<usize, CacheError> {
        self.retain(|k| k.indicator_code != indicator_code)
    }

    fn invalidate_response(&self, response_id: &str) -> Result<usize, CacheError> {
        self.retain(|k| k.response_id != response_id)
    }

    fn invalidate_entry(
        &self,
        indicator_code: &str,
        response_id: &str,
    ) -> Result<usize, CacheError> {
        self.retain(|k| !(k.indicator_code == indicator_code && k.response_id == response_id))
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}
