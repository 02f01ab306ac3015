//! Caller-triggered recalculation over many responses.
//!
//! Each response is recomputed from scratch and independently of the
//! others, so a batch can be retried or split across workers freely.

use std::collections::BTreeMap;

use serde::Serialize;

use assay_core::{validate_indicator, IndicatorDefinition, IndicatorStatus, SchemaErrors};

use crate::cache::{CacheKey, ResultCache};
use crate::engine::{Engine, IndicatorResult, Submission};

/// Outcome of one recalculation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, IndicatorResult>,
    pub passed: usize,
    pub failed: usize,
    pub conditional: usize,
    pub not_evaluable: usize,
}

impl BatchReport {
    fn record(&mut self, response_id: &str, result: IndicatorResult) {
        match result.status {
            Some(IndicatorStatus::Pass) => self.passed += 1,
            Some(IndicatorStatus::Fail) => self.failed += 1,
            Some(IndicatorStatus::Conditional) => self.conditional += 1,
            None => self.not_evaluable += 1,
        }
        self.results.insert(response_id.to_string(), result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

pub struct Recalculator<'a> {
    engine: &'a Engine,
    cache: &'a dyn ResultCache,
}

impl<'a> Recalculator<'a> {
    pub fn new(engine: &'a Engine, cache: &'a dyn ResultCache) -> Self {
        Recalculator { engine, cache }
    }

    /// Re-evaluate every submission against `definition`.
    ///
    /// Existing cache entries for the indicator are dropped first and each
    /// fresh result is written back. Refuses to run on a definition that
    /// does not validate. Cache failures are logged and do not affect the
    /// report.
    pub fn recalculate(
        &self,
        definition: &IndicatorDefinition,
        submissions: &BTreeMap<String, Submission>,
    ) -> Result<BatchReport, SchemaErrors> {
        validate_indicator(definition)?;

        if let Err(e) = self.cache.invalidate_indicator(&definition.code) {
            tracing::warn!(indicator = %definition.code, error = %e, "cache invalidation failed");
        }

        let mut report = BatchReport::default();
        for (response_id, submission) in submissions {
            let result = self.engine.evaluate(definition, submission).into_result();
            self.store(definition, response_id, submission, &result);
            report.record(response_id, result);
        }

        tracing::info!(
            indicator = %definition.code,
            version = definition.version,
            total = report.total(),
            passed = report.passed,
            failed = report.failed,
            conditional = report.conditional,
            not_evaluable = report.not_evaluable,
            "recalculation complete"
        );
        Ok(report)
    }

    /// Cached result for one response, computing and storing it on a miss.
    pub fn evaluate_cached(
        &self,
        definition: &IndicatorDefinition,
        response_id: &str,
        submission: &Submission,
    ) -> IndicatorResult {
        let key = CacheKey::new(definition, response_id, submission);
        if let Ok(key) = &key {
            match self.cache.get(key) {
                Ok(Some(hit)) => return hit,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(indicator = %definition.code, error = %e, "cache read failed")
                }
            }
        }
        let result = self.engine.evaluate(definition, submission).into_result();
        self.store(definition, response_id, submission, &result);
        result
    }

    /// Replace whatever is cached for this (indicator, response) pair, so
    /// entries under superseded fingerprints do not accumulate.
    fn store(
        &self,
        definition: &IndicatorDefinition,
        response_id: &str,
        submission: &Submission,
        result: &IndicatorResult,
    ) {
        let stored = CacheKey::new(definition, response_id, submission).and_then(|key| {
            self.cache.invalidate_entry(&definition.code, response_id)?;
            self.cache.put(key, result.clone())
        });
        if let Err(e) = stored {
            tracing::warn!(
                indicator = %definition.code,
                response = response_id,
                error = %e,
                "cache write failed"
            );
        }
    }
}
