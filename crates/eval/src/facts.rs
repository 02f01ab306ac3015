//! Caller-supplied facts the evaluator must not compute itself.

use std::collections::BTreeMap;

use assay_core::BbiStatus;
use serde::{Deserialize, Serialize};

/// Pre-resolved external truths, keyed by subject id.
///
/// BBI functionality is computed from other indicators' results; the caller
/// resolves it before evaluation so no lookup ever happens inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    #[serde(default)]
    pub bbi: BTreeMap<String, BbiStatus>,
}

impl Facts {
    pub fn new() -> Self {
        Facts::default()
    }

    pub fn with_bbi(mut self, bbi_id: impl Into<String>, status: BbiStatus) -> Self {
        self.bbi.insert(bbi_id.into(), status);
        self
    }

    pub fn bbi_status(&self, bbi_id: &str) -> Option<BbiStatus> {
        self.bbi.get(bbi_id).copied()
    }
}
