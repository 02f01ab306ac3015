//! Remark schema: status-to-text lookup authored with an indicator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::IndicatorStatus;

/// Human-readable remark text per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemarkSchema {
    #[serde(default)]
    pub status_remarks: BTreeMap<IndicatorStatus, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_remark: Option<String>,
}

impl RemarkSchema {
    /// Authored remark for a status: the exact key first, then the
    /// schema-wide default. Blank entries count as absent.
    pub fn lookup(&self, status: IndicatorStatus) -> Option<&str> {
        self.status_remarks
            .get(&status)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.default_remark
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
    }
}
