//! Area aggregation: roll indicator statuses up to one governance-area
//! verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use assay_core::IndicatorStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaResult {
    Passed,
    Failed,
}

impl AreaResult {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaResult::Passed => "Passed",
            AreaResult::Failed => "Failed",
        }
    }
}

impl fmt::Display for AreaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any `FAIL` fails the area. Otherwise the area passes only if at least
/// one indicator was evaluated; no evidence at all is `Failed`.
pub fn aggregate<I>(statuses: I) -> AreaResult
where
    I: IntoIterator<Item = Option<IndicatorStatus>>,
{
    let mut evaluated = false;
    for status in statuses {
        match status {
            Some(IndicatorStatus::Fail) => return AreaResult::Failed,
            Some(IndicatorStatus::Pass | IndicatorStatus::Conditional) => evaluated = true,
            None => {}
        }
    }
    if evaluated {
        AreaResult::Passed
    } else {
        AreaResult::Failed
    }
}

/// Aggregate raw status labels as stored by callers. A label that is not a
/// known status makes the area `Failed`.
pub fn aggregate_labels<'a, I>(labels: I) -> AreaResult
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut statuses = Vec::new();
    for label in labels {
        match label {
            None => statuses.push(None),
            Some(raw) => match IndicatorStatus::parse(raw) {
                Some(status) => statuses.push(Some(status)),
                None => {
                    tracing::debug!(label = raw, "unrecognized status label in area");
                    return AreaResult::Failed;
                }
            },
        }
    }
    aggregate(statuses)
}
