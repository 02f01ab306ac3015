//! Checklist status calculator.
//!
//! Reduces resolved per-item outcomes to an indicator status using the
//! indicator's validation strategy:
//!
//! 1. `info_text` items are dropped from all counting.
//! 2. No gradable items left: not yet evaluable (`None`).
//! 3. Indicators in the Physical/Financial override set pass iff the
//!    Physical Report or the Financial Report item is met; the strategy is
//!    ignored for them. Report items are found by exact normalized label
//!    (canonical label or a configured alias).
//! 4. Otherwise the strategy decides from the met/unmet/unknown tally.
//!    Absent data never counts as met.

use serde::Serialize;

use assay_core::{ChecklistItem, IndicatorStatus, ItemOutcome, ValidationStrategy};

use crate::config::PhysicalFinancialOverride;

/// One checklist item with its resolved outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResult {
    pub item: ChecklistItem,
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn new(item: ChecklistItem, outcome: ItemOutcome) -> Self {
        ItemResult { item, outcome }
    }
}

/// Outcome counts over gradable items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub met: usize,
    pub unmet: usize,
    pub unknown: usize,
}

impl OutcomeTally {
    pub fn total(&self) -> usize {
        self.met + self.unmet + self.unknown
    }

    fn add(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Met => self.met += 1,
            ItemOutcome::Unmet => self.unmet += 1,
            ItemOutcome::Unknown => self.unknown += 1,
        }
    }
}

/// Per-item entry exposed to display and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemBreakdown {
    pub item_id: String,
    pub outcome: ItemOutcome,
}

/// Status plus the data it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistStatus {
    pub status: Option<IndicatorStatus>,
    pub tally: OutcomeTally,
    pub breakdown: Vec<ItemBreakdown>,
}

/// Compute an indicator status from checklist item outcomes.
pub fn calculate_status(
    results: &[ItemResult],
    strategy: &ValidationStrategy,
    indicator_code: &str,
    overrides: &PhysicalFinancialOverride,
) -> ChecklistStatus {
    let gradable: Vec<&ItemResult> = results
        .iter()
        .filter(|r| r.item.item_type.is_gradable())
        .collect();

    let mut tally = OutcomeTally::default();
    for r in &gradable {
        tally.add(r.outcome);
    }
    let breakdown = gradable
        .iter()
        .map(|r| ItemBreakdown {
            item_id: r.item.id.clone(),
            outcome: r.outcome,
        })
        .collect();

    let status = if gradable.is_empty() {
        None
    } else if overrides.applies_to(indicator_code) {
        Some(physical_financial_status(&gradable, overrides))
    } else {
        Some(apply_strategy(strategy, &tally, indicator_code))
    };

    ChecklistStatus {
        status,
        tally,
        breakdown,
    }
}

/// Apply a named strategy to a non-empty tally.
pub fn apply_strategy(
    strategy: &ValidationStrategy,
    tally: &OutcomeTally,
    indicator_code: &str,
) -> IndicatorStatus {
    match strategy {
        ValidationStrategy::AllItemsRequired => all_required(tally),
        ValidationStrategy::AnyItemRequired
        | ValidationStrategy::OrLogicAtLeast1Required
        // Evaluated exactly like "any": no mandatory shared item is enforced.
        | ValidationStrategy::SharedPlusOrLogic => at_least_one(tally),
        ValidationStrategy::Unrecognized(name) => {
            tracing::warn!(
                indicator = indicator_code,
                strategy = %name,
                "unrecognized validation strategy; applying ALL_ITEMS_REQUIRED"
            );
            all_required(tally)
        }
    }
}

fn all_required(tally: &OutcomeTally) -> IndicatorStatus {
    if tally.unmet == 0 && tally.met == tally.total() {
        IndicatorStatus::Pass
    } else {
        IndicatorStatus::Fail
    }
}

fn at_least_one(tally: &OutcomeTally) -> IndicatorStatus {
    if tally.met >= 1 {
        IndicatorStatus::Pass
    } else {
        IndicatorStatus::Fail
    }
}

fn physical_financial_status(
    gradable: &[&ItemResult],
    overrides: &PhysicalFinancialOverride,
) -> IndicatorStatus {
    let reports: Vec<String> = overrides.report_labels().map(normalize_label).collect();

    let either_met = gradable.iter().any(|r| {
        r.outcome == ItemOutcome::Met && reports.contains(&normalize_label(&r.item.label))
    });

    if either_met {
        IndicatorStatus::Pass
    } else {
        IndicatorStatus::Fail
    }
}

// ──────────────────────────────────────────────
// Label normalization
// ──────────────────────────────────────────────

/// Lower-case, collapse whitespace and drop a leading enumeration marker
/// such as `a)`, `(b)`, `1.` or `ii)`.
pub fn normalize_label(label: &str) -> String {
    let trimmed = strip_enumeration(label.trim());
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_enumeration(label: &str) -> &str {
    let body = label.strip_prefix('(').unwrap_or(label);
    let marker_len = body
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    // Markers are short: a letter, a roman numeral or a small number.
    if marker_len == 0 || marker_len > 4 {
        return label;
    }
    let rest = &body[marker_len..];
    match rest.strip_prefix(')').or_else(|| rest.strip_prefix('.')) {
        Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => {
            after.trim_start()
        }
        _ => label,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
