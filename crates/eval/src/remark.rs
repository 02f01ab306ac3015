//! Remark resolution.
//!
//! Order: the indicator's remark for the exact status, then its default
//! remark, then the configured generic template. A `None` status always
//! uses the "pending" template.

use assay_core::{IndicatorDefinition, IndicatorStatus};

use crate::config::RemarkTemplates;

pub fn resolve_remark(
    status: Option<IndicatorStatus>,
    definition: &IndicatorDefinition,
    templates: &RemarkTemplates,
) -> String {
    if let Some(authored) = status.and_then(|s| definition.remarks.lookup(s)) {
        return authored.to_string();
    }
    render_template(templates.for_status(status), &definition.code, &definition.name)
}

/// Substitute `{code}` and `{name}`. A blank name also drops one space
/// next to its placeholder; the rest of the template is left as authored.
pub fn render_template(template: &str, code: &str, name: &str) -> String {
    let named = if name.trim().is_empty() {
        template
            .replace(" {name}", "")
            .replace("{name} ", "")
            .replace("{name}", "")
    } else {
        template.replace("{name}", name)
    };
    named.replace("{code}", code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(remarks: serde_json::Value) -> IndicatorDefinition {
        serde_json::from_value(json!({
            "code": "1.1.1",
            "name": "Posting of budget",
            "scoring": {"mode": "checklist", "items": [{"id": "a", "label": "Posted"}]},
            "remarks": remarks
        }))
        .unwrap()
    }

    #[test]
    fn authored_remark_wins() {
        let def = definition(json!({"status_remarks": {"PASS": "Budget posted on time"}}));
        let templates = RemarkTemplates::default();
        assert_eq!(
            resolve_remark(Some(IndicatorStatus::Pass), &def, &templates),
            "Budget posted on time"
        );
        assert_eq!(
            resolve_remark(Some(IndicatorStatus::Fail), &def, &templates),
            "1.1.1 Posting of budget: requirements not met"
        );
    }

    #[test]
    fn pending_ignores_authored_default() {
        let def = definition(json!({"default_remark": "See notes"}));
        let templates = RemarkTemplates::default();
        assert_eq!(
            resolve_remark(Some(IndicatorStatus::Conditional), &def, &templates),
            "See notes"
        );
        assert_eq!(
            resolve_remark(None, &def, &templates),
            "1.1.1 Posting of budget: not yet evaluated"
        );
    }

    #[test]
    fn blank_name_drops_its_gap_only() {
        assert_eq!(render_template("{code} {name}: ok", "2.1", ""), "2.1: ok");
        assert_eq!(render_template("{name} ({code})", "2.1", "  "), "(2.1)");
        assert_eq!(
            render_template("{code} {name}:\n  see  notes", "2.1", ""),
            "2.1:\n  see  notes"
        );
        assert_eq!(render_template("[{code}] {name}", "2.1", "Budget"), "[2.1] Budget");
    }
}
