//! Checklist item checks.

use std::collections::HashSet;

use crate::checklist::ChecklistItem;
use crate::error::SchemaError;

pub(super) fn validate_items(items: &[ChecklistItem], errors: &mut Vec<SchemaError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            errors.push(SchemaError::EmptyIdentifier {
                path: format!("items[{}]", i),
                what: "checklist item",
            });
            continue;
        }
        if !seen.insert(item.id.as_str()) && reported.insert(item.id.as_str()) {
            errors.push(SchemaError::DuplicateChecklistItemId {
                item_id: item.id.clone(),
            });
        }
        if item.label.trim().is_empty() {
            errors.push(SchemaError::EmptyItemLabel {
                item_id: item.id.clone(),
            });
        }
    }

    if !items.iter().any(|i| i.item_type.is_gradable()) {
        errors.push(SchemaError::NoGradableItems);
    }
}
