//! Conditional-requirement references and cycle detection.
//!
//! Each conditional requirement is an edge `field -> depends_on`. Edges that
//! point at unknown fields or at the field itself are reported separately
//! and left out of the graph, so the cycle search only sees real cycles.

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::field::FieldSchema;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

pub(super) fn validate_dependencies(fields: &FieldSchema, errors: &mut Vec<SchemaError>) {
    let mut order: Vec<&str> = Vec::new();
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for f in &fields.fields {
        if !adj.contains_key(f.field_id.as_str()) {
            order.push(f.field_id.as_str());
            adj.insert(f.field_id.as_str(), Vec::new());
        }
    }

    for (i, field) in fields.fields.iter().enumerate() {
        let Some(req) = &field.conditional_requirement else {
            continue;
        };
        let path = format!("fields[{}].conditional_requirement", i);
        let target = req.field_id.as_str();

        if target.trim().is_empty() {
            errors.push(SchemaError::EmptyIdentifier { path, what: "field" });
            continue;
        }
        if target == field.field_id {
            errors.push(SchemaError::SelfDependency {
                field_id: field.field_id.clone(),
            });
            continue;
        }
        let Some(target_def) = fields.get(target) else {
            errors.push(SchemaError::UnknownFieldReference {
                path,
                field_id: target.to_string(),
            });
            continue;
        };

        if let Some(options) = target_def.field_type.options() {
            let expected: Vec<&str> = match &req.expected_value {
                serde_json::Value::String(s) => vec![s.as_str()],
                serde_json::Value::Array(items) => {
                    items.iter().filter_map(|v| v.as_str()).collect()
                }
                _ => Vec::new(),
            };
            for value in expected {
                if !options.is_empty() && !options.iter().any(|o| o.value == value) {
                    errors.push(SchemaError::ConditionalValueNotAnOption {
                        field_id: field.field_id.clone(),
                        depends_on: target.to_string(),
                        expected: format!("'{}'", value),
                    });
                }
            }
        }

        if let Some(edges) = adj.get_mut(field.field_id.as_str()) {
            edges.push(target);
        }
    }

    for cycle in find_cycles(&order, &adj) {
        errors.push(SchemaError::DependencyCycle { cycle });
    }
}

/// Depth-first search with an explicit stack. Every distinct cycle is
/// returned once, as a closed path starting from its smallest id
/// (`a -> b -> c -> a`).
fn find_cycles(order: &[&str], adj: &HashMap<&str, Vec<&str>>) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = order.iter().map(|&n| (n, Mark::Unvisited)).collect();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut cycles = Vec::new();
    let empty: Vec<&str> = Vec::new();

    for &root in order {
        if marks.get(root) != Some(&Mark::Unvisited) {
            continue;
        }
        // (node, index of next neighbor to visit)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::OnStack);

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let neighbors = adj.get(node).unwrap_or(&empty);
            if top.1 >= neighbors.len() {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            }
            let neighbor = neighbors[top.1];
            top.1 += 1;

            match marks.get(neighbor).copied().unwrap_or(Mark::Done) {
                Mark::Unvisited => {
                    marks.insert(neighbor, Mark::OnStack);
                    stack.push((neighbor, 0));
                }
                Mark::OnStack => {
                    let start = stack.iter().position(|(n, _)| *n == neighbor).unwrap_or(0);
                    let members: Vec<&str> = stack[start..].iter().map(|(n, _)| *n).collect();
                    let cycle = canonical_cycle(&members);
                    if seen.insert(cycle.clone()) {
                        cycles.push(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
    }
    cycles
}

/// Rotate so the smallest id leads, then close the path.
fn canonical_cycle(members: &[&str]) -> Vec<String> {
    let pivot = members
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut out: Vec<String> = members[pivot..]
        .iter()
        .chain(members[..pivot].iter())
        .map(|s| s.to_string())
        .collect();
    if let Some(first) = out.first().cloned() {
        out.push(first);
    }
    out
}
