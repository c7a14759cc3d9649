//! Frozen-structure diff between a skeleton snapshot and an enriched copy.

use crate::issue::{child_path, field_path, sentence_path, ValidationIssue};
use gloss_protocol::FROZEN_FIELDS;
use serde_json::Value;

/// Compares every frozen field node by node, including child counts.
/// Enrichment may add or change anything else.
pub fn validate_frozen_structure(skeleton: &Value, enriched: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let (Some(before), Some(after)) = (skeleton.as_object(), enriched.as_object()) else {
        issues.push(ValidationIssue::new("$", "both snapshots must be objects keyed by sentence text"));
        return issues;
    };

    for key in before.keys() {
        if !after.contains_key(key) {
            issues.push(ValidationIssue::new(sentence_path(key), "sentence missing from enriched document"));
        }
    }
    for key in after.keys() {
        if !before.contains_key(key) {
            issues.push(ValidationIssue::new(sentence_path(key), "sentence not present in skeleton"));
        }
    }

    for (key, original) in before {
        if let Some(current) = after.get(key) {
            compare_node(&sentence_path(key), original, current, &mut issues);
        }
    }
    issues
}

fn compare_node(path: &str, original: &Value, current: &Value, issues: &mut Vec<ValidationIssue>) {
    for field in FROZEN_FIELDS {
        let before = original.get(field);
        let after = current.get(field);
        if before != after {
            issues.push(ValidationIssue::new(
                field_path(path, field),
                format!("frozen field changed: {} -> {}", describe(before), describe(after)),
            ));
        }
    }

    let empty = Vec::new();
    let before = children(original).unwrap_or(&empty);
    let after = children(current).unwrap_or(&empty);
    if before.len() != after.len() {
        issues.push(ValidationIssue::new(
            field_path(path, "linguistic_elements"),
            format!("child count changed: {} -> {}", before.len(), after.len()),
        ));
    }
    for (i, (original, current)) in before.iter().zip(after).enumerate() {
        compare_node(&child_path(path, i), original, current, issues);
    }
}

fn children(node: &Value) -> Option<&Vec<Value>> {
    node.get("linguistic_elements").and_then(Value::as_array)
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<absent>".to_string(),
    }
}
