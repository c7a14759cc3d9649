//! Pure validators for annotated documents: the structural contract and the
//! frozen-skeleton diff. Both report every violation; the `ensure_*`
//! helpers turn a non-empty report into a hard error.

pub mod contract;
pub mod frozen;
pub mod issue;
pub mod snapshot;

pub use contract::validate_contract;
pub use frozen::validate_frozen_structure;
pub use issue::ValidationIssue;
pub use snapshot::FrozenSkeleton;

use gloss_protocol::{Document, ValidationMode};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("document violates the {} contract ({} issues):{}", mode.as_str(), issues.len(), list(issues))]
    Invalid {
        mode: ValidationMode,
        issues: Vec<ValidationIssue>,
    },
    #[error("enrichment changed frozen structure ({} issues):{}", issues.len(), list(issues))]
    FrozenViolation { issues: Vec<ValidationIssue> },
    #[error("document could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ContractError {
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ContractError::Invalid { issues, .. } | ContractError::FrozenViolation { issues } => issues,
            ContractError::Serialize(_) => &[],
        }
    }
}

fn list(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|issue| format!("\n  {issue}")).collect()
}

pub fn ensure_contract(document: &Value, mode: ValidationMode) -> Result<(), ContractError> {
    let issues = validate_contract(document, mode);
    if issues.is_empty() {
        Ok(())
    } else {
        log::warn!("{} contract violations", issues.len());
        Err(ContractError::Invalid { mode, issues })
    }
}

pub fn ensure_frozen(skeleton: &Value, enriched: &Value) -> Result<(), ContractError> {
    let issues = validate_frozen_structure(skeleton, enriched);
    if issues.is_empty() {
        Ok(())
    } else {
        log::warn!("{} frozen-structure violations", issues.len());
        Err(ContractError::FrozenViolation { issues })
    }
}

/// Typed entry point: serializes the document and checks its JSON form.
pub fn validate_document(document: &Document, mode: ValidationMode) -> Result<Vec<ValidationIssue>, ContractError> {
    let value = serde_json::to_value(document)?;
    Ok(validate_contract(&value, mode))
}

pub fn ensure_document(document: &Document, mode: ValidationMode) -> Result<(), ContractError> {
    ensure_contract(&serde_json::to_value(document)?, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::fixtures;
    use gloss_skeleton::SkeletonBuilder;
    use gloss_templates::{NoteAssigner, TemplateRegistry};
    use proptest::prelude::*;
    use serde_json::json;

    const MODAL: &str = "She should have trusted her instincts.";

    fn skeleton() -> Document {
        SkeletonBuilder::new().build_document(&fixtures::all()).unwrap()
    }

    fn enriched() -> Document {
        let mut document = skeleton();
        gloss_tam::annotate_document(&mut document, &fixtures::all());
        let registry = TemplateRegistry::standard();
        NoteAssigner::new(&registry).annotate_document(&mut document);
        document
    }

    fn enriched_value() -> Value {
        serde_json::to_value(enriched()).unwrap()
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_pipeline_output_is_valid_in_both_modes() {
        let document = enriched_value();
        assert_eq!(messages(&validate_contract(&document, ValidationMode::V2Strict)), Vec::<String>::new());
        assert!(validate_contract(&document, ValidationMode::V1).is_empty());
        assert!(validate_document(&skeleton(), ValidationMode::V2Strict).unwrap().is_empty());
    }

    #[test]
    fn test_single_word_phrase_is_rejected() {
        let mut document = enriched_value();
        let phrase = &mut document[MODAL]["linguistic_elements"][1];
        phrase["linguistic_elements"].as_array_mut().unwrap().truncate(1);

        let issues = validate_contract(&document, ValidationMode::V1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, format!("[{MODAL:?}].linguistic_elements[1]"));
        assert!(issues[0].message.contains("at least 2 Word children"));
    }

    #[test]
    fn test_string_null_only_tolerated_in_v1() {
        let mut document = enriched_value();
        document[MODAL]["linguistic_elements"][0]["linguistic_elements"][0]["voice"] = json!("null");

        assert!(validate_contract(&document, ValidationMode::V1).is_empty());
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.ends_with(".linguistic_elements[0].linguistic_elements[0].voice"));
    }

    #[test]
    fn test_strict_vocabulary() {
        let mut document = enriched_value();
        document[MODAL]["aspect"] = json!("perfective");
        document[MODAL]["tense"] = json!("past perfect");
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert!(messages(&issues).iter().any(|m| m.contains("unknown aspect value \"perfective\"")));
        assert!(!messages(&issues).iter().any(|m| m.contains("unknown tense")));

        document[MODAL]["tense"] = json!("pluperfect");
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert!(messages(&issues).iter().any(|m| m.contains("unknown tense value")));
    }

    #[test]
    fn test_modal_perfect_is_biconditional_in_strict_mode() {
        let mut document = enriched_value();
        document[MODAL]["tam_construction"] = json!("past_perfect");
        assert!(validate_contract(&document, ValidationMode::V1).is_empty());
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, format!("[{MODAL:?}].tam_construction"));

        let mut document = enriched_value();
        document[MODAL]["tense"] = json!("past");
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("requires mood=modal"));
    }

    #[test]
    fn test_strict_requires_identity_fields() {
        let mut document = enriched_value();
        let word = document[MODAL]["linguistic_elements"][0]["linguistic_elements"][2]
            .as_object_mut()
            .unwrap();
        word.remove("grammatical_role");
        word.remove("schema_version");

        assert!(validate_contract(&document, ValidationMode::V1).is_empty());
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_wrong_schema_version() {
        let mut document = enriched_value();
        document[MODAL]["schema_version"] = json!("v1");
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues[0].path, format!("[{MODAL:?}].schema_version"));
        assert!(validate_contract(&document, ValidationMode::V1).is_empty());
    }

    #[test]
    fn test_id_rules() {
        let mut document = enriched_value();
        let first_id = document[MODAL]["node_id"].clone();
        let word = &mut document[MODAL]["linguistic_elements"][0]["linguistic_elements"][0];
        word["node_id"] = first_id;
        let issues = validate_contract(&document, ValidationMode::V1);
        assert!(messages(&issues).iter().any(|m| m.contains("duplicate node_id")));
        assert!(!messages(&issues).iter().any(|m| m.contains("parent_id must equal")));

        let mut document = enriched_value();
        document[MODAL]["linguistic_elements"][0]["parent_id"] = json!(9999);
        let issues = validate_contract(&document, ValidationMode::V1);
        assert!(issues[0].message.starts_with("parent_id must equal the parent's node_id"));

        let mut document = enriched_value();
        let word = &mut document[MODAL]["linguistic_elements"][0]["linguistic_elements"][0];
        word["head_id"] = word["node_id"].clone();
        let issues = validate_contract(&document, ValidationMode::V1);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("own node_id"));
    }

    #[test]
    fn test_reference_integrity() {
        let mut document = enriched_value();
        let word = &mut document[MODAL]["linguistic_elements"][1]["linguistic_elements"][0];
        assert!(word["ref_node_id"].is_u64());
        word["ref_node_id"] = json!(424242);
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("names no node"));

        let word = &mut document[MODAL]["linguistic_elements"][1]["linguistic_elements"][0];
        word["ref_node_id"] = word["node_id"].clone();
        let issues = validate_contract(&document, ValidationMode::V2Strict);
        assert!(issues[0].message.contains("must not point at the node itself"));
    }

    #[test]
    fn test_key_must_equal_content() {
        let mut document = enriched_value();
        document[MODAL]["content"] = json!("She should have trusted him.");
        let issues = validate_contract(&document, ValidationMode::V1);
        assert_eq!(issues[0].path, format!("[{MODAL:?}].content"));
    }

    #[test]
    fn test_span_bounds() {
        let mut document = enriched_value();
        document[MODAL]["linguistic_elements"][0]["source_span"] = json!({"start": 30, "end": 99});
        let issues = validate_contract(&document, ValidationMode::V1);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("<= 38"));
    }

    #[test]
    fn test_nesting_and_type_rules() {
        let mut document = enriched_value();
        let word = document[MODAL]["linguistic_elements"][0]["linguistic_elements"][0].clone();
        document[MODAL]["linguistic_elements"].as_array_mut().unwrap().push(word);
        let issues = validate_contract(&document, ValidationMode::V1);
        assert!(messages(&issues).iter().any(|m| m.contains("Sentence nodes may only contain Phrase children")));

        let mut document = enriched_value();
        document[MODAL]["linguistic_elements"][0]["type"] = json!("Clause");
        let issues = validate_contract(&document, ValidationMode::V1);
        assert!(issues[0].message.starts_with("type must be one of Sentence, Phrase, Word"));
    }

    #[test]
    fn test_optional_substructures() {
        let mut document = enriched_value();
        document[MODAL]["notes"][0]["confidence"] = json!(1.5);
        document[MODAL]["template_selection"]["level"] = json!("L5");
        document[MODAL]["backoff_summary"] = json!({"backoff_nodes": 1, "backoff_leaf_nodes": 2, "unique_backoff_spans": 1});
        document[MODAL]["rejected_candidate_stats"] = json!([{"text": "x", "count": 0, "reasons": []}]);
        let issues = validate_contract(&document, ValidationMode::V1);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        let root = format!("[{MODAL:?}]");
        assert_eq!(
            paths,
            vec![
                format!("{root}.notes[0]"),
                format!("{root}.template_selection"),
                format!("{root}.backoff_summary"),
                format!("{root}.rejected_candidate_stats[0]"),
            ]
        );
    }

    #[test]
    fn test_ensure_reports_every_issue() {
        let mut document = enriched_value();
        document[MODAL]["type"] = json!("Word");
        document[MODAL]["schema_version"] = json!("v3");
        let error = ensure_contract(&document, ValidationMode::V2Strict).unwrap_err();
        assert!(error.issues().len() >= 2);
        let text = error.to_string();
        assert!(text.starts_with("document violates the v2_strict contract"));
        for issue in error.issues() {
            assert!(text.contains(&issue.to_string()));
        }
    }

    #[test]
    fn test_frozen_copy_is_clean() {
        let skeleton = serde_json::to_value(skeleton()).unwrap();
        assert!(validate_frozen_structure(&skeleton, &skeleton.clone()).is_empty());
        assert!(ensure_frozen(&skeleton, &enriched_value()).is_ok());
    }

    #[test]
    fn test_frozen_change_is_located() {
        let skeleton = serde_json::to_value(skeleton()).unwrap();
        let mut enriched = enriched_value();
        enriched[MODAL]["linguistic_elements"][0]["linguistic_elements"][1]["content"] = json!("must");

        let issues = validate_frozen_structure(&skeleton, &enriched);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].path,
            format!("[{MODAL:?}].linguistic_elements[0].linguistic_elements[1].content")
        );
    }

    #[test]
    fn test_frozen_child_count_and_keys() {
        let skeleton = serde_json::to_value(skeleton()).unwrap();
        let mut enriched = skeleton.clone();
        enriched[MODAL]["linguistic_elements"].as_array_mut().unwrap().pop();
        enriched.as_object_mut().unwrap().insert("Extra.".to_string(), json!({}));

        let issues = validate_frozen_structure(&skeleton, &enriched);
        let messages = messages(&issues);
        assert!(messages.iter().any(|m| m.contains("sentence not present in skeleton")));
        assert!(messages.iter().any(|m| m.contains("child count changed: 2 -> 1")));
    }

    #[test]
    fn test_frozen_handle() {
        let skeleton = skeleton();
        let frozen = FrozenSkeleton::capture(&skeleton).unwrap();
        assert_eq!(frozen.sentence_count(), skeleton.len());

        let mut working = skeleton.clone();
        gloss_tam::annotate_document(&mut working, &fixtures::all());
        assert!(frozen.verify(&working).is_ok());

        if let Some(sentence) = working.get_mut(MODAL) {
            sentence.linguistic_elements[0].part_of_speech = "noun phrase".to_string();
        }
        match frozen.verify(&working) {
            Err(ContractError::FrozenViolation { issues }) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].path.ends_with(".linguistic_elements[0].part_of_speech"));
            }
            other => panic!("expected a frozen violation, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn test_any_frozen_content_change_fails_at_its_path(phrase in 0usize..2, word in 0usize..8, text in "[a-z]{1,8}") {
            let skeleton = serde_json::to_value(skeleton()).unwrap();
            let mut enriched = enriched_value();
            let words = enriched[MODAL]["linguistic_elements"][phrase]["linguistic_elements"].as_array_mut().unwrap();
            let word = word % words.len();
            let original = words[word]["content"].clone();
            prop_assume!(original.as_str() != Some(text.as_str()));
            words[word]["content"] = json!(text);

            let issues = validate_frozen_structure(&skeleton, &enriched);
            prop_assert_eq!(issues.len(), 1);
            let expected = format!("[{MODAL:?}].linguistic_elements[{phrase}].linguistic_elements[{word}].content");
            prop_assert_eq!(&issues[0].path, &expected);
        }
    }
}
