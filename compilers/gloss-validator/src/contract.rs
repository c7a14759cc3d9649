//! Structural contract check over the JSON form of a document.

use crate::issue::{child_path, field_path, sentence_path, ValidationIssue};
use gloss_protocol::{NodeType, NoteKind, NoteSource, SelectionLevel, ValidationMode, SCHEMA_VERSION};
use serde_json::{Map, Value};
use std::collections::HashMap;

const REQUIRED_FIELDS: [&str; 11] = [
    "type",
    "content",
    "tense",
    "aspect",
    "mood",
    "voice",
    "finiteness",
    "tam_construction",
    "part_of_speech",
    "linguistic_notes",
    "linguistic_elements",
];

const STRICT_REQUIRED_FIELDS: [&str; 4] = ["node_id", "source_span", "grammatical_role", "schema_version"];

const TAM_FIELDS: [&str; 5] = ["tense", "aspect", "mood", "voice", "finiteness"];

const TENSES: [&str; 3] = ["past", "present", "future"];
const ASPECTS: [&str; 4] = ["simple", "perfect", "progressive", "perfect_progressive"];
const MOODS: [&str; 2] = ["indicative", "modal"];
const VOICES: [&str; 2] = ["active", "passive"];
const FINITENESS: [&str; 2] = ["finite", "non-finite"];

const STRING_LISTS: [&str; 4] = ["linguistic_notes", "quality_flags", "rejected_candidates", "reason_codes"];

fn is_legal_tense(value: &str) -> bool {
    match value.split_once(' ') {
        Some((tense, aspect)) => TENSES.contains(&tense) && ASPECTS.contains(&aspect),
        None => TENSES.contains(&value),
    }
}

fn vocabulary(field: &str) -> &'static [&'static str] {
    match field {
        "aspect" => &ASPECTS,
        "mood" => &MOODS,
        "voice" => &VOICES,
        "finiteness" => &FINITENESS,
        _ => &[],
    }
}

/// Checks a whole document and returns every violation found, in document
/// order. An empty list means the document is valid under `mode`.
pub fn validate_contract(document: &Value, mode: ValidationMode) -> Vec<ValidationIssue> {
    let mut checker = Checker::new(mode);
    match document.as_object() {
        Some(sentences) => {
            for (key, sentence) in sentences {
                checker.check_sentence(key, sentence);
            }
            checker.check_references();
        }
        None => checker.push("$", "document must be an object keyed by sentence text"),
    }
    checker.issues
}

struct Checker {
    mode: ValidationMode,
    issues: Vec<ValidationIssue>,
    ids: HashMap<u64, String>,
    references: Vec<(String, u64, Option<u64>)>,
}

impl Checker {
    fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            issues: Vec::new(),
            ids: HashMap::new(),
            references: Vec::new(),
        }
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    fn check_sentence(&mut self, key: &str, sentence: &Value) {
        let path = sentence_path(key);
        if let Some(content) = sentence.get("content").and_then(Value::as_str) {
            if content != key {
                self.push(field_path(&path, "content"), "sentence content must equal its document key");
            }
        }
        self.check_node(&path, sentence, None, &Value::Null, key.chars().count());
    }

    fn check_node(
        &mut self,
        path: &str,
        node: &Value,
        parent_type: Option<NodeType>,
        parent_id: &Value,
        sentence_len: usize,
    ) {
        let Some(obj) = node.as_object() else {
            self.push(path, "node must be an object");
            return;
        };

        for field in REQUIRED_FIELDS {
            if !obj.contains_key(field) {
                self.push(path, format!("missing required field `{field}`"));
            }
        }
        if self.mode.is_strict() {
            for field in STRICT_REQUIRED_FIELDS {
                if !obj.contains_key(field) {
                    self.push(path, format!("missing required field `{field}` ({})", self.mode.as_str()));
                }
            }
        }

        let node_type = self.check_type(path, obj, parent_type);
        self.check_tam(path, obj);
        if self.mode.is_strict() {
            self.check_modal_perfect(path, obj);
        }
        if let Some(content) = obj.get("content") {
            if !content.is_string() {
                self.push(field_path(path, "content"), "content must be a string");
            }
        }
        if let Some(construction) = obj.get("tam_construction") {
            if !construction.is_string() {
                self.push(field_path(path, "tam_construction"), "tam_construction must be a string");
            }
        }

        let own_id = self.check_ids(path, obj, parent_type, parent_id);
        self.check_span(path, obj, sentence_len);
        self.check_schema_version(path, obj);
        self.check_features(path, obj);
        for field in STRING_LISTS {
            if let Some(value) = obj.get(field) {
                if !is_string_list(value) {
                    self.push(field_path(path, field), format!("{field} must be a list of strings"));
                }
            }
        }
        if let Some(notes) = obj.get("notes") {
            self.check_notes(&field_path(path, "notes"), notes);
        }
        if let Some(selection) = obj.get("template_selection") {
            self.check_template_selection(&field_path(path, "template_selection"), selection);
        }
        if let Some(summary) = obj.get("backoff_summary") {
            self.check_backoff_summary(&field_path(path, "backoff_summary"), summary);
        }
        if let Some(stats) = obj.get("rejected_candidate_stats") {
            self.check_candidate_stats(&field_path(path, "rejected_candidate_stats"), stats);
        }

        let own_id_value = own_id.map(Value::from).unwrap_or(Value::Null);
        self.check_children(path, obj, node_type, &own_id_value, sentence_len);
    }

    fn check_type(&mut self, path: &str, obj: &Map<String, Value>, parent_type: Option<NodeType>) -> Option<NodeType> {
        let raw = obj.get("type")?;
        let Some(node_type) = raw.as_str().and_then(NodeType::parse) else {
            self.push(field_path(path, "type"), format!("type must be one of Sentence, Phrase, Word (got {raw})"));
            return None;
        };
        match parent_type {
            None if node_type != NodeType::Sentence => {
                self.push(field_path(path, "type"), "top-level nodes must be Sentence nodes");
            }
            Some(parent) if parent.child_type() != Some(node_type) => {
                let message = match parent.child_type() {
                    Some(child) => format!("{} nodes may only contain {} children", parent.as_str(), child.as_str()),
                    None => format!("{} nodes cannot contain children", parent.as_str()),
                };
                self.push(field_path(path, "type"), message);
            }
            _ => {}
        }
        Some(node_type)
    }

    fn check_tam(&mut self, path: &str, obj: &Map<String, Value>) {
        for field in TAM_FIELDS {
            let Some(value) = obj.get(field) else { continue };
            let at = field_path(path, field);
            match value {
                Value::Null => {}
                Value::String(text) if text == "null" => {
                    if self.mode.is_strict() {
                        self.push(at, format!("{field} must be null, not the string \"null\""));
                    }
                }
                Value::String(text) => {
                    if self.mode.is_strict() {
                        let legal = match field {
                            "tense" => is_legal_tense(text),
                            _ => vocabulary(field).contains(&text.as_str()),
                        };
                        if !legal {
                            self.push(at, format!("unknown {field} value {text:?}"));
                        }
                    }
                }
                other => self.push(at, format!("{field} must be a string or null (got {other})")),
            }
        }
    }

    /// mood=modal, perfect aspect and no tense <=> tam_construction="modal_perfect".
    fn check_modal_perfect(&mut self, path: &str, obj: &Map<String, Value>) {
        let text = |field: &str| obj.get(field).and_then(Value::as_str);
        let tense_absent = matches!(obj.get("tense"), None | Some(Value::Null));
        let shape = text("mood") == Some("modal")
            && matches!(text("aspect"), Some("perfect") | Some("perfect_progressive"))
            && tense_absent;
        let labelled = text("tam_construction") == Some("modal_perfect");
        if shape && !labelled {
            self.push(
                field_path(path, "tam_construction"),
                "modal + perfect with no tense must be labelled tam_construction=\"modal_perfect\"",
            );
        } else if labelled && !shape {
            self.push(
                field_path(path, "tam_construction"),
                "tam_construction=\"modal_perfect\" requires mood=modal, perfect aspect and null tense",
            );
        }
    }

    fn check_ids(
        &mut self,
        path: &str,
        obj: &Map<String, Value>,
        parent_type: Option<NodeType>,
        parent_id: &Value,
    ) -> Option<u64> {
        let own_id = match obj.get("node_id") {
            None => None,
            Some(value) => match value.as_u64() {
                Some(id) => {
                    match self.ids.get(&id) {
                        Some(first) => {
                            let message = format!("duplicate node_id {id} (first used at {first})");
                            self.push(field_path(path, "node_id"), message);
                        }
                        None => {
                            self.ids.insert(id, path.to_string());
                        }
                    }
                    Some(id)
                }
                None => {
                    self.push(field_path(path, "node_id"), "node_id must be a non-negative integer");
                    None
                }
            },
        };

        let declared = obj.get("parent_id");
        if declared.is_some() || self.mode.is_strict() {
            let declared = declared.unwrap_or(&Value::Null);
            if parent_type.is_none() && !declared.is_null() {
                self.push(field_path(path, "parent_id"), "Sentence nodes must have a null parent_id");
            } else if parent_type.is_some() && !parent_id.is_null() && declared != parent_id {
                self.push(
                    field_path(path, "parent_id"),
                    format!("parent_id must equal the parent's node_id {parent_id} (got {declared})"),
                );
            }
        }

        if let Some(head) = obj.get("head_id").filter(|v| !v.is_null()) {
            match head.as_u64() {
                Some(head) if Some(head) == own_id => {
                    self.push(field_path(path, "head_id"), "head_id must not equal the node's own node_id");
                }
                Some(_) => {}
                None => self.push(field_path(path, "head_id"), "head_id must be a non-negative integer"),
            }
        }

        if let Some(target) = obj.get("ref_node_id").filter(|v| !v.is_null()) {
            match target.as_u64() {
                Some(target) => self.references.push((field_path(path, "ref_node_id"), target, own_id)),
                None => self.push(field_path(path, "ref_node_id"), "ref_node_id must be a non-negative integer"),
            }
        }
        own_id
    }

    fn check_references(&mut self) {
        let references = std::mem::take(&mut self.references);
        for (path, target, own_id) in references {
            if Some(target) == own_id {
                self.push(path, "ref_node_id must not point at the node itself");
            } else if !self.ids.contains_key(&target) {
                self.push(path, format!("ref_node_id {target} names no node in the document"));
            }
        }
    }

    fn check_span(&mut self, path: &str, obj: &Map<String, Value>, sentence_len: usize) {
        let Some(span) = obj.get("source_span") else { return };
        let path = field_path(path, "source_span");
        let start = span.get("start").and_then(Value::as_u64);
        let end = span.get("end").and_then(Value::as_u64);
        match (start, end) {
            (Some(start), Some(end)) => {
                if start > end || end > sentence_len as u64 {
                    self.push(path, format!("span [{start}, {end}) must satisfy 0 <= start <= end <= {sentence_len}"));
                }
            }
            _ => self.push(path, "source_span must be {start, end} with non-negative integers"),
        }
    }

    fn check_schema_version(&mut self, path: &str, obj: &Map<String, Value>) {
        let Some(version) = obj.get("schema_version") else { return };
        let path = field_path(path, "schema_version");
        match version.as_str() {
            Some(v) if self.mode.is_strict() && v != SCHEMA_VERSION => {
                self.push(path, format!("schema_version must be {SCHEMA_VERSION:?} (got {v:?})"));
            }
            Some(_) => {}
            None => self.push(path, "schema_version must be a string"),
        }
    }

    fn check_features(&mut self, path: &str, obj: &Map<String, Value>) {
        let Some(features) = obj.get("features") else { return };
        let valid = features
            .as_object()
            .map(|map| map.values().all(Value::is_string))
            .unwrap_or(false);
        if !valid {
            self.push(field_path(path, "features"), "features must map strings to strings");
        }
    }

    fn check_notes(&mut self, path: &str, notes: &Value) {
        let Some(notes) = notes.as_array() else {
            self.push(path, "notes must be a list");
            return;
        };
        for (i, note) in notes.iter().enumerate() {
            let path = format!("{path}[{i}]");
            if !note.get("text").and_then(Value::as_str).is_some_and(|t| !t.trim().is_empty()) {
                self.push(&path, "note text must be a non-empty string");
            }
            if !note.get("kind").and_then(Value::as_str).is_some_and(|k| NoteKind::NAMES.contains(&k)) {
                self.push(&path, format!("note kind must be one of {}", NoteKind::NAMES.join(", ")));
            }
            if !note.get("confidence").and_then(Value::as_f64).is_some_and(|c| (0.0..=1.0).contains(&c)) {
                self.push(&path, "note confidence must be a number in [0, 1]");
            }
            if !note.get("source").and_then(Value::as_str).is_some_and(|s| NoteSource::NAMES.contains(&s)) {
                self.push(&path, format!("note source must be one of {}", NoteSource::NAMES.join(", ")));
            }
        }
    }

    fn check_template_selection(&mut self, path: &str, selection: &Value) {
        if !selection.is_object() {
            self.push(path, "template_selection must be an object");
            return;
        }
        if !selection.get("template_id").and_then(Value::as_str).is_some_and(|t| !t.is_empty()) {
            self.push(path, "template_id must be a non-empty string");
        }
        if !selection.get("level").and_then(Value::as_str).is_some_and(|l| SelectionLevel::NAMES.contains(&l)) {
            self.push(path, format!("level must be one of {}", SelectionLevel::NAMES.join(", ")));
        }
        if !selection.get("matched_key").is_some_and(Value::is_string) {
            self.push(path, "matched_key must be a string");
        }
        if let Some(candidates) = selection.get("candidates") {
            let complete = ["l1", "l2", "l3", "l4"]
                .iter()
                .all(|level| candidates.get(level).is_some_and(Value::is_string));
            if !complete {
                self.push(path, "candidates must carry string keys l1..l4");
            }
        }
    }

    fn check_backoff_summary(&mut self, path: &str, summary: &Value) {
        let count = |field: &str| summary.get(field).and_then(Value::as_u64);
        match (count("backoff_nodes"), count("backoff_leaf_nodes"), count("unique_backoff_spans")) {
            (Some(nodes), Some(leaves), Some(spans)) => {
                if leaves > nodes || spans > nodes {
                    self.push(path, "leaf and span counts cannot exceed backoff_nodes");
                }
            }
            _ => self.push(
                path,
                "backoff_summary needs non-negative integers backoff_nodes, backoff_leaf_nodes, unique_backoff_spans",
            ),
        }
    }

    fn check_candidate_stats(&mut self, path: &str, stats: &Value) {
        let Some(stats) = stats.as_array() else {
            self.push(path, "rejected_candidate_stats must be a list");
            return;
        };
        for (i, stat) in stats.iter().enumerate() {
            let valid = stat.get("text").is_some_and(Value::is_string)
                && stat.get("count").and_then(Value::as_u64).is_some_and(|c| c >= 1)
                && stat.get("reasons").is_some_and(is_string_list);
            if !valid {
                self.push(format!("{path}[{i}]"), "stat must be {text, count >= 1, reasons: [string]}");
            }
        }
    }

    fn check_children(
        &mut self,
        path: &str,
        obj: &Map<String, Value>,
        node_type: Option<NodeType>,
        own_id: &Value,
        sentence_len: usize,
    ) {
        let Some(children) = obj.get("linguistic_elements") else { return };
        let Some(children) = children.as_array() else {
            self.push(field_path(path, "linguistic_elements"), "linguistic_elements must be a list");
            return;
        };

        if node_type == Some(NodeType::Phrase) {
            let words = children
                .iter()
                .filter(|child| child.get("type").and_then(Value::as_str) == Some(NodeType::Word.as_str()))
                .count();
            if words < 2 {
                self.push(path, format!("Phrase must contain at least 2 Word children (found {words})"));
            }
        }

        // Children of an unrecognized type have no expected shape.
        let Some(node_type) = node_type else { return };
        for (i, child) in children.iter().enumerate() {
            self.check_node(&child_path(path, i), child, Some(node_type), own_id, sentence_len);
        }
    }
}

fn is_string_list(value: &Value) -> bool {
    value.as_array().is_some_and(|items| items.iter().all(Value::is_string))
}
