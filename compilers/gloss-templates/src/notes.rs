//! Note assignment pass: every node gets a template selection and one
//! structured note, parent before children.

use crate::context::TamContext;
use crate::registry::TemplateRegistry;
use crate::render::{normalize_content, render_note};
use crate::select::select_template;
use gloss_protocol::{BackoffSummary, Document, Node, NodeType, Note, NoteKind, NoteSource, SelectionLevel};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub const BACKOFF_USED: &str = "backoff_used";

pub const NOTE_INVALID: &str = "note_invalid";
pub const NOTE_UNSUITABLE: &str = "note_unsuitable";
pub const NOTE_DUPLICATE: &str = "note_duplicate";

const MODEL_CONFIDENCE: f64 = 0.8;

/// What an external note generator sees for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRequest<'a> {
    pub node_type: NodeType,
    pub part_of_speech: &'a str,
    pub tense: Option<&'a str>,
    pub content: &'a str,
    pub sentence: &'a str,
}

/// Source of candidate notes (a model, a lookup service, a test double).
/// Candidates are gated before use; returning `None` means "no opinion".
pub trait NoteGenerator: Send + Sync {
    fn generate(&self, request: &NoteRequest<'_>) -> Option<String>;
}

/// Length bounds for generated notes, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteGates {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for NoteGates {
    fn default() -> Self {
        Self {
            min_chars: 12,
            max_chars: 240,
        }
    }
}

impl NoteGates {
    /// Returns the reason code for a rejected candidate.
    fn check(&self, candidate: &str, request: &NoteRequest<'_>) -> Result<(), &'static str> {
        let trimmed = candidate.trim();
        let len = trimmed.chars().count();
        if len < self.min_chars || len > self.max_chars {
            return Err(NOTE_INVALID);
        }
        if !trimmed.chars().any(char::is_alphabetic) || trimmed.contains(['{', '}']) {
            return Err(NOTE_INVALID);
        }
        let normalized = note_key(trimmed);
        if normalized == note_key(request.content) || normalized == note_key(request.sentence) {
            return Err(NOTE_INVALID);
        }
        if !is_suitable(request.node_type, &normalized) {
            return Err(NOTE_UNSUITABLE);
        }
        Ok(())
    }
}

fn is_suitable(node_type: NodeType, normalized: &str) -> bool {
    let off_level: &[&str] = match node_type {
        NodeType::Sentence => &["this word", "the word "],
        NodeType::Phrase => &["this word", "this sentence"],
        NodeType::Word => &["this sentence", "this phrase", "this clause"],
    };
    !off_level.iter().any(|marker| normalized.contains(marker))
}

fn note_key(text: &str) -> String {
    normalize_content(text)
        .trim_end_matches(['.', '!', '?', ';', ':'])
        .to_string()
}

fn note_kind(node_type: NodeType) -> NoteKind {
    match node_type {
        NodeType::Sentence => NoteKind::Discourse,
        NodeType::Phrase => NoteKind::Syntactic,
        NodeType::Word => NoteKind::Morphological,
    }
}

fn template_note(text: String, node_type: NodeType, level: SelectionLevel) -> Note {
    let (confidence, source) = match level {
        SelectionLevel::L1Exact => (0.9, NoteSource::Rule),
        SelectionLevel::L2DropTam => (0.75, NoteSource::Rule),
        SelectionLevel::L3LevelPos => (0.6, NoteSource::Fallback),
        SelectionLevel::L4Fallback => (0.4, NoteSource::Fallback),
    };
    Note {
        text,
        kind: note_kind(node_type),
        confidence,
        source,
    }
}

/// Counts backoff-flagged nodes in a sentence subtree.
pub fn backoff_summary(sentence: &Node) -> BackoffSummary {
    let mut summary = BackoffSummary::default();
    let mut spans = BTreeSet::new();
    sentence.walk(&mut |node| {
        if node.has_flag(BACKOFF_USED) {
            summary.backoff_nodes += 1;
            if node.is_leaf() {
                summary.backoff_leaf_nodes += 1;
            }
            spans.insert((node.source_span.start, node.source_span.end));
        }
    });
    summary.unique_backoff_spans = spans.len();
    summary
}

pub struct NoteAssigner<'a> {
    registry: &'a TemplateRegistry,
    generator: Option<&'a dyn NoteGenerator>,
    gates: NoteGates,
}

impl<'a> NoteAssigner<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self {
            registry,
            generator: None,
            gates: NoteGates::default(),
        }
    }

    pub fn with_generator(mut self, generator: &'a dyn NoteGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_gates(mut self, gates: NoteGates) -> Self {
        self.gates = gates;
        self
    }

    /// Assigns notes to the whole sentence tree and stores its backoff summary.
    pub fn annotate_sentence(&self, sentence: &mut Node) {
        let text = sentence.content.clone();
        let mut accepted = HashSet::new();
        self.visit(sentence, None, &text, &mut accepted);
        sentence.backoff_summary = Some(backoff_summary(sentence));
    }

    /// Returns the number of nodes visited.
    pub fn annotate_document(&self, document: &mut Document) -> usize {
        let mut visited = 0;
        for sentence in document.sentences_mut() {
            self.annotate_sentence(sentence);
            visited += sentence.subtree_len();
        }
        visited
    }

    fn visit(&self, node: &mut Node, inherited: Option<&TamContext>, sentence: &str, accepted: &mut HashSet<String>) {
        let tam = TamContext::resolve(node, inherited);
        let selection = select_template(self.registry, node, &tam);

        if selection.level.is_backoff() {
            node.add_flag(BACKOFF_USED);
        } else {
            node.remove_flag(BACKOFF_USED);
        }

        let note = match self.generated_note(node, sentence, accepted) {
            Ok(Some(note)) => Some(note),
            outcome => render_note(self.registry, &selection.template_id, &node.content, &selection.matched_key)
                .map(|text| {
                    let mut note = template_note(text, node.node_type, selection.level);
                    if outcome.is_err() {
                        note.source = NoteSource::Fallback;
                    }
                    note
                }),
        };
        match note {
            Some(note) => push_note(node, note),
            None => warn!("template {} has no variants", selection.template_id),
        }
        node.template_selection = Some(selection);

        for child in &mut node.linguistic_elements {
            self.visit(child, Some(&tam), sentence, accepted);
        }
    }

    /// `Err` carries the reason code of a rejected candidate.
    fn generated_note(
        &self,
        node: &mut Node,
        sentence: &str,
        accepted: &mut HashSet<String>,
    ) -> Result<Option<Note>, &'static str> {
        let Some(generator) = self.generator else {
            return Ok(None);
        };
        let request = NoteRequest {
            node_type: node.node_type,
            part_of_speech: &node.part_of_speech,
            tense: node.tense.as_deref(),
            content: &node.content,
            sentence,
        };
        let Some(candidate) = generator.generate(&request) else {
            return Ok(None);
        };

        let verdict = self.gates.check(&candidate, &request).and_then(|()| {
            if accepted.insert(note_key(&candidate)) {
                Ok(())
            } else {
                Err(NOTE_DUPLICATE)
            }
        });
        match verdict {
            Ok(()) => Ok(Some(Note {
                text: candidate.trim().to_string(),
                kind: note_kind(node.node_type),
                confidence: MODEL_CONFIDENCE,
                source: NoteSource::Model,
            })),
            Err(reason) => {
                debug!("node {}: rejected candidate {:?} ({})", node.node_id, candidate, reason);
                let recorded = node
                    .rejected_candidates
                    .iter()
                    .zip(&node.reason_codes)
                    .any(|(seen, code)| *seen == candidate && code == reason);
                if !recorded {
                    node.rejected_candidates.push(candidate);
                    node.reason_codes.push(reason.to_string());
                }
                Err(reason)
            }
        }
    }
}

/// Appends a note once; reruns over the same tree do not stack copies.
fn push_note(node: &mut Node, note: Note) {
    if !node.linguistic_notes.contains(&note.text) {
        node.linguistic_notes.push(note.text.clone());
    }
    if !node.notes.iter().any(|existing| existing.text == note.text) {
        node.notes.push(note);
    }
}
