use crate::ids::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema tag every strict-mode node must carry.
pub const SCHEMA_VERSION: &str = "v2";

/// `tam_construction` value for spans with no recognized construction.
pub const NO_CONSTRUCTION: &str = "none";

/// Fields the skeleton builder owns. Enrichment passes must leave them untouched.
pub const FROZEN_FIELDS: [&str; 11] = [
    "type",
    "content",
    "part_of_speech",
    "node_id",
    "parent_id",
    "source_span",
    "grammatical_role",
    "dep_label",
    "head_id",
    "features",
    "schema_version",
];

/// The three node variants of the annotation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Sentence,
    Phrase,
    Word,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Sentence, NodeType::Phrase, NodeType::Word];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Sentence => "Sentence",
            NodeType::Phrase => "Phrase",
            NodeType::Word => "Word",
        }
    }

    /// Lowercase level name used in template context keys.
    pub fn level(&self) -> &'static str {
        match self {
            NodeType::Sentence => "sentence",
            NodeType::Phrase => "phrase",
            NodeType::Word => "word",
        }
    }

    /// The only node type allowed directly below this one.
    pub fn child_type(&self) -> Option<NodeType> {
        match self {
            NodeType::Sentence => Some(NodeType::Phrase),
            NodeType::Phrase => Some(NodeType::Word),
            NodeType::Word => None,
        }
    }

    pub fn parse(value: &str) -> Option<NodeType> {
        NodeType::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Half-open character range `[start, end)` into the sentence text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Semantic,
    Syntactic,
    Morphological,
    Discourse,
}

impl NoteKind {
    pub const NAMES: [&'static str; 4] = ["semantic", "syntactic", "morphological", "discourse"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    Model,
    Rule,
    Fallback,
}

impl NoteSource {
    pub const NAMES: [&'static str; 3] = ["model", "rule", "fallback"];
}

/// A structured linguistic note attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub kind: NoteKind,
    pub confidence: f64,
    pub source: NoteSource,
}

/// Which rung of the template backoff ladder resolved a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectionLevel {
    #[serde(rename = "L1_EXACT")]
    L1Exact,
    #[serde(rename = "L2_DROP_TAM")]
    L2DropTam,
    #[serde(rename = "L3_LEVEL_POS")]
    L3LevelPos,
    #[serde(rename = "L4_FALLBACK")]
    L4Fallback,
}

impl SelectionLevel {
    pub const NAMES: [&'static str; 4] = ["L1_EXACT", "L2_DROP_TAM", "L3_LEVEL_POS", "L4_FALLBACK"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionLevel::L1Exact => "L1_EXACT",
            SelectionLevel::L2DropTam => "L2_DROP_TAM",
            SelectionLevel::L3LevelPos => "L3_LEVEL_POS",
            SelectionLevel::L4Fallback => "L4_FALLBACK",
        }
    }

    /// Anything coarser than an exact match counts as backoff.
    pub fn is_backoff(&self) -> bool {
        !matches!(self, SelectionLevel::L1Exact)
    }
}

/// Context keys tried at each level, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateKeys {
    pub l1: String,
    pub l2: String,
    pub l3: String,
    pub l4: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template_id: String,
    pub level: SelectionLevel,
    pub matched_key: String,
    pub candidates: CandidateKeys,
}

/// Backoff counts over a sentence subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffSummary {
    pub backoff_nodes: usize,
    pub backoff_leaf_nodes: usize,
    pub unique_backoff_spans: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCandidateStat {
    pub text: String,
    pub count: u32,
    pub reasons: Vec<String>,
}

/// One node of the Sentence -> Phrase -> Word tree.
///
/// Field declaration order is the serialization order; `linguistic_elements`
/// must stay last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub content: String,
    pub tense: Option<String>,
    pub aspect: Option<String>,
    pub mood: Option<String>,
    pub voice: Option<String>,
    pub finiteness: Option<String>,
    pub tam_construction: String,
    pub part_of_speech: String,
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_node_id: Option<NodeId>,
    pub source_span: SourceSpan,
    pub grammatical_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, String>,
    #[serde(default)]
    pub linguistic_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub quality_flags: Vec<String>,
    #[serde(default)]
    pub rejected_candidates: Vec<String>,
    #[serde(default)]
    pub reason_codes: Vec<String>,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_selection: Option<TemplateSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_summary: Option<BackoffSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_candidate_stats: Option<Vec<RejectedCandidateStat>>,
    /// Forward-compatible enrichment fields (cefr_level, translation, phonetic, ...).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
    #[serde(default)]
    pub linguistic_elements: Vec<Node>,
}

impl Node {
    /// Blank node factory: every TAM field absent, no children, no diagnostics.
    pub fn blank(node_type: NodeType, content: impl Into<String>, node_id: NodeId) -> Self {
        let content = content.into();
        let end = content.chars().count();
        Self {
            node_type,
            content,
            tense: None,
            aspect: None,
            mood: None,
            voice: None,
            finiteness: None,
            tam_construction: NO_CONSTRUCTION.to_string(),
            part_of_speech: String::new(),
            node_id,
            parent_id: None,
            ref_node_id: None,
            source_span: SourceSpan::new(0, end),
            grammatical_role: String::new(),
            dep_label: None,
            head_id: None,
            features: BTreeMap::new(),
            linguistic_notes: Vec::new(),
            notes: Vec::new(),
            quality_flags: Vec::new(),
            rejected_candidates: Vec::new(),
            reason_codes: Vec::new(),
            schema_version: SCHEMA_VERSION.to_string(),
            template_selection: None,
            backoff_summary: None,
            rejected_candidate_stats: None,
            extensions: BTreeMap::new(),
            linguistic_elements: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.node_type == NodeType::Word
    }

    pub fn children(&self) -> &[Node] {
        &self.linguistic_elements
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.quality_flags.iter().any(|f| f == flag)
    }

    /// Adds a quality flag once.
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.quality_flags.push(flag.to_string());
        }
    }

    pub fn remove_flag(&mut self, flag: &str) {
        self.quality_flags.retain(|f| f != flag);
    }

    /// Depth-first, parent before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.linguistic_elements {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.linguistic_elements {
            child.walk_mut(visit);
        }
    }

    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

/// Sentence text -> root Sentence node, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    sentences: IndexMap<String, Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a Sentence node under its own content. Returns the node back
    /// when the key is already taken.
    pub fn insert(&mut self, sentence: Node) -> Result<(), Node> {
        if self.sentences.contains_key(&sentence.content) {
            return Err(sentence);
        }
        self.sentences.insert(sentence.content.clone(), sentence);
        Ok(())
    }

    pub fn get(&self, text: &str) -> Option<&Node> {
        self.sentences.get(text)
    }

    pub fn get_mut(&mut self, text: &str) -> Option<&mut Node> {
        self.sentences.get_mut(text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.sentences.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.sentences.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.sentences.iter_mut()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Node> {
        self.sentences.values()
    }

    pub fn sentences_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.sentences.values_mut()
    }

    pub fn node_count(&self) -> usize {
        self.sentences.values().map(Node::subtree_len).sum()
    }
}
