use crate::graph::DependencyGraph;
use gloss_protocol::{ParsedSentence, SourceSpan};
use std::collections::HashSet;

const VERB_CORE_DEPS: [&str; 5] = ["aux", "auxpass", "neg", "prt", "expl"];
const COMPLEMENT_DEPS: [&str; 8] = ["dobj", "obj", "dative", "attr", "acomp", "oprd", "xcomp", "ccomp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKind {
    Noun,
    Verb,
    Prepositional,
}

impl PhraseKind {
    pub fn part_of_speech(&self) -> &'static str {
        match self {
            PhraseKind::Noun => "noun phrase",
            PhraseKind::Verb => "verb phrase",
            PhraseKind::Prepositional => "prepositional phrase",
        }
    }
}

/// Candidate phrase: token range `[first, last]` inclusive plus its character span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseSpan {
    pub kind: PhraseKind,
    pub first: usize,
    pub last: usize,
    pub span: SourceSpan,
}

impl PhraseSpan {
    fn new(parsed: &ParsedSentence, kind: PhraseKind, first: usize, last: usize) -> Self {
        let span = SourceSpan::new(parsed.tokens[first].idx, parsed.tokens[last].end());
        Self { kind, first, last, span }
    }

    /// Token indices that become Word children.
    pub fn word_tokens<'a>(&self, parsed: &'a ParsedSentence) -> impl Iterator<Item = usize> + 'a {
        (self.first..=self.last).filter(move |&i| !parsed.tokens[i].is_space())
    }
}

fn is_root_verb(parsed: &ParsedSentence, index: usize) -> bool {
    let token = &parsed.tokens[index];
    token.dep.eq_ignore_ascii_case("root") && matches!(token.pos.as_str(), "VERB" | "AUX")
}

/// Collects phrase spans from noun chunks, root verb complexes and
/// prepositions, dedups them on `(start, end)`, drops spans with fewer than two
/// words and orders the rest by start offset, longest first.
pub fn extract_phrase_spans(parsed: &ParsedSentence, graph: &DependencyGraph) -> Vec<PhraseSpan> {
    let mut candidates = Vec::new();

    for chunk in &parsed.noun_chunks {
        if chunk.start < chunk.end {
            candidates.push(PhraseSpan::new(parsed, PhraseKind::Noun, chunk.start, chunk.end - 1));
        }
    }

    for root in (0..parsed.tokens.len()).filter(|&i| is_root_verb(parsed, i)) {
        let (mut first, mut last) = (root, root);
        for child in graph.children(root) {
            let dep = parsed.tokens[child].dep.as_str();
            if VERB_CORE_DEPS.contains(&dep) {
                first = first.min(child);
                last = last.max(child);
            } else if COMPLEMENT_DEPS.contains(&dep) {
                let (left, right) = graph.subtree_extent(child);
                first = first.min(left);
                last = last.max(right);
            }
        }
        candidates.push(PhraseSpan::new(parsed, PhraseKind::Verb, first, last));
    }

    for (i, token) in parsed.tokens.iter().enumerate() {
        if token.pos == "ADP" && token.dep != "prt" {
            let (_, right) = graph.subtree_extent(i);
            candidates.push(PhraseSpan::new(parsed, PhraseKind::Prepositional, i, right));
        }
    }

    let mut seen = HashSet::new();
    let mut spans: Vec<PhraseSpan> = candidates
        .into_iter()
        .filter(|c| seen.insert((c.span.start, c.span.end)))
        .filter(|c| c.word_tokens(parsed).count() >= 2)
        .collect();
    spans.sort_by(|a, b| a.span.start.cmp(&b.span.start).then(b.span.end.cmp(&a.span.end)));
    spans
}
