pub mod graph;
pub mod labels;
pub mod spans;

use crate::graph::DependencyGraph;
use crate::spans::{extract_phrase_spans, PhraseSpan};
use gloss_protocol::{Document, Node, NodeId, NodeType, ParsedSentence, SourceSpan};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkeletonError {
    #[error("token {token} of {sentence:?} has head {head} outside the sentence")]
    HeadOutOfRange { sentence: String, token: usize, head: usize },
    #[error("token {token} of {sentence:?} ends at character {end}, past the sentence end {len}")]
    TokenOutOfBounds { sentence: String, token: usize, end: usize, len: usize },
    #[error("noun chunk {start}..{end} of {sentence:?} is not a valid token range")]
    BadNounChunk { sentence: String, start: usize, end: usize },
    #[error("sentence {0:?} appears twice in one document")]
    DuplicateSentence(String),
}

/// Turns parser output into the canonical Sentence -> Phrase -> Word tree.
///
/// Node ids are allocated depth-first, parent before children, and stay
/// unique across every sentence built by the same builder.
pub struct SkeletonBuilder {
    next_id: NodeId,
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self { next_id: NodeId::new(1) }
    }

    fn allocate(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Builds one document from a batch of parses. Sentence texts must be unique.
    pub fn build_document(&mut self, parses: &[ParsedSentence]) -> Result<Document, SkeletonError> {
        let mut document = Document::new();
        for parsed in parses {
            if document.contains(&parsed.text) {
                return Err(SkeletonError::DuplicateSentence(parsed.text.clone()));
            }
            let sentence = self.build_sentence(parsed)?;
            document
                .insert(sentence)
                .map_err(|node| SkeletonError::DuplicateSentence(node.content))?;
        }
        Ok(document)
    }

    pub fn build_sentence(&mut self, parsed: &ParsedSentence) -> Result<Node, SkeletonError> {
        check_parse(parsed)?;
        let graph = DependencyGraph::new(&parsed.tokens);
        let phrases = extract_phrase_spans(parsed, &graph);

        let mut sentence = Node::blank(NodeType::Sentence, parsed.text.clone(), self.allocate());
        sentence.part_of_speech = "sentence".to_string();
        sentence.grammatical_role = "sentence".to_string();
        sentence.source_span = SourceSpan::new(0, parsed.char_len());

        // First Word node built for each token; later copies point back at it.
        let mut first_word: HashMap<usize, NodeId> = HashMap::new();
        let mut word_tokens: Vec<Vec<usize>> = Vec::with_capacity(phrases.len());

        for phrase_span in &phrases {
            let phrase = self.build_phrase(parsed, phrase_span, sentence.node_id, &mut first_word);
            word_tokens.push(phrase_span.word_tokens(parsed).collect());
            sentence.linguistic_elements.push(phrase);
        }

        for (phrase, tokens) in sentence.linguistic_elements.iter_mut().zip(&word_tokens) {
            for (word, &token_index) in phrase.linguistic_elements.iter_mut().zip(tokens) {
                let head = parsed.tokens[token_index].head;
                if head != token_index {
                    word.head_id = first_word.get(&head).copied().filter(|id| *id != word.node_id);
                }
            }
        }

        debug!(
            "skeleton for {:?}: {} phrases, {} nodes",
            parsed.text,
            sentence.linguistic_elements.len(),
            sentence.subtree_len()
        );
        Ok(sentence)
    }

    fn build_phrase(
        &mut self,
        parsed: &ParsedSentence,
        phrase_span: &PhraseSpan,
        parent: NodeId,
        first_word: &mut HashMap<usize, NodeId>,
    ) -> Node {
        let head = phrase_head(parsed, phrase_span);
        let head_token = &parsed.tokens[head];

        let mut phrase = Node::blank(NodeType::Phrase, parsed.slice(phrase_span.span), self.allocate());
        phrase.parent_id = Some(parent);
        phrase.source_span = phrase_span.span;
        phrase.part_of_speech = phrase_span.kind.part_of_speech().to_string();
        phrase.grammatical_role = labels::grammatical_role(&head_token.dep).to_string();
        phrase.dep_label = Some(head_token.dep.clone());

        for index in phrase_span.word_tokens(parsed) {
            let token = &parsed.tokens[index];
            let mut word = Node::blank(NodeType::Word, token.text.clone(), self.allocate());
            word.parent_id = Some(phrase.node_id);
            word.source_span = SourceSpan::new(token.idx, token.end());
            word.part_of_speech = labels::part_of_speech(&token.pos).to_string();
            word.grammatical_role = labels::grammatical_role(&token.dep).to_string();
            word.dep_label = Some(token.dep.clone());
            word.features = token.morph.to_map();
            match first_word.get(&index) {
                Some(original) => word.ref_node_id = Some(*original),
                None => {
                    first_word.insert(index, word.node_id);
                }
            }
            phrase.linguistic_elements.push(word);
        }
        phrase
    }
}

/// First token of the span whose head lies outside it (or that heads itself).
fn phrase_head(parsed: &ParsedSentence, phrase_span: &PhraseSpan) -> usize {
    (phrase_span.first..=phrase_span.last)
        .find(|&i| {
            let head = parsed.tokens[i].head;
            head == i || head < phrase_span.first || head > phrase_span.last
        })
        .unwrap_or(phrase_span.first)
}

fn check_parse(parsed: &ParsedSentence) -> Result<(), SkeletonError> {
    let len = parsed.char_len();
    for (i, token) in parsed.tokens.iter().enumerate() {
        if token.head >= parsed.tokens.len() {
            return Err(SkeletonError::HeadOutOfRange {
                sentence: parsed.text.clone(),
                token: i,
                head: token.head,
            });
        }
        if token.end() > len {
            return Err(SkeletonError::TokenOutOfBounds {
                sentence: parsed.text.clone(),
                token: i,
                end: token.end(),
                len,
            });
        }
    }
    for chunk in &parsed.noun_chunks {
        if chunk.start > chunk.end || chunk.end > parsed.tokens.len() {
            return Err(SkeletonError::BadNounChunk {
                sentence: parsed.text.clone(),
                start: chunk.start,
                end: chunk.end,
            });
        }
    }
    Ok(())
}
