use crate::rules::detect_tam;
use gloss_protocol::{Document, Node, NodeType, ParsedSentence};
use log::{debug, warn};

/// Runs the rule engine over the sentence span and, recursively, over every
/// Phrase below it. Word nodes are left alone.
pub fn annotate_sentence(sentence: &mut Node, parsed: &ParsedSentence) {
    let result = detect_tam(parsed.tokens.iter());
    debug!(
        "sentence {} -> tense={:?} aspect={} construction={}",
        sentence.node_id,
        result.tense_display(),
        result.aspect.as_str(),
        result.construction.as_str()
    );
    result.apply_to(sentence);
    annotate_phrases(&mut sentence.linguistic_elements, parsed);
}

fn annotate_phrases(children: &mut [Node], parsed: &ParsedSentence) {
    for child in children.iter_mut() {
        if child.node_type != NodeType::Phrase {
            continue;
        }
        let scoped = parsed.tokens_in(child.source_span);
        detect_tam(scoped).apply_to(child);
        annotate_phrases(&mut child.linguistic_elements, parsed);
    }
}

/// Annotates every sentence of a document that has a matching parse.
/// Returns how many sentences were annotated.
pub fn annotate_document(document: &mut Document, parses: &[ParsedSentence]) -> usize {
    let mut annotated = 0;
    for parsed in parses {
        match document.get_mut(&parsed.text) {
            Some(sentence) => {
                annotate_sentence(sentence, parsed);
                annotated += 1;
            }
            None => warn!("no skeleton node for parsed sentence {:?}", parsed.text),
        }
    }
    annotated
}
