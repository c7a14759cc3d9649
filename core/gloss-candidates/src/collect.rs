use crate::{CandidateFilter, RawCandidate};
use gloss_protocol::Node;

/// Gathers every `rejected_candidates` entry in the sentence tree, pairing
/// each with the reason code at the same position, and stores the normalized
/// stats on the sentence. Returns how many distinct candidates survived.
pub fn collect_rejected_candidates(filter: &CandidateFilter, sentence: &mut Node) -> usize {
    let mut raw = Vec::new();
    sentence.walk(&mut |node| {
        for (i, text) in node.rejected_candidates.iter().enumerate() {
            raw.push(RawCandidate::Record {
                text: text.clone(),
                reason: node.reason_codes.get(i).cloned(),
                count: 1,
            });
        }
    });

    let normalized = filter.normalize(&raw, Some(&sentence.content));
    let survivors = normalized.stats.len();
    sentence.rejected_candidate_stats = if normalized.is_empty() {
        None
    } else {
        Some(normalized.stats)
    };
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::{NodeId, NodeType};

    #[test]
    fn test_collects_across_the_tree() {
        let mut sentence = Node::blank(NodeType::Sentence, "The dog barked.", NodeId::new(1));
        sentence.rejected_candidates.push("Bad output".to_string());
        sentence.reason_codes.push("note_invalid".to_string());

        let mut phrase = Node::blank(NodeType::Phrase, "The dog", NodeId::new(2));
        let mut word = Node::blank(NodeType::Word, "dog", NodeId::new(3));
        word.rejected_candidates = vec!["bad output.".to_string(), "The dog barked loudly".to_string()];
        word.reason_codes = vec!["note_duplicate".to_string()];
        phrase.linguistic_elements.push(word);
        sentence.linguistic_elements.push(phrase);

        let survivors = collect_rejected_candidates(&CandidateFilter::default(), &mut sentence);
        assert_eq!(survivors, 1);
        let stats = sentence.rejected_candidate_stats.as_ref().unwrap();
        assert_eq!(stats[0].text, "Bad output.");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].reasons, vec!["note_invalid", "note_duplicate"]);
    }

    #[test]
    fn test_nothing_rejected_leaves_stats_absent() {
        let mut sentence = Node::blank(NodeType::Sentence, "Hi.", NodeId::new(1));
        assert_eq!(collect_rejected_candidates(&CandidateFilter::default(), &mut sentence), 0);
        assert!(sentence.rejected_candidate_stats.is_none());
    }
}
