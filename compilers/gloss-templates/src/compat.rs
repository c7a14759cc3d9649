//! Plausibility of a template id for a node, judged from the node's own
//! fields only. The registry is not consulted.

use crate::context::{first_word, lexical_class, TamContext, HAVE_FORMS, MODAL_WORDS};
use gloss_protocol::{Node, NodeType};

fn level_prefix(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Sentence => "SENTENCE_",
        NodeType::Phrase => "PHRASE_",
        NodeType::Word => "WORD_",
    }
}

pub fn is_semantically_compatible(template_id: &str, node: &Node, tam: &TamContext) -> bool {
    if !template_id.starts_with(level_prefix(node.node_type)) {
        return false;
    }
    if template_id.contains("MODAL_PERFECT") && !tam.is_modal_perfect() {
        return false;
    }

    let pos = node.part_of_speech.to_lowercase();
    let first = first_word(&node.content);
    let lex = lexical_class(&node.content);

    match template_id {
        "WORD_AUX_MODAL" | "WORD_AUX_MODAL_PERFECT" => {
            pos == "auxiliary verb" && MODAL_WORDS.contains(&first.as_str())
        }
        "WORD_AUX_HAVE" | "WORD_AUX_HAVE_PERFECT" => {
            pos == "auxiliary verb" && HAVE_FORMS.contains(&first.as_str())
        }
        "WORD_AUX" | "WORD_AUX_SUPPORT" => pos == "auxiliary verb",
        "WORD_DEF_ARTICLE" => pos == "determiner" && first == "the",
        "WORD_POSSESSIVE" => lex == "possessive",
        "WORD_PARTICIPLE" | "WORD_PARTICIPLE_MODAL_PERFECT" => {
            pos == "verb" && (lex == "participle_form" || node.features.get("VerbForm").map(String::as_str) == Some("Part"))
        }
        "WORD_GERUND" => pos == "verb" && lex == "ing_form",
        "WORD_NOUN" | "WORD_NOUN_OBJECT" => pos == "noun" || pos == "proper noun",
        "WORD_VERB" => pos == "verb",
        "PHRASE_MODAL_PERFECT" | "PHRASE_MODAL_VERB" => lex == "modal_aux",
        "PHRASE_PERFECT_VERB" => lex == "have_aux",
        "PHRASE_POSSESSIVE_OBJECT" => pos == "noun phrase" && lex == "possessive",
        "PHRASE_DEFINITE_NOUN" => pos == "noun phrase" && lex == "def_article",
        "PHRASE_BEFORE_ING" => lex == "before_ing",
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::NodeId;

    fn word(content: &str, pos: &str) -> Node {
        let mut node = Node::blank(NodeType::Word, content, NodeId::new(9));
        node.part_of_speech = pos.to_string();
        node
    }

    fn modal_perfect() -> TamContext {
        TamContext {
            mood: Some("modal".to_string()),
            aspect: Some("perfect".to_string()),
            tense: None,
        }
    }

    #[test]
    fn test_modal_template_needs_modal_lexeme() {
        let tam = TamContext::default();
        assert!(is_semantically_compatible("WORD_AUX_MODAL", &word("should", "auxiliary verb"), &tam));
        assert!(!is_semantically_compatible("WORD_AUX_MODAL", &word("was", "auxiliary verb"), &tam));
        assert!(!is_semantically_compatible("WORD_AUX_MODAL", &word("should", "verb"), &tam));
    }

    #[test]
    fn test_modal_perfect_templates_need_modal_perfect_context() {
        let node = word("should", "auxiliary verb");
        assert!(is_semantically_compatible("WORD_AUX_MODAL_PERFECT", &node, &modal_perfect()));
        let mut past = modal_perfect();
        past.tense = Some("past".to_string());
        assert!(!is_semantically_compatible("WORD_AUX_MODAL_PERFECT", &node, &past));
    }

    #[test]
    fn test_level_must_match() {
        let tam = TamContext::default();
        assert!(!is_semantically_compatible("PHRASE_NOUN", &word("dog", "noun"), &tam));
        assert!(is_semantically_compatible("WORD_GENERIC", &word("dog", "noun"), &tam));
    }
}
