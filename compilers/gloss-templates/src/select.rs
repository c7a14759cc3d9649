use crate::compat::is_semantically_compatible;
use crate::context::{ContextKey, TamContext};
use crate::registry::TemplateRegistry;
use gloss_protocol::{Node, SelectionLevel, TemplateSelection};
use log::debug;

const KEYED_LEVELS: [SelectionLevel; 3] = [
    SelectionLevel::L1Exact,
    SelectionLevel::L2DropTam,
    SelectionLevel::L3LevelPos,
];

/// Walks L1 -> L2 -> L3 and settles on the first registry hit that is
/// plausible for the node; L4 always resolves.
pub fn select_template(registry: &TemplateRegistry, node: &Node, tam: &TamContext) -> TemplateSelection {
    let key = ContextKey::for_node(node, tam);
    let candidates = key.candidates();

    for level in KEYED_LEVELS {
        let lookup_key = match level {
            SelectionLevel::L1Exact => &candidates.l1,
            SelectionLevel::L2DropTam => &candidates.l2,
            _ => &candidates.l3,
        };
        match registry.lookup(level, lookup_key) {
            Some(template_id) if is_semantically_compatible(template_id, node, tam) => {
                return TemplateSelection {
                    template_id: template_id.to_string(),
                    level,
                    matched_key: lookup_key.clone(),
                    candidates,
                };
            }
            Some(template_id) => {
                debug!("node {}: {} rejected at {}, backing off", node.node_id, template_id, level.as_str());
            }
            None => {}
        }
    }

    let template_id = registry.fallback(node.node_type);
    debug!("node {}: fallback {} for {:?}", node.node_id, template_id, candidates.l1);
    TemplateSelection {
        template_id: template_id.to_string(),
        level: SelectionLevel::L4Fallback,
        matched_key: candidates.l4.clone(),
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::{NodeId, NodeType};

    fn word(content: &str, pos: &str, dep: &str) -> Node {
        let mut node = Node::blank(NodeType::Word, content, NodeId::new(1));
        node.part_of_speech = pos.to_string();
        node.dep_label = Some(dep.to_string());
        node
    }

    #[test]
    fn test_exact_hit() {
        let registry = TemplateRegistry::standard();
        let node = word("the", "determiner", "det");
        let selection = select_template(&registry, &node, &TamContext::default());
        assert_eq!(selection.level, SelectionLevel::L1Exact);
        assert_eq!(selection.template_id, "WORD_DEF_ARTICLE");
        assert_eq!(selection.matched_key, "word|determiner|det|none|def_article");
    }

    #[test]
    fn test_drop_tam_level() {
        let registry = TemplateRegistry::standard();
        let node = word("instincts", "noun", "dobj");
        let selection = select_template(&registry, &node, &TamContext::default());
        assert_eq!(selection.level, SelectionLevel::L2DropTam);
        assert_eq!(selection.template_id, "WORD_NOUN_OBJECT");
        assert_eq!(selection.matched_key, selection.candidates.l2);
    }

    #[test]
    fn test_level_pos() {
        let registry = TemplateRegistry::standard();
        let node = word("quickly", "adverb", "advmod");
        let selection = select_template(&registry, &node, &TamContext::default());
        assert_eq!(selection.level, SelectionLevel::L3LevelPos);
        assert_eq!(selection.template_id, "WORD_ADVERB");
    }

    #[test]
    fn test_unknown_pos_falls_back() {
        let registry = TemplateRegistry::standard();
        let node = word(".", "punctuation", "punct");
        let selection = select_template(&registry, &node, &TamContext::default());
        assert_eq!(selection.level, SelectionLevel::L4Fallback);
        assert_eq!(selection.template_id, "WORD_GENERIC");
        assert_eq!(selection.matched_key, "word");
    }

    #[test]
    fn test_incompatible_hit_backs_off() {
        let registry = TemplateRegistry::standard().with_template(
            SelectionLevel::L2DropTam,
            "word|auxiliary verb|aux|generic",
            "WORD_AUX_MODAL",
        );
        let node = word("was", "auxiliary verb", "auxpass");
        let selection = select_template(&registry, &node, &TamContext::default());
        assert_eq!(selection.level, SelectionLevel::L3LevelPos);
        assert_eq!(selection.template_id, "WORD_AUX");
    }

    #[test]
    fn test_tensed_modal_skips_modal_perfect_entries() {
        let registry = TemplateRegistry::standard();
        let node = word("will", "auxiliary verb", "aux");
        let tam = TamContext {
            mood: Some("modal".to_string()),
            aspect: Some("perfect".to_string()),
            tense: Some("future perfect".to_string()),
        };
        let selection = select_template(&registry, &node, &tam);
        assert_eq!(selection.candidates.l1, "word|auxiliary verb|aux|none|modal_aux");
        assert_eq!(selection.level, SelectionLevel::L2DropTam);
        assert_eq!(selection.template_id, "WORD_AUX_MODAL");
    }
}
