//! Context keys: the composite `level|pos|dep|tam|lex` strings that index the
//! template registry, plus the coarser keys used for backoff.

use gloss_protocol::{CandidateKeys, Node};

pub const MODAL_WORDS: [&str; 9] = ["can", "could", "may", "might", "must", "shall", "should", "will", "would"];
pub const HAVE_FORMS: [&str; 3] = ["have", "has", "had"];
pub const POSSESSIVES: [&str; 7] = ["my", "your", "his", "her", "its", "our", "their"];
const TIME_SUBORDINATORS: [&str; 8] = ["when", "while", "after", "before", "until", "since", "once", "whenever"];
const REASON_SUBORDINATORS: [&str; 2] = ["because", "as"];
const CONCESSION_SUBORDINATORS: [&str; 3] = ["although", "though", "whereas"];

/// TAM labels a node is judged by: its own, or the nearest ancestor's when it has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TamContext {
    pub mood: Option<String>,
    pub aspect: Option<String>,
    pub tense: Option<String>,
}

impl TamContext {
    pub fn of(node: &Node) -> Self {
        Self {
            mood: node.mood.clone(),
            aspect: node.aspect.clone(),
            tense: node.tense.clone(),
        }
    }

    pub fn resolve(node: &Node, inherited: Option<&TamContext>) -> Self {
        match (&node.mood, inherited) {
            (None, Some(parent)) => parent.clone(),
            _ => Self::of(node),
        }
    }

    fn has_perfect_aspect(&self) -> bool {
        matches!(self.aspect.as_deref(), Some("perfect") | Some("perfect_progressive"))
    }

    /// Bucket used in L1 keys. A tensed modal ("will have finished") is a
    /// future perfect, not a modal perfect. Matching `is_modal_perfect`
    /// keeps every L1 hit compatible, so `backoff_used` is set exactly when
    /// the L1 key is missing from the registry.
    pub fn bucket(&self) -> &'static str {
        if self.is_modal_perfect() {
            "modal_perfect"
        } else {
            "none"
        }
    }

    pub fn is_modal_perfect(&self) -> bool {
        self.mood.as_deref() == Some("modal") && self.has_perfect_aspect() && self.tense.is_none()
    }
}

/// Lowercased words of a span with surrounding punctuation stripped.
pub fn normalized_words(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn first_word(content: &str) -> String {
    normalized_words(content).into_iter().next().unwrap_or_default()
}

/// Collapses a raw dependency label into the small closed role set.
pub fn collapse_dep(dep: Option<&str>) -> &'static str {
    match dep.unwrap_or("") {
        "aux" | "auxpass" => "aux",
        "poss" => "poss",
        "det" | "predet" => "det",
        "prep" => "prep",
        "dobj" => "dobj",
        "pobj" => "pobj",
        "obj" | "iobj" | "dative" => "object",
        "ROOT" | "root" => "root",
        "attr" | "acomp" | "oprd" => "predicate",
        "amod" | "advmod" | "npadvmod" | "nummod" | "compound" | "nmod" | "quantmod" => "modifier",
        "advcl" | "ccomp" | "xcomp" | "relcl" | "acl" | "pcomp" => "clause",
        _ => "dep",
    }
}

/// Lexical class from first-token heuristics.
pub fn lexical_class(content: &str) -> &'static str {
    let words = normalized_words(content);
    let Some(first) = words.first().map(String::as_str) else {
        return "generic";
    };
    let second = words.get(1).map(String::as_str);

    if first == "before" && second.is_some_and(|w| w.ends_with("ing")) {
        "before_ing"
    } else if MODAL_WORDS.contains(&first) {
        "modal_aux"
    } else if HAVE_FORMS.contains(&first) {
        "have_aux"
    } else if first == "the" {
        "def_article"
    } else if POSSESSIVES.contains(&first) || first.ends_with("'s") {
        "possessive"
    } else if TIME_SUBORDINATORS.contains(&first) {
        "time_subordinator"
    } else if REASON_SUBORDINATORS.contains(&first) {
        "reason_subordinator"
    } else if CONCESSION_SUBORDINATORS.contains(&first) {
        "concession_subordinator"
    } else if first.len() > 4 && first.ends_with("ing") {
        "ing_form"
    } else if first.len() > 3 && (first.ends_with("ed") || first.ends_with("en")) {
        "participle_form"
    } else {
        "generic"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextKey {
    pub level: &'static str,
    pub pos: String,
    pub dep: &'static str,
    pub tam: &'static str,
    pub lex: &'static str,
}

impl ContextKey {
    pub fn for_node(node: &Node, tam: &TamContext) -> Self {
        Self {
            level: node.node_type.level(),
            pos: node.part_of_speech.to_lowercase(),
            dep: collapse_dep(node.dep_label.as_deref()),
            tam: tam.bucket(),
            lex: lexical_class(&node.content),
        }
    }

    pub fn l1(&self) -> String {
        format!("{}|{}|{}|{}|{}", self.level, self.pos, self.dep, self.tam, self.lex)
    }

    pub fn l2(&self) -> String {
        format!("{}|{}|{}|{}", self.level, self.pos, self.dep, self.lex)
    }

    pub fn l3(&self) -> String {
        format!("{}|{}", self.level, self.pos)
    }

    pub fn l4(&self) -> String {
        self.level.to_string()
    }

    pub fn candidates(&self) -> CandidateKeys {
        CandidateKeys {
            l1: self.l1(),
            l2: self.l2(),
            l3: self.l3(),
            l4: self.l4(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::{NodeId, NodeType};

    #[test]
    fn test_lexical_classes() {
        assert_eq!(lexical_class("should"), "modal_aux");
        assert_eq!(lexical_class("had"), "have_aux");
        assert_eq!(lexical_class("The car"), "def_article");
        assert_eq!(lexical_class("her instincts"), "possessive");
        assert_eq!(lexical_class("John's car"), "possessive");
        assert_eq!(lexical_class("before finishing the report"), "before_ing");
        assert_eq!(lexical_class("before noon"), "time_subordinator");
        assert_eq!(lexical_class("because of it"), "reason_subordinator");
        assert_eq!(lexical_class("although tired"), "concession_subordinator");
        assert_eq!(lexical_class("running"), "ing_form");
        assert_eq!(lexical_class("repaired"), "participle_form");
        assert_eq!(lexical_class("car"), "generic");
        assert_eq!(lexical_class("  "), "generic");
    }

    #[test]
    fn test_dep_collapse() {
        assert_eq!(collapse_dep(Some("auxpass")), "aux");
        assert_eq!(collapse_dep(Some("dative")), "object");
        assert_eq!(collapse_dep(Some("npadvmod")), "modifier");
        assert_eq!(collapse_dep(Some("nsubj")), "dep");
        assert_eq!(collapse_dep(None), "dep");
    }

    #[test]
    fn test_keys_drop_fields_per_level() {
        let mut word = Node::blank(NodeType::Word, "should", NodeId::new(3));
        word.part_of_speech = "Auxiliary Verb".to_string();
        word.dep_label = Some("aux".to_string());
        let tam = TamContext {
            mood: Some("modal".to_string()),
            aspect: Some("perfect".to_string()),
            tense: None,
        };
        let key = ContextKey::for_node(&word, &tam);
        assert_eq!(key.l1(), "word|auxiliary verb|aux|modal_perfect|modal_aux");
        assert_eq!(key.l2(), "word|auxiliary verb|aux|modal_aux");
        assert_eq!(key.l3(), "word|auxiliary verb");
        assert_eq!(key.l4(), "word");
    }

    #[test]
    fn test_words_inherit_ancestor_tam() {
        let word = Node::blank(NodeType::Word, "have", NodeId::new(4));
        let parent = TamContext {
            mood: Some("modal".to_string()),
            aspect: Some("perfect_progressive".to_string()),
            tense: None,
        };
        let resolved = TamContext::resolve(&word, Some(&parent));
        assert_eq!(resolved.bucket(), "modal_perfect");
        assert!(resolved.is_modal_perfect());
        assert_eq!(TamContext::resolve(&word, None).bucket(), "none");
    }

    #[test]
    fn test_future_perfect_is_not_bucketed_as_modal_perfect() {
        let tam = TamContext {
            mood: Some("modal".to_string()),
            aspect: Some("perfect".to_string()),
            tense: Some("future perfect".to_string()),
        };
        assert_eq!(tam.bucket(), "none");
    }
}
