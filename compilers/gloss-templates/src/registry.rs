//! Template tables. Built once, read-only afterwards.

use gloss_protocol::{NodeType, SelectionLevel};
use std::collections::HashMap;

const L1_TABLE: &[(&str, &str)] = &[
    ("sentence|sentence|dep|modal_perfect|generic", "SENTENCE_MODAL_PERFECT"),
    ("phrase|verb phrase|root|modal_perfect|modal_aux", "PHRASE_MODAL_PERFECT"),
    ("phrase|noun phrase|dobj|none|possessive", "PHRASE_POSSESSIVE_OBJECT"),
    ("phrase|prepositional phrase|prep|none|before_ing", "PHRASE_BEFORE_ING"),
    ("word|auxiliary verb|aux|modal_perfect|modal_aux", "WORD_AUX_MODAL_PERFECT"),
    ("word|auxiliary verb|aux|modal_perfect|have_aux", "WORD_AUX_HAVE_PERFECT"),
    ("word|verb|root|modal_perfect|participle_form", "WORD_PARTICIPLE_MODAL_PERFECT"),
    ("word|verb|root|none|participle_form", "WORD_PARTICIPLE"),
    ("word|determiner|det|none|def_article", "WORD_DEF_ARTICLE"),
    ("word|pronoun|poss|none|possessive", "WORD_POSSESSIVE"),
];

const L2_TABLE: &[(&str, &str)] = &[
    ("sentence|sentence|dep|generic", "SENTENCE_CLAUSE"),
    ("phrase|verb phrase|root|modal_aux", "PHRASE_MODAL_VERB"),
    ("phrase|verb phrase|root|generic", "PHRASE_PREDICATE"),
    ("phrase|verb phrase|root|have_aux", "PHRASE_PERFECT_VERB"),
    ("phrase|noun phrase|dep|def_article", "PHRASE_DEFINITE_NOUN"),
    ("phrase|noun phrase|dobj|def_article", "PHRASE_DEFINITE_NOUN"),
    ("phrase|noun phrase|dobj|possessive", "PHRASE_POSSESSIVE_OBJECT"),
    ("phrase|prepositional phrase|prep|time_subordinator", "PHRASE_TEMPORAL"),
    ("word|auxiliary verb|aux|modal_aux", "WORD_AUX_MODAL"),
    ("word|auxiliary verb|aux|have_aux", "WORD_AUX_HAVE"),
    ("word|auxiliary verb|aux|generic", "WORD_AUX_SUPPORT"),
    ("word|pronoun|poss|possessive", "WORD_POSSESSIVE"),
    ("word|determiner|det|def_article", "WORD_DEF_ARTICLE"),
    ("word|noun|dobj|generic", "WORD_NOUN_OBJECT"),
    ("word|preposition|prep|time_subordinator", "WORD_TEMPORAL_PREPOSITION"),
    ("word|verb|clause|ing_form", "WORD_GERUND"),
    ("word|verb|root|participle_form", "WORD_PARTICIPLE"),
];

const L3_TABLE: &[(&str, &str)] = &[
    ("sentence|sentence", "SENTENCE_DECLARATIVE"),
    ("phrase|noun phrase", "PHRASE_NOUN"),
    ("phrase|verb phrase", "PHRASE_VERB"),
    ("phrase|prepositional phrase", "PHRASE_PREPOSITIONAL"),
    ("word|noun", "WORD_NOUN"),
    ("word|proper noun", "WORD_NOUN"),
    ("word|verb", "WORD_VERB"),
    ("word|auxiliary verb", "WORD_AUX"),
    ("word|determiner", "WORD_DETERMINER"),
    ("word|pronoun", "WORD_PRONOUN"),
    ("word|preposition", "WORD_PREPOSITION"),
    ("word|adjective", "WORD_ADJECTIVE"),
    ("word|adverb", "WORD_ADVERB"),
];

const VARIANTS: &[(&str, &[&str])] = &[
    ("SENTENCE_MODAL_PERFECT", &[
        "The sentence uses a modal perfect: a modal plus \"have\" and a past participle looks back at an unrealized or judged past action.",
        "\"{content}\" evaluates a past situation through a modal perfect; the modal itself carries no tense.",
    ]),
    ("SENTENCE_CLAUSE", &[
        "A single independent clause built around one main predicate.",
        "\"{content}\" is one independent clause with a single main verb.",
    ]),
    ("SENTENCE_DECLARATIVE", &[
        "A declarative sentence stating a fact or situation.",
        "This is a declarative statement.",
    ]),
    ("SENTENCE_GENERIC", &[
        "A complete sentence.",
        "\"{content}\" is a complete sentence.",
    ]),
    ("PHRASE_MODAL_PERFECT", &[
        "\"{content}\" is a modal perfect verb phrase: modal + have + past participle.",
        "Modal perfect: the speaker judges a past action that did or did not happen.",
        "The modal, \"have\" and the past participle together express hindsight about the past.",
    ]),
    ("PHRASE_MODAL_VERB", &[
        "A verb phrase headed by a modal auxiliary expressing ability, permission or likelihood.",
        "\"{content}\" combines a modal auxiliary with a bare infinitive.",
    ]),
    ("PHRASE_PERFECT_VERB", &[
        "A perfect verb phrase: a form of \"have\" plus a past participle.",
        "\"{content}\" links a completed action to a later reference point.",
    ]),
    ("PHRASE_PREDICATE", &[
        "The predicate of the clause: the main verb with its auxiliaries.",
        "\"{content}\" is the verbal core of the sentence.",
    ]),
    ("PHRASE_VERB", &[
        "A verb phrase.",
        "\"{content}\" is a verb phrase.",
    ]),
    ("PHRASE_POSSESSIVE_OBJECT", &[
        "A noun phrase introduced by a possessive determiner, used as the object.",
        "\"{content}\" names what is owned and acts as the direct object.",
    ]),
    ("PHRASE_DEFINITE_NOUN", &[
        "A definite noun phrase: \"the\" marks something already known or identifiable.",
        "\"{content}\" refers to a specific, identifiable thing.",
    ]),
    ("PHRASE_NOUN", &[
        "A noun phrase.",
        "\"{content}\" is a noun phrase naming a person, thing or idea.",
    ]),
    ("PHRASE_BEFORE_ING", &[
        "\"before\" + -ing form: the action in the gerund happens after the main action.",
        "A time phrase using \"before\" followed by a gerund instead of a full clause.",
    ]),
    ("PHRASE_TEMPORAL", &[
        "A prepositional phrase locating the event in time.",
        "\"{content}\" tells us when something happens.",
    ]),
    ("PHRASE_PREPOSITIONAL", &[
        "A prepositional phrase.",
        "\"{content}\" is a prepositional phrase.",
    ]),
    ("PHRASE_GENERIC", &[
        "A phrase.",
        "\"{content}\" forms one phrase.",
    ]),
    ("WORD_AUX_MODAL_PERFECT", &[
        "Modal auxiliary opening a modal perfect; it adds judgment, not tense.",
        "\"{content}\" is the modal in a modal perfect construction.",
    ]),
    ("WORD_AUX_MODAL", &[
        "Modal auxiliary verb.",
        "\"{content}\" is a modal auxiliary; it is followed by a bare infinitive.",
    ]),
    ("WORD_AUX_HAVE_PERFECT", &[
        "Bare \"have\" after a modal, forming the perfect.",
        "\"{content}\" links the modal to the past participle in a modal perfect.",
    ]),
    ("WORD_AUX_HAVE", &[
        "Auxiliary \"have\" forming a perfect tense.",
        "\"{content}\" is the perfect auxiliary.",
    ]),
    ("WORD_AUX_SUPPORT", &[
        "Auxiliary verb supporting the main verb.",
        "\"{content}\" is an auxiliary carrying tense or voice.",
    ]),
    ("WORD_AUX", &[
        "Auxiliary verb.",
        "\"{content}\" is an auxiliary verb.",
    ]),
    ("WORD_PARTICIPLE_MODAL_PERFECT", &[
        "Past participle completing a modal perfect.",
        "\"{content}\" is the past participle after modal + have.",
    ]),
    ("WORD_PARTICIPLE", &[
        "Past participle used as the main verb.",
        "\"{content}\" is a past participle.",
    ]),
    ("WORD_GERUND", &[
        "-ing form used as a noun-like complement (gerund).",
        "\"{content}\" is a gerund.",
    ]),
    ("WORD_VERB", &[
        "Main verb.",
        "\"{content}\" is a verb.",
    ]),
    ("WORD_DEF_ARTICLE", &[
        "Definite article: points to something specific.",
        "\"the\" marks the noun as definite.",
    ]),
    ("WORD_DETERMINER", &[
        "Determiner introducing a noun.",
        "\"{content}\" is a determiner.",
    ]),
    ("WORD_POSSESSIVE", &[
        "Possessive determiner showing ownership.",
        "\"{content}\" shows who something belongs to.",
    ]),
    ("WORD_PRONOUN", &[
        "Pronoun standing in for a noun.",
        "\"{content}\" is a pronoun.",
    ]),
    ("WORD_NOUN_OBJECT", &[
        "Noun acting as the direct object.",
        "\"{content}\" receives the action of the verb.",
    ]),
    ("WORD_NOUN", &[
        "Noun.",
        "\"{content}\" is a noun.",
    ]),
    ("WORD_TEMPORAL_PREPOSITION", &[
        "Preposition of time.",
        "\"{content}\" introduces a time expression.",
    ]),
    ("WORD_PREPOSITION", &[
        "Preposition.",
        "\"{content}\" is a preposition.",
    ]),
    ("WORD_ADJECTIVE", &[
        "Adjective describing a noun.",
        "\"{content}\" is an adjective.",
    ]),
    ("WORD_ADVERB", &[
        "Adverb modifying a verb, adjective or clause.",
        "\"{content}\" is an adverb.",
    ]),
    ("WORD_GENERIC", &[
        "A word in the sentence.",
        "\"{content}\" is a single word.",
    ]),
];

/// Four-level template registry: three keyed tables plus a per-level default.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    l1: HashMap<String, String>,
    l2: HashMap<String, String>,
    l3: HashMap<String, String>,
    variants: HashMap<String, Vec<String>>,
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, id)| (key.to_string(), id.to_string()))
        .collect()
}

impl TemplateRegistry {
    /// Built-in English templates.
    pub fn standard() -> Self {
        Self {
            l1: table(L1_TABLE),
            l2: table(L2_TABLE),
            l3: table(L3_TABLE),
            variants: VARIANTS
                .iter()
                .map(|(id, texts)| (id.to_string(), texts.iter().map(|t| t.to_string()).collect()))
                .collect(),
        }
    }

    /// Adds or replaces a keyed entry. Only meaningful before the registry is
    /// shared; `L4_FALLBACK` entries are ignored.
    pub fn with_template(mut self, level: SelectionLevel, key: &str, template_id: &str) -> Self {
        let table = match level {
            SelectionLevel::L1Exact => &mut self.l1,
            SelectionLevel::L2DropTam => &mut self.l2,
            SelectionLevel::L3LevelPos => &mut self.l3,
            SelectionLevel::L4Fallback => return self,
        };
        table.insert(key.to_string(), template_id.to_string());
        self
    }

    pub fn with_variants(mut self, template_id: &str, variants: &[&str]) -> Self {
        self.variants
            .insert(template_id.to_string(), variants.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Looks up one of the keyed levels. `L4_FALLBACK` is never keyed; use [`Self::fallback`].
    pub fn lookup(&self, level: SelectionLevel, key: &str) -> Option<&str> {
        let table = match level {
            SelectionLevel::L1Exact => &self.l1,
            SelectionLevel::L2DropTam => &self.l2,
            SelectionLevel::L3LevelPos => &self.l3,
            SelectionLevel::L4Fallback => return None,
        };
        table.get(key).map(String::as_str)
    }

    pub fn contains_l1(&self, key: &str) -> bool {
        self.l1.contains_key(key)
    }

    /// The guaranteed default for a node level.
    pub fn fallback(&self, node_type: NodeType) -> &'static str {
        match node_type {
            NodeType::Sentence => "SENTENCE_GENERIC",
            NodeType::Phrase => "PHRASE_GENERIC",
            NodeType::Word => "WORD_GENERIC",
        }
    }

    pub fn variants(&self, template_id: &str) -> &[String] {
        self.variants.get(template_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Template ids referenced by a table or fallback but lacking variants.
    /// Non-empty means the registry is misconfigured.
    pub fn missing_variants(&self) -> Vec<String> {
        let fallbacks = NodeType::ALL.map(|t| self.fallback(t).to_string());
        let mut missing: Vec<String> = self
            .l1
            .values()
            .chain(self.l2.values())
            .chain(self.l3.values())
            .chain(fallbacks.iter())
            .filter(|id| self.variants(id).is_empty())
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}
