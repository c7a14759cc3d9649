use crate::labels::{Aspect, Finiteness, Mood, Polarity, TamConstruction, TamSignals, Tense, Voice};
use gloss_protocol::{Node, ParsedToken};
use serde::{Deserialize, Serialize};

const MODAL_TAG: &str = "MD";
const PAST_PARTICIPLE_TAG: &str = "VBN";
const PRESENT_PARTICIPLE_TAG: &str = "VBG";
const PASSIVE_AUX_DEP: &str = "auxpass";
const NEGATION_DEP: &str = "neg";

const NEGATION_WORDS: [&str; 4] = ["not", "n't", "never", "no"];
const FUTURE_MODALS: [&str; 3] = ["will", "shall", "'ll"];

/// Labels detected for one sentence or phrase span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TamResult {
    pub tense: Option<Tense>,
    pub aspect: Aspect,
    pub mood: Mood,
    pub voice: Voice,
    pub finiteness: Finiteness,
    pub polarity: Polarity,
    pub construction: TamConstruction,
    /// Lemma of the first modal verb, if any.
    pub modal: Option<String>,
    pub signals: TamSignals,
}

impl TamResult {
    /// Short display form written to `Node::tense`: the tense alone for simple
    /// aspect, otherwise "tense aspect". Absent tense stays absent.
    pub fn tense_display(&self) -> Option<String> {
        self.tense.map(|tense| match self.aspect {
            Aspect::Simple => tense.as_str().to_string(),
            aspect => format!("{} {}", tense.as_str(), aspect.as_str()),
        })
    }

    /// Writes the TAM fields onto a node in place. Frozen fields are not touched.
    pub fn apply_to(&self, node: &mut Node) {
        node.tense = self.tense_display();
        node.aspect = Some(self.aspect.as_str().to_string());
        node.mood = Some(self.mood.as_str().to_string());
        node.voice = Some(self.voice.as_str().to_string());
        node.finiteness = Some(self.finiteness.as_str().to_string());
        node.tam_construction = self.construction.as_str().to_string();
    }
}

fn is_be(token: &ParsedToken) -> bool {
    token.lower_lemma() == "be"
}

fn is_have(token: &ParsedToken) -> bool {
    token.lower_lemma() == "have"
}

/// Detects tense, aspect, mood, voice, finiteness and the construction label
/// of a token span. Pure: equal input always yields an equal result.
pub fn detect_tam<'a, I>(tokens: I) -> TamResult
where
    I: IntoIterator<Item = &'a ParsedToken>,
{
    let tokens: Vec<&ParsedToken> = tokens.into_iter().filter(|t| !t.is_space()).collect();
    let mut signals = TamSignals::empty();

    let modal = tokens
        .iter()
        .find(|t| t.tag == MODAL_TAG)
        .map(|t| t.lower_lemma());
    if modal.is_some() {
        signals |= TamSignals::MODAL;
    }

    if tokens.iter().any(|t| {
        t.dep == NEGATION_DEP || NEGATION_WORDS.contains(&t.lower_text().as_str())
    }) {
        signals |= TamSignals::NEGATION;
    }

    let has_be = tokens.iter().any(|t| is_be(t));
    let has_have = tokens.iter().any(|t| is_have(t));
    // "been" is the participle of "be" itself: "has been happy" and "has been running" stay active.
    let has_lexical_participle = tokens
        .iter()
        .any(|t| t.tag == PAST_PARTICIPLE_TAG && !is_be(t));
    let has_past_participle = tokens.iter().any(|t| t.tag == PAST_PARTICIPLE_TAG);
    let has_present_participle = tokens.iter().any(|t| t.tag == PRESENT_PARTICIPLE_TAG);
    let has_being = tokens.iter().any(|t| t.lower_text() == "being");

    if tokens.iter().any(|t| t.dep == PASSIVE_AUX_DEP) || (has_be && has_lexical_participle) {
        signals |= TamSignals::PASSIVE;
    }
    if has_have && has_past_participle {
        signals |= TamSignals::PERFECT;
    }
    if (has_be && has_present_participle) || (has_being && has_past_participle) {
        signals |= TamSignals::PROGRESSIVE;
    }
    if tokens
        .iter()
        .any(|t| FUTURE_MODALS.contains(&t.lower_lemma().as_str()))
    {
        signals |= TamSignals::FUTURE;
    }
    if tokens.iter().any(|t| t.morph.is_finite() || t.tag == MODAL_TAG) {
        signals |= TamSignals::FINITE;
    }

    let perfect = signals.contains(TamSignals::PERFECT);
    let progressive = signals.contains(TamSignals::PROGRESSIVE);
    let is_modal = signals.contains(TamSignals::MODAL);
    let future = signals.contains(TamSignals::FUTURE);

    let aspect = match (perfect, progressive) {
        (true, true) => Aspect::PerfectProgressive,
        (true, false) => Aspect::Perfect,
        (false, true) => Aspect::Progressive,
        (false, false) => Aspect::Simple,
    };

    // A modal carries no tense of its own: "should have trusted" is not past.
    let tense = if future {
        Some(Tense::Future)
    } else if is_modal && perfect {
        None
    } else {
        let anchor = tokens
            .iter()
            .find(|t| t.morph.is_finite())
            .or_else(|| tokens.first());
        anchor.and_then(|t| match t.morph.tense() {
            Some("Past") => Some(Tense::Past),
            Some("Pres") => Some(Tense::Present),
            _ => None,
        })
    };

    let construction = if is_modal && perfect && !future {
        TamConstruction::ModalPerfect
    } else if perfect && tense == Some(Tense::Past) && !is_modal {
        TamConstruction::PastPerfect
    } else if perfect && tense == Some(Tense::Present) && !is_modal {
        TamConstruction::PresentPerfect
    } else if perfect && future {
        TamConstruction::FuturePerfect
    } else {
        TamConstruction::None
    };

    TamResult {
        tense,
        aspect,
        mood: if is_modal { Mood::Modal } else { Mood::Indicative },
        voice: if signals.contains(TamSignals::PASSIVE) { Voice::Passive } else { Voice::Active },
        finiteness: if signals.contains(TamSignals::FINITE) {
            Finiteness::Finite
        } else {
            Finiteness::NonFinite
        },
        polarity: if signals.contains(TamSignals::NEGATION) {
            Polarity::Negative
        } else {
            Polarity::Affirmative
        },
        construction,
        modal,
        signals,
    }
}
