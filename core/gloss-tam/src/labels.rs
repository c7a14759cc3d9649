use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
    Future,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::Future => "future",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Simple,
    Perfect,
    Progressive,
    PerfectProgressive,
}

impl Aspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Simple => "simple",
            Aspect::Perfect => "perfect",
            Aspect::Progressive => "progressive",
            Aspect::PerfectProgressive => "perfect_progressive",
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, Aspect::Perfect | Aspect::PerfectProgressive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Indicative,
    Modal,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Indicative => "indicative",
            Mood::Modal => "modal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Active,
    Passive,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Active => "active",
            Voice::Passive => "passive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Finiteness {
    Finite,
    NonFinite,
}

impl Finiteness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finiteness::Finite => "finite",
            Finiteness::NonFinite => "non-finite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamConstruction {
    ModalPerfect,
    PastPerfect,
    PresentPerfect,
    FuturePerfect,
    None,
}

impl TamConstruction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TamConstruction::ModalPerfect => "modal_perfect",
            TamConstruction::PastPerfect => "past_perfect",
            TamConstruction::PresentPerfect => "present_perfect",
            TamConstruction::FuturePerfect => "future_perfect",
            TamConstruction::None => "none",
        }
    }
}

bitflags! {
    /// Raw evidence collected from one token span before labels are resolved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TamSignals: u16 {
        const MODAL = 1;
        const NEGATION = 2;
        const PASSIVE = 4;
        const PERFECT = 8;
        const PROGRESSIVE = 16;
        const FUTURE = 32;
        const FINITE = 64;
    }
}
