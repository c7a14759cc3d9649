use crate::CandidateError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stop patterns for known generator garbage: unresolved placeholders,
/// bare null-ish answers, punctuation-only output and meta chatter.
pub const DEFAULT_STOP_PATTERNS: [&str; 5] = [
    r"\{[^}]*\}",
    r"(?i)^(n/?a|none|null|nil|todo|tbd|undefined)$",
    r"^[\W_]+$",
    r"(?i)^(note|output|answer|explanation)\s*:",
    r"(?i)\bas an ai\b",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidatePolicy {
    /// Regexes matched against the normalized candidate text.
    pub stop_patterns: Vec<String>,
    /// Minimum length in characters, terminal punctuation excluded.
    pub min_length: usize,
    /// Short candidates kept despite `min_length` (case-insensitive).
    pub short_token_allowlist: Vec<String>,
    /// Candidates kept even when they open by repeating the sentence.
    pub echo_allowlist: Vec<String>,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            stop_patterns: DEFAULT_STOP_PATTERNS.iter().map(|p| p.to_string()).collect(),
            min_length: 3,
            short_token_allowlist: Vec::new(),
            echo_allowlist: Vec::new(),
        }
    }
}

impl CandidatePolicy {
    pub fn compile(&self) -> Result<Vec<Regex>, CandidateError> {
        self.stop_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| CandidateError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}
