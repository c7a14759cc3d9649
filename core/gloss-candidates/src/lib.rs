//! Rejected-candidate normalizer: canonicalizes, deduplicates and filters
//! note candidates a generator produced but the gates refused. The output
//! feeds diagnostics and offline hard-negative mining.

pub mod collect;
pub mod normalize;
pub mod policy;

pub use collect::collect_rejected_candidates;
pub use normalize::{normalize_candidate, Normalized};
pub use policy::{CandidatePolicy, DEFAULT_STOP_PATTERNS};

use gloss_protocol::RejectedCandidateStat;
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("invalid stop pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A bare string or a `{text, reason, count}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCandidate {
    Text(String),
    Record {
        text: String,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default = "one")]
        count: u32,
    },
}

fn one() -> u32 {
    1
}

impl RawCandidate {
    pub fn text(&self) -> &str {
        match self {
            RawCandidate::Text(text) | RawCandidate::Record { text, .. } => text,
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            RawCandidate::Text(_) => None,
            RawCandidate::Record { reason, .. } => reason.as_deref(),
        }
    }

    fn count(&self) -> u32 {
        match self {
            RawCandidate::Text(_) => 1,
            RawCandidate::Record { count, .. } => *count,
        }
    }
}

impl From<&str> for RawCandidate {
    fn from(text: &str) -> Self {
        RawCandidate::Text(text.to_string())
    }
}

/// Deduplicated survivors in first-seen order, with per-candidate stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCandidates {
    pub candidates: Vec<String>,
    pub stats: Vec<RejectedCandidateStat>,
}

impl NormalizedCandidates {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Empty,
    StopPattern,
    Echo,
    TooShort,
}

/// A compiled [`CandidatePolicy`].
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    stop_patterns: Vec<Regex>,
    min_length: usize,
    short_tokens: Vec<String>,
    echo_allowlist: Vec<String>,
}

impl CandidateFilter {
    pub fn new(policy: &CandidatePolicy) -> Result<Self, CandidateError> {
        Ok(Self {
            stop_patterns: policy.compile()?,
            min_length: policy.min_length,
            short_tokens: policy.short_token_allowlist.iter().map(|t| normalize_candidate(t).key()).collect(),
            echo_allowlist: policy.echo_allowlist.iter().map(|t| normalize_candidate(t).key()).collect(),
        })
    }

    /// Normalizes, merges duplicates (summing counts, unioning reasons) and
    /// drops candidates the policy rejects. `sentence` enables the echo filter.
    pub fn normalize(&self, raw: &[RawCandidate], sentence: Option<&str>) -> NormalizedCandidates {
        let mut merged: IndexMap<String, RejectedCandidateStat> = IndexMap::new();
        for candidate in raw {
            let normalized = normalize_candidate(candidate.text());
            let entry = merged.entry(normalized.key()).or_insert_with(|| RejectedCandidateStat {
                text: normalized.text(),
                count: 0,
                reasons: Vec::new(),
            });
            entry.count = entry.count.saturating_add(candidate.count());
            if let Some(reason) = candidate.reason().map(str::trim).filter(|r| !r.is_empty()) {
                if !entry.reasons.iter().any(|r| r == reason) {
                    entry.reasons.push(reason.to_string());
                }
            }
        }

        let sentence_key = sentence.map(|s| normalize_candidate(s).key());
        let mut output = NormalizedCandidates::default();
        for (key, stat) in merged {
            if let Some(why) = self.drop_reason(&key, sentence_key.as_deref()) {
                debug!("dropping candidate {:?} x{}: {:?}", stat.text, stat.count, why);
                continue;
            }
            output.candidates.push(stat.text.clone());
            output.stats.push(stat);
        }
        output
    }

    fn drop_reason(&self, key: &str, sentence_key: Option<&str>) -> Option<Rejection> {
        if key.is_empty() {
            return Some(Rejection::Empty);
        }
        if self.stop_patterns.iter().any(|pattern| pattern.is_match(key)) {
            return Some(Rejection::StopPattern);
        }
        if let Some(sentence) = sentence_key.filter(|s| !s.is_empty()) {
            if key.starts_with(sentence) && !self.echo_allowlist.iter().any(|allowed| allowed == key) {
                return Some(Rejection::Echo);
            }
        }
        if key.chars().count() < self.min_length && !self.short_tokens.iter().any(|allowed| allowed == key) {
            return Some(Rejection::TooShort);
        }
        None
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        let policy = CandidatePolicy::default();
        Self {
            stop_patterns: DEFAULT_STOP_PATTERNS
                .iter()
                .filter_map(|pattern| Regex::new(pattern).ok())
                .collect(),
            min_length: policy.min_length,
            short_tokens: Vec::new(),
            echo_allowlist: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(text: &str, reason: &str) -> RawCandidate {
        RawCandidate::Record {
            text: text.to_string(),
            reason: Some(reason.to_string()),
            count: 1,
        }
    }

    #[test]
    fn test_duplicates_merge_counts_and_reasons() {
        let raw = vec![
            record("Bad output.", "note_invalid"),
            record("Bad output", "note_duplicate"),
            record("Bad output.", "note_invalid"),
        ];
        let result = CandidateFilter::default().normalize(&raw, None);
        assert_eq!(result.candidates, vec!["Bad output."]);
        assert_eq!(result.stats.len(), 1);
        assert_eq!(result.stats[0].count, 3);
        assert_eq!(result.stats[0].reasons, vec!["note_invalid", "note_duplicate"]);
    }

    #[test]
    fn test_records_and_strings_mix() {
        let raw: Vec<RawCandidate> =
            serde_json::from_str(r#"["Hello there", {"text": "hello there!", "reason": "r1", "count": 4}, {"text": "Other note"}]"#)
                .unwrap();
        let result = CandidateFilter::default().normalize(&raw, None);
        assert_eq!(result.candidates, vec!["Hello there.", "Other note."]);
        assert_eq!(result.stats[0].count, 5);
        assert_eq!(result.stats[0].reasons, vec!["r1"]);
        assert_eq!(result.stats[1].count, 1);
    }

    #[test]
    fn test_stop_patterns() {
        let raw: Vec<RawCandidate> = ["{content}", "N/A", "***", "Output: a verb", "Genuine note"]
            .into_iter()
            .map(RawCandidate::from)
            .collect();
        let result = CandidateFilter::default().normalize(&raw, None);
        assert_eq!(result.candidates, vec!["Genuine note."]);
    }

    #[test]
    fn test_echo_filter_and_allowlist() {
        let sentence = "She is not running.";
        let raw: Vec<RawCandidate> = ["She is not running, because...", "she is not running", "Negated progressive"]
            .into_iter()
            .map(RawCandidate::from)
            .collect();
        let result = CandidateFilter::default().normalize(&raw, Some(sentence));
        assert_eq!(result.candidates, vec!["Negated progressive."]);

        let policy = CandidatePolicy {
            echo_allowlist: vec!["She is not running.".to_string()],
            ..CandidatePolicy::default()
        };
        let result = CandidateFilter::new(&policy).unwrap().normalize(&raw, Some(sentence));
        assert_eq!(result.candidates, vec!["she is not running.", "Negated progressive."]);
    }

    #[test]
    fn test_min_length_and_short_tokens() {
        let raw: Vec<RawCandidate> = ["Ok", "No.", "Fine"].into_iter().map(RawCandidate::from).collect();
        let result = CandidateFilter::default().normalize(&raw, None);
        assert_eq!(result.candidates, vec!["Fine."]);

        let policy = CandidatePolicy {
            short_token_allowlist: vec!["no".to_string()],
            ..CandidatePolicy::default()
        };
        let result = CandidateFilter::new(&policy).unwrap().normalize(&raw, None);
        assert_eq!(result.candidates, vec!["No.", "Fine."]);
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let policy = CandidatePolicy {
            stop_patterns: vec!["(unclosed".to_string()],
            ..CandidatePolicy::default()
        };
        let error = CandidateFilter::new(&policy).unwrap_err();
        assert!(error.to_string().starts_with("invalid stop pattern `(unclosed`"));
    }

    #[test]
    fn test_policy_defaults_from_partial_json() {
        let policy: CandidatePolicy = serde_json::from_str(r#"{"min_length": 5}"#).unwrap();
        assert_eq!(policy.min_length, 5);
        assert_eq!(policy.stop_patterns.len(), DEFAULT_STOP_PATTERNS.len());
    }

    proptest! {
        #[test]
        fn test_total_count_is_preserved(texts in proptest::collection::vec("[A-Za-z]{3,6}[ .!]{0,3}", 0..20)) {
            let policy = CandidatePolicy { stop_patterns: Vec::new(), ..CandidatePolicy::default() };
            let filter = CandidateFilter::new(&policy).unwrap();
            let raw: Vec<RawCandidate> = texts.iter().map(|t| RawCandidate::from(t.as_str())).collect();
            let result = filter.normalize(&raw, None);
            let total: u32 = result.stats.iter().map(|s| s.count).sum();
            prop_assert_eq!(total as usize, raw.len());
            let mut keys: Vec<String> = result.candidates.iter().map(|c| normalize_candidate(c).key()).collect();
            let before = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), before);
        }
    }
}
