use gloss_candidates::CandidatePolicy;
use gloss_protocol::ValidationMode;
use gloss_templates::NoteGates;
use serde::{Deserialize, Serialize};

/// Pipeline settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub validation_mode: ValidationMode,
    pub candidate_policy: CandidatePolicy,
    pub note_gates: NoteGates,
    /// Process batch documents on the rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::V2Strict,
            candidate_policy: CandidatePolicy::default(),
            note_gates: NoteGates::default(),
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config = PipelineConfig::from_json(r#"{"validation_mode": "v1", "note_gates": {"max_chars": 80}}"#).unwrap();
        assert_eq!(config.validation_mode, ValidationMode::V1);
        assert_eq!(config.note_gates.max_chars, 80);
        assert_eq!(config.note_gates.min_chars, 12);
        assert!(config.parallel);
        assert_eq!(config.candidate_policy.min_length, 3);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(PipelineConfig::from_json("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(PipelineConfig::from_json(r#"{"validation_mode": "v3"}"#).is_err());
    }
}
