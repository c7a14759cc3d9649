pub mod ids;
pub mod model;
pub mod morphology;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

// Re-export core types for convenience
pub use ids::NodeId;
pub use model::*;
pub use morphology::*;

/// Which rule set a document is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ValidationMode {
    /// Legacy documents: tolerates the string `"null"` in TAM fields.
    #[serde(rename = "v1")]
    V1,
    #[default]
    #[serde(rename = "v2_strict")]
    V2Strict,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::V1 => "v1",
            ValidationMode::V2Strict => "v2_strict",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, ValidationMode::V2Strict)
    }
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(ValidationMode::V1),
            "v2_strict" => Ok(ValidationMode::V2Strict),
            other => Err(format!("unknown validation mode `{other}` (expected v1 or v2_strict)")),
        }
    }
}
