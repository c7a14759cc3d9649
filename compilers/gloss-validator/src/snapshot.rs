use crate::frozen::validate_frozen_structure;
use crate::issue::ValidationIssue;
use crate::ContractError;
use gloss_protocol::Document;
use serde_json::Value;

/// Read-only serialized copy of a skeleton, taken before any enrichment.
/// Enriched documents are diffed against it field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenSkeleton {
    snapshot: Value,
}

impl FrozenSkeleton {
    pub fn capture(skeleton: &Document) -> Result<Self, ContractError> {
        Ok(Self {
            snapshot: serde_json::to_value(skeleton)?,
        })
    }

    pub fn from_value(snapshot: Value) -> Self {
        Self { snapshot }
    }

    pub fn as_value(&self) -> &Value {
        &self.snapshot
    }

    pub fn sentence_count(&self) -> usize {
        self.snapshot.as_object().map_or(0, |sentences| sentences.len())
    }

    pub fn diff(&self, enriched: &Document) -> Result<Vec<ValidationIssue>, ContractError> {
        let enriched = serde_json::to_value(enriched)?;
        Ok(validate_frozen_structure(&self.snapshot, &enriched))
    }

    /// Fails with every changed frozen field when the enriched document
    /// rewrote any structure.
    pub fn verify(&self, enriched: &Document) -> Result<(), ContractError> {
        let issues = self.diff(enriched)?;
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ContractError::FrozenViolation { issues })
        }
    }
}
