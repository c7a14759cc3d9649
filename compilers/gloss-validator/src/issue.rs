use serde::{Deserialize, Serialize};
use std::fmt;

/// One violation, located by a path such as
/// `["She left."].linguistic_elements[0].tense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub(crate) fn sentence_path(key: &str) -> String {
    format!("[{key:?}]")
}

pub(crate) fn field_path(path: &str, field: &str) -> String {
    format!("{path}.{field}")
}

pub(crate) fn child_path(path: &str, index: usize) -> String {
    format!("{path}.linguistic_elements[{index}]")
}
