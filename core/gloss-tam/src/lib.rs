pub mod annotate;
pub mod labels;
pub mod rules;

pub use annotate::{annotate_document, annotate_sentence};
pub use labels::*;
pub use rules::{detect_tam, TamResult};
