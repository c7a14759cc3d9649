//! Template registry and selector: maps every node to a canonical note
//! template through a four-level backoff chain and renders a reproducible
//! variant.

pub mod compat;
pub mod context;
pub mod notes;
pub mod registry;
pub mod render;
pub mod select;

pub use compat::is_semantically_compatible;
pub use context::{ContextKey, TamContext};
pub use notes::{
    backoff_summary, NoteAssigner, NoteGates, NoteGenerator, NoteRequest, BACKOFF_USED, NOTE_DUPLICATE,
    NOTE_INVALID, NOTE_UNSUITABLE,
};
pub use registry::TemplateRegistry;
pub use render::{normalize_content, render_note, variant_index};
pub use select::select_template;
