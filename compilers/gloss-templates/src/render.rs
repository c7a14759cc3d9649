use crate::registry::TemplateRegistry;
use sha2::{Digest, Sha256};

/// Lowercased, whitespace-collapsed content used in the variant hash.
pub fn normalize_content(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Stable variant index: first 8 hex digits of
/// SHA-256(`template_id|normalized_content|matched_key`) modulo `count`.
pub fn variant_index(template_id: &str, content: &str, matched_key: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let payload = format!("{template_id}|{}|{matched_key}", normalize_content(content));
    let digest = Sha256::digest(payload.as_bytes());
    // Eight hex digits are the first four bytes, big-endian.
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    prefix as usize % count
}

/// Renders the chosen variant, filling `{content}`. `None` only when the
/// template id has no variants, which is a registry configuration bug.
pub fn render_note(
    registry: &TemplateRegistry,
    template_id: &str,
    content: &str,
    matched_key: &str,
) -> Option<String> {
    let variants = registry.variants(template_id);
    if variants.is_empty() {
        return None;
    }
    let index = variant_index(template_id, content, matched_key, variants.len());
    Some(variants[index].replace("{content}", content.trim()))
}
