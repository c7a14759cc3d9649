use unicode_normalization::UnicodeNormalization;

fn fold_quote(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '`' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' | '\u{2033}' => '"',
        other => other,
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ',' | ';' | ':' | '\u{2026}')
}

/// Candidate text with its trailing punctuation split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Text without terminal punctuation, e.g. `Bad output`.
    pub core: String,
    /// Canonical terminator: `?` or `!` when present in the trailing run, else `.`.
    pub terminator: char,
}

impl Normalized {
    pub fn text(&self) -> String {
        format!("{}{}", self.core, self.terminator)
    }

    /// Case-insensitive dedup key. The terminator is not part of it.
    pub fn key(&self) -> String {
        self.core.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}

/// NFKC, quote folding, whitespace collapse, outer-quote stripping and
/// trailing punctuation canonicalization.
pub fn normalize_candidate(raw: &str) -> Normalized {
    let folded: String = raw.nfkc().map(fold_quote).collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    let unquoted = strip_outer_quotes(&collapsed);

    let core = unquoted.trim_end_matches(|c: char| is_terminal(c) || c.is_whitespace());
    let tail = &unquoted[core.len()..];
    let terminator = if tail.contains('?') {
        '?'
    } else if tail.contains('!') {
        '!'
    } else {
        '.'
    };
    Normalized {
        core: core.to_string(),
        terminator,
    }
}

fn strip_outer_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    text
}
