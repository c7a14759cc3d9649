//! Parser boundary types.
//!
//! The dependency parser itself lives outside this workspace. What crosses the
//! boundary is a spaCy-shaped token table: lemma, coarse and fine tags,
//! dependency label and head, and a `Key=Value|Key=Value` feature string.

use crate::model::SourceSpan;
use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphParseError {
    #[error("malformed morphological feature string `{0}`")]
    Malformed(String),
}

/// Morphological feature map of one token (`VerbForm`, `Tense`, `Number`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorphFeatures(BTreeMap<String, String>);

impl MorphFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn verb_form(&self) -> Option<&str> {
        self.get("VerbForm")
    }

    pub fn tense(&self) -> Option<&str> {
        self.get("Tense")
    }

    pub fn is_finite(&self) -> bool {
        self.verb_form() == Some("Fin")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

impl fmt::Display for MorphFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for MorphFeatures {
    type Error = MorphParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_features(&value)
    }
}

impl From<MorphFeatures> for String {
    fn from(features: MorphFeatures) -> String {
        features.to_string()
    }
}

impl Serialize for MorphFeatures {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MorphFeatures {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_features(&raw).map_err(serde::de::Error::custom)
    }
}

fn feature_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']'))(input)
}

fn feature_value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '|' && c != '=' && !c.is_whitespace())(input)
}

fn feature(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(feature_name, char('='), feature_value)(input)
}

fn feature_list(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    separated_list1(char('|'), feature)(input)
}

/// Parses `Aspect=Perf|Tense=Past|VerbForm=Part`. Empty input and the
/// CoNLL-U placeholder `_` mean "no features".
pub fn parse_features(input: &str) -> Result<MorphFeatures, MorphParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "_" {
        return Ok(MorphFeatures::default());
    }

    match all_consuming(feature_list)(trimmed) {
        Ok((_, pairs)) => Ok(MorphFeatures(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )),
        Err(_) => Err(MorphParseError::Malformed(input.to_string())),
    }
}

fn default_whitespace() -> bool {
    true
}

/// One token as produced by the external dependency parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedToken {
    pub text: String,
    /// Character offset of the token inside the sentence text.
    pub idx: usize,
    pub lemma: String,
    /// Coarse universal POS (`VERB`, `AUX`, `NOUN`, ...).
    pub pos: String,
    /// Fine-grained Penn tag (`MD`, `VBN`, `VBG`, ...).
    pub tag: String,
    pub dep: String,
    /// Index of the syntactic head inside the same sentence. Roots point at themselves.
    pub head: usize,
    #[serde(default)]
    pub morph: MorphFeatures,
    /// Whether trailing whitespace follows the token.
    #[serde(default = "default_whitespace")]
    pub whitespace: bool,
}

impl ParsedToken {
    pub fn end(&self) -> usize {
        self.idx + self.text.chars().count()
    }

    pub fn is_space(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn lower_text(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn lower_lemma(&self) -> String {
        self.lemma.to_lowercase()
    }
}

/// Half-open token index range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub text: String,
    pub tokens: Vec<ParsedToken>,
    #[serde(default)]
    pub noun_chunks: Vec<TokenRange>,
}

impl ParsedSentence {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Tokens that sit entirely inside `span`, in order.
    pub fn tokens_in(&self, span: SourceSpan) -> Vec<&ParsedToken> {
        self.tokens
            .iter()
            .filter(|t| t.idx >= span.start && t.end() <= span.end)
            .collect()
    }

    pub fn slice(&self, span: SourceSpan) -> String {
        slice_chars(&self.text, span.start, span.end)
    }
}

/// Substring by character offsets.
pub fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
