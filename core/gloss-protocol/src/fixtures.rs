//! Hand-checked parser output for a handful of English sentences, shaped the
//! way the spaCy small English model tags them.

use crate::morphology::{parse_features, ParsedSentence, ParsedToken, TokenRange};

#[allow(clippy::too_many_arguments)]
fn tok(text: &str, idx: usize, lemma: &str, pos: &str, tag: &str, dep: &str, head: usize, morph: &str) -> ParsedToken {
    ParsedToken {
        text: text.to_string(),
        idx,
        lemma: lemma.to_string(),
        pos: pos.to_string(),
        tag: tag.to_string(),
        dep: dep.to_string(),
        head,
        morph: parse_features(morph).unwrap_or_default(),
        whitespace: true,
    }
}

fn sentence(text: &str, tokens: Vec<ParsedToken>, chunks: &[(usize, usize)]) -> ParsedSentence {
    ParsedSentence {
        text: text.to_string(),
        tokens,
        noun_chunks: chunks.iter().map(|&(s, e)| TokenRange::new(s, e)).collect(),
    }
}

/// "She should have trusted her instincts." (modal perfect)
pub fn should_have_trusted() -> ParsedSentence {
    sentence(
        "She should have trusted her instincts.",
        vec![
            tok("She", 0, "she", "PRON", "PRP", "nsubj", 3, "Case=Nom|Gender=Fem|Number=Sing|Person=3|PronType=Prs"),
            tok("should", 4, "should", "AUX", "MD", "aux", 3, "VerbForm=Fin"),
            tok("have", 11, "have", "AUX", "VB", "aux", 3, "VerbForm=Inf"),
            tok("trusted", 16, "trust", "VERB", "VBN", "ROOT", 3, "Aspect=Perf|Tense=Past|VerbForm=Part"),
            tok("her", 24, "her", "PRON", "PRP$", "poss", 5, "Gender=Fem|Number=Sing|Person=3|Poss=Yes|PronType=Prs"),
            tok("instincts", 28, "instinct", "NOUN", "NNS", "dobj", 3, "Number=Plur"),
            tok(".", 37, ".", "PUNCT", ".", "punct", 3, "PunctType=Peri"),
        ],
        &[(0, 1), (4, 6)],
    )
}

/// "She had trusted her instincts." (past perfect)
pub fn had_trusted() -> ParsedSentence {
    sentence(
        "She had trusted her instincts.",
        vec![
            tok("She", 0, "she", "PRON", "PRP", "nsubj", 2, "Case=Nom|Gender=Fem|Number=Sing|Person=3|PronType=Prs"),
            tok("had", 4, "have", "AUX", "VBD", "aux", 2, "Mood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin"),
            tok("trusted", 8, "trust", "VERB", "VBN", "ROOT", 2, "Aspect=Perf|Tense=Past|VerbForm=Part"),
            tok("her", 16, "her", "PRON", "PRP$", "poss", 4, "Gender=Fem|Number=Sing|Person=3|Poss=Yes|PronType=Prs"),
            tok("instincts", 20, "instinct", "NOUN", "NNS", "dobj", 2, "Number=Plur"),
            tok(".", 29, ".", "PUNCT", ".", "punct", 2, "PunctType=Peri"),
        ],
        &[(0, 1), (3, 5)],
    )
}

/// "The car was repaired yesterday." (past passive)
pub fn car_was_repaired() -> ParsedSentence {
    sentence(
        "The car was repaired yesterday.",
        vec![
            tok("The", 0, "the", "DET", "DT", "det", 1, "Definite=Def|PronType=Art"),
            tok("car", 4, "car", "NOUN", "NN", "nsubjpass", 3, "Number=Sing"),
            tok("was", 8, "be", "AUX", "VBD", "auxpass", 3, "Mood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin"),
            tok("repaired", 12, "repair", "VERB", "VBN", "ROOT", 3, "Aspect=Perf|Tense=Past|VerbForm=Part"),
            tok("yesterday", 21, "yesterday", "NOUN", "NN", "npadvmod", 3, "Number=Sing"),
            tok(".", 30, ".", "PUNCT", ".", "punct", 3, "PunctType=Peri"),
        ],
        &[(0, 2)],
    )
}

/// "The report will be submitted tomorrow." (future passive)
pub fn report_will_be_submitted() -> ParsedSentence {
    sentence(
        "The report will be submitted tomorrow.",
        vec![
            tok("The", 0, "the", "DET", "DT", "det", 1, "Definite=Def|PronType=Art"),
            tok("report", 4, "report", "NOUN", "NN", "nsubjpass", 4, "Number=Sing"),
            tok("will", 11, "will", "AUX", "MD", "aux", 4, "VerbForm=Fin"),
            tok("be", 16, "be", "AUX", "VB", "auxpass", 4, "VerbForm=Inf"),
            tok("submitted", 19, "submit", "VERB", "VBN", "ROOT", 4, "Aspect=Perf|Tense=Past|VerbForm=Part"),
            tok("tomorrow", 29, "tomorrow", "NOUN", "NN", "npadvmod", 4, "Number=Sing"),
            tok(".", 37, ".", "PUNCT", ".", "punct", 4, "PunctType=Peri"),
        ],
        &[(0, 2)],
    )
}

/// "He left before finishing the report." (prepositional span to the right edge)
pub fn left_before_finishing() -> ParsedSentence {
    sentence(
        "He left before finishing the report.",
        vec![
            tok("He", 0, "he", "PRON", "PRP", "nsubj", 1, "Case=Nom|Gender=Masc|Number=Sing|Person=3|PronType=Prs"),
            tok("left", 3, "leave", "VERB", "VBD", "ROOT", 1, "Tense=Past|VerbForm=Fin"),
            tok("before", 8, "before", "ADP", "IN", "prep", 1, ""),
            tok("finishing", 15, "finish", "VERB", "VBG", "pcomp", 2, "Aspect=Prog|Tense=Pres|VerbForm=Part"),
            tok("the", 25, "the", "DET", "DT", "det", 5, "Definite=Def|PronType=Art"),
            tok("report", 29, "report", "NOUN", "NN", "dobj", 3, "Number=Sing"),
            tok(".", 35, ".", "PUNCT", ".", "punct", 1, "PunctType=Peri"),
        ],
        &[(0, 1), (4, 6)],
    )
}

/// "She is not running." (negated present progressive)
pub fn is_not_running() -> ParsedSentence {
    sentence(
        "She is not running.",
        vec![
            tok("She", 0, "she", "PRON", "PRP", "nsubj", 3, "Case=Nom|Gender=Fem|Number=Sing|Person=3|PronType=Prs"),
            tok("is", 4, "be", "AUX", "VBZ", "aux", 3, "Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
            tok("not", 7, "not", "PART", "RB", "neg", 3, "Polarity=Neg"),
            tok("running", 11, "run", "VERB", "VBG", "ROOT", 3, "Aspect=Prog|Tense=Pres|VerbForm=Part"),
            tok(".", 18, ".", "PUNCT", ".", "punct", 3, "PunctType=Peri"),
        ],
        &[(0, 1)],
    )
}

pub fn all() -> Vec<ParsedSentence> {
    vec![
        should_have_trusted(),
        had_trusted(),
        car_was_repaired(),
        report_will_be_submitted(),
        left_before_finishing(),
        is_not_running(),
    ]
}
