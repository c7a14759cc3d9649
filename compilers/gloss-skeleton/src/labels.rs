/// Maps a universal POS tag to the open part-of-speech vocabulary of the contract.
pub fn part_of_speech(pos: &str) -> &'static str {
    match pos {
        "NOUN" => "noun",
        "PROPN" => "proper noun",
        "VERB" => "verb",
        "AUX" => "auxiliary verb",
        "ADP" => "preposition",
        "DET" => "determiner",
        "PRON" => "pronoun",
        "ADJ" => "adjective",
        "ADV" => "adverb",
        "CCONJ" | "CONJ" => "conjunction",
        "SCONJ" => "subordinating conjunction",
        "PART" => "particle",
        "NUM" => "numeral",
        "PUNCT" => "punctuation",
        "INTJ" => "interjection",
        "SYM" => "symbol",
        _ => "other",
    }
}

/// Human-readable grammatical role for a dependency label.
pub fn grammatical_role(dep: &str) -> &'static str {
    match dep {
        "nsubj" | "nsubjpass" | "csubj" | "csubjpass" | "expl" => "subject",
        "dobj" | "obj" => "direct object",
        "iobj" | "dative" => "indirect object",
        "pobj" => "object of preposition",
        "aux" | "auxpass" => "auxiliary",
        "neg" => "negation",
        "det" | "predet" => "determiner",
        "poss" => "possessive modifier",
        "amod" | "nummod" | "quantmod" => "adjectival modifier",
        "advmod" | "npadvmod" => "adverbial modifier",
        "prep" => "prepositional modifier",
        "pcomp" => "prepositional complement",
        "ROOT" => "root predicate",
        "attr" | "acomp" | "oprd" => "predicate complement",
        "xcomp" | "ccomp" => "clausal complement",
        "advcl" => "adverbial clause",
        "relcl" | "acl" => "relative clause",
        "compound" => "compound element",
        "appos" => "apposition",
        "cc" => "coordinator",
        "conj" => "conjunct",
        "prt" => "particle",
        "mark" => "subordinator",
        "punct" => "punctuation",
        _ => "dependent",
    }
}
