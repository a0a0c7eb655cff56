use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::TokenId;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One word of a parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    pub id: TokenId,
    pub word: String,
    pub lemma: String,
    /// Penn Treebank part-of-speech tag.
    pub tag: String,
}

impl Token {
    pub fn new(id: u32, word: &str, lemma: &str, tag: &str) -> Self {
        Self {
            id: TokenId::new(id),
            word: word.to_owned(),
            lemma: lemma.to_owned(),
            tag: tag.to_owned(),
        }
    }

    /// WDT, WP, WP$, WRB.
    pub fn is_wh(&self) -> bool {
        self.tag.starts_with('W')
    }

    pub fn is_verb(&self) -> bool {
        self.tag.starts_with('V')
    }

    pub fn is_preposition(&self) -> bool {
        self.tag == "IN"
    }

    /// Surface text used when rendering: the lemma when lemmatizing, the word otherwise.
    pub fn text(&self, lemmatize: bool) -> &str {
        if lemmatize {
            &self.lemma
        } else {
            &self.word
        }
    }
}

/// Word lists driving clause classification and adverbial flagging.
///
/// Entries are lower-case lemmas; multi-word entries ("end up") are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Lexicon {
    pub copular: Vec<String>,
    pub extensible_copular: Vec<String>,
    pub non_extensible_copular: Vec<String>,
    pub complex_transitive: Vec<String>,
    pub adverbs_ignore: Vec<String>,
    pub adverbs_include: Vec<String>,
    pub adverbs_conj: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_owned()).collect()
}

fn contains(list: &[String], lemma: &str) -> bool {
    list.iter().any(|entry| entry == lemma)
}

impl Lexicon {
    /// Built-in English word lists.
    pub fn english() -> Self {
        Self {
            copular: words(&[
                "act", "appear", "be", "become", "come", "come out", "end up", "get", "go",
                "grow", "fall", "feel", "keep", "leave", "look", "prove", "remain", "seem",
                "smell", "sound", "stay", "taste", "turn", "turn up", "wind up", "live",
                "come through",
            ]),
            extensible_copular: words(&[
                "act", "appear", "be", "become", "come", "come out", "end up", "get", "go",
                "grow", "fall", "feel", "keep", "leave", "look", "prove", "remain", "seem",
                "smell", "sound", "stay", "taste", "turn", "turn up", "wind up", "live",
                "come through",
            ]),
            non_extensible_copular: words(&["die", "walk"]),
            complex_transitive: words(&[
                "bring", "catch", "drive", "get", "keep", "lay", "lead", "place", "put", "set",
                "sit", "show", "stand", "slip", "take",
            ]),
            adverbs_ignore: words(&["so", "then", "thus", "why", "as", "even"]),
            adverbs_include: words(&["hardly", "barely", "scarcely", "seldom", "rarely"]),
            adverbs_conj: words(&["so", "then", "thus", "why", "also"]),
        }
    }

    /// Lower-cases, sorts and dedups every list. Used before compiling a lexicon archive.
    pub fn normalize(&mut self) {
        for list in [
            &mut self.copular,
            &mut self.extensible_copular,
            &mut self.non_extensible_copular,
            &mut self.complex_transitive,
            &mut self.adverbs_ignore,
            &mut self.adverbs_include,
            &mut self.adverbs_conj,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
            list.retain(|entry| !entry.is_empty());
            list.sort();
            list.dedup();
        }
    }

    pub fn is_copular(&self, lemma: &str) -> bool {
        contains(&self.copular, lemma)
    }

    pub fn is_extensible_copular(&self, lemma: &str) -> bool {
        contains(&self.extensible_copular, lemma)
    }

    pub fn is_non_extensible_copular(&self, lemma: &str) -> bool {
        contains(&self.non_extensible_copular, lemma)
    }

    pub fn is_complex_transitive(&self, lemma: &str) -> bool {
        contains(&self.complex_transitive, lemma)
    }

    pub fn is_ignored_adverb(&self, lemma: &str) -> bool {
        contains(&self.adverbs_ignore, lemma)
    }

    pub fn is_included_adverb(&self, lemma: &str) -> bool {
        contains(&self.adverbs_include, lemma)
    }

    pub fn is_conjunctive_adverb(&self, lemma: &str) -> bool {
        contains(&self.adverbs_conj, lemma)
    }
}
