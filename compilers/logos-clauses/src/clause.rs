use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use logos_protocol::{Configuration, TokenId};

use crate::constituent::{Constituent, Span};

/// Clause types of the Quirk et al. grammar, plus existential clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseType {
    Sv,
    Svc,
    Sva,
    Svo,
    Svoo,
    Svoc,
    Svoa,
    Existential,
    Unknown,
}

impl ClauseType {
    pub fn name(self) -> &'static str {
        match self {
            ClauseType::Sv => "SV",
            ClauseType::Svc => "SVC",
            ClauseType::Sva => "SVA",
            ClauseType::Svo => "SVO",
            ClauseType::Svoo => "SVOO",
            ClauseType::Svoc => "SVOC",
            ClauseType::Svoa => "SVOA",
            ClauseType::Existential => "EXISTENTIAL",
            ClauseType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a constituent must, may, or must not appear in a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Required,
    Optional,
    Ignore,
}

/// One subject-predicate unit of a sentence.
///
/// Role lists hold indexes into `constituents`; parsers sometimes produce
/// more than one direct object, so none of them is assumed to be a singleton.
/// Cloning copies the index lists and shares the constituents.
#[derive(Debug, Clone)]
pub struct Clause {
    pub constituents: Vec<Arc<Constituent>>,
    pub clause_type: ClauseType,
    pub subject: Option<usize>,
    pub verb: usize,
    pub complement: Option<usize>,
    pub direct_objects: Vec<usize>,
    pub indirect_objects: Vec<usize>,
    pub xcomps: Vec<usize>,
    pub ccomps: Vec<usize>,
    pub acomps: Vec<usize>,
    pub adverbials: Vec<usize>,
    /// The clause hangs off a relative pronoun acting as prepositional object.
    pub relative_adverbial: bool,
    /// Index of the enclosing clause in the detection output.
    pub parent: Option<usize>,
}

impl Clause {
    pub(crate) fn new() -> Self {
        Self {
            constituents: Vec::new(),
            clause_type: ClauseType::Unknown,
            subject: None,
            verb: 0,
            complement: None,
            direct_objects: Vec::new(),
            indirect_objects: Vec::new(),
            xcomps: Vec::new(),
            ccomps: Vec::new(),
            acomps: Vec::new(),
            adverbials: Vec::new(),
            relative_adverbial: false,
            parent: None,
        }
    }

    /// Appends a constituent and returns its position.
    pub(crate) fn push(&mut self, constituent: Constituent) -> usize {
        self.constituents.push(Arc::new(constituent));
        self.constituents.len() - 1
    }

    pub(crate) fn span_mut(&mut self, index: usize) -> Option<&mut Span> {
        self.constituents
            .get_mut(index)
            .and_then(|constituent| Arc::make_mut(constituent).span_mut())
    }

    pub(crate) fn exclude_tokens(&mut self, index: usize, tokens: impl IntoIterator<Item = TokenId>) {
        if let Some(span) = self.span_mut(index) {
            span.excluded.extend(tokens);
        }
    }

    /// Every graph-backed constituent excludes the roots of all its siblings.
    pub(crate) fn exclude_siblings(&mut self) {
        let anchors: Vec<Option<BTreeSet<TokenId>>> = self
            .constituents
            .iter()
            .map(|constituent| {
                constituent.span().map(|span| {
                    let mut roots = span.additional_roots.clone();
                    roots.insert(span.root);
                    roots
                })
            })
            .collect();

        for j in 0..self.constituents.len() {
            if anchors[j].is_none() {
                continue;
            }
            let others: Vec<TokenId> = anchors
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != j)
                .filter_map(|(_, roots)| roots.as_ref())
                .flatten()
                .copied()
                .collect();
            self.exclude_tokens(j, others);
        }
    }

    pub fn constituent(&self, index: usize) -> Option<&Constituent> {
        self.constituents.get(index).map(Arc::as_ref)
    }

    pub fn verb_constituent(&self) -> Option<&Constituent> {
        self.constituent(self.verb)
    }

    /// Root position of the verb, `None` for a literal verb.
    pub fn verb_root(&self) -> Option<TokenId> {
        self.verb_constituent().and_then(Constituent::root)
    }

    /// Lemma of the verb root, or the literal text.
    pub fn verb_lemma(&self) -> Option<&str> {
        match self.verb_constituent()? {
            Constituent::Literal { text, .. } => Some(text),
            other => other
                .span()
                .and_then(Span::root_token)
                .map(|token| token.lemma.as_str()),
        }
    }

    /// Direct objects, complement, open and closed clausal complements.
    pub fn complement_count(&self) -> usize {
        self.direct_objects.len()
            + usize::from(self.complement.is_some())
            + self.xcomps.len()
            + self.ccomps.len()
    }

    /// An adverbial that could be obligatory: one after the verb, or a relative one.
    pub fn has_candidate_adverbial(&self) -> bool {
        let Some(last) = self.adverbials.last() else {
            return false;
        };
        if self.relative_adverbial {
            return true;
        }
        let adverbial = self.constituent(*last).and_then(Constituent::root);
        match (adverbial, self.verb_root()) {
            (Some(adverbial), Some(verb)) => adverbial > verb,
            _ => true,
        }
    }

    /// Assigns a type unless detection already fixed one.
    pub fn classify(&mut self, config: &Configuration) {
        if self.clause_type == ClauseType::Unknown {
            self.clause_type = self.decide_type(config);
        }
    }

    fn decide_type(&self, config: &Configuration) -> ClauseType {
        let lexicon = &config.lexicon;
        let lemma = self.verb_lemma().unwrap_or("");
        let complements = self.complement_count();

        // parsers sometimes hand out ccomp/xcomp where a direct object belongs
        let has_direct_object = !self.direct_objects.is_empty()
            || (self.complement.is_none() && complements > 0 && !lexicon.is_copular(lemma));
        let has_indirect_object = !self.indirect_objects.is_empty();

        if has_direct_object || has_indirect_object {
            if complements > 0 && has_indirect_object {
                return ClauseType::Svoo;
            }
            if complements > 1 {
                return ClauseType::Svoc;
            }
            if !(self.has_candidate_adverbial() && has_direct_object) {
                return ClauseType::Svo;
            }
            if lexicon.is_complex_transitive(lemma) || config.conservative_svoa() {
                return ClauseType::Svoa;
            }
            return ClauseType::Svo;
        }

        if self.complement.is_some()
            || (complements > 0 && lexicon.is_copular(lemma))
            || !self.acomps.is_empty()
        {
            return ClauseType::Svc;
        }
        if !self.has_candidate_adverbial() || lexicon.is_non_extensible_copular(lemma) {
            return ClauseType::Sv;
        }
        if lexicon.is_extensible_copular(lemma) || config.conservative_sva() {
            return ClauseType::Sva;
        }
        ClauseType::Sv
    }

    /// Root lemma of a childless adverbial, the text of a literal one.
    fn bare_adverb(&self, index: usize) -> Option<&str> {
        match self.constituent(index)? {
            Constituent::Literal { text, .. } => Some(text),
            other => {
                let span = other.span()?;
                if span.graph.has_children(span.root) {
                    return None;
                }
                span.root_token().map(|token| token.lemma.as_str())
            }
        }
    }

    fn is_ignored_adverbial(&self, index: usize, config: &Configuration) -> bool {
        self.bare_adverb(index).is_some_and(|lemma| {
            config.lexicon.is_ignored_adverb(lemma)
                || (config.coordination_on_non_verbs()
                    && config.lexicon.is_conjunctive_adverb(lemma))
        })
    }

    fn is_included_adverbial(&self, index: usize, config: &Configuration) -> bool {
        self.bare_adverb(index)
            .is_some_and(|lemma| config.lexicon.is_included_adverb(lemma))
    }

    /// Optionality of the constituent at `index`. Anything that is not an
    /// adverbial is required.
    pub fn flag(&self, index: usize, config: &Configuration) -> Flag {
        let verb = self.verb_root();
        let mut first = true;
        for &i in &self.adverbials {
            if i == index && self.is_ignored_adverbial(i, config) {
                return Flag::Ignore;
            }
            if i == index && self.is_included_adverbial(i, config) {
                return Flag::Required;
            }
            let adverbial = self.constituent(i).and_then(Constituent::root);
            let before_verb = match (adverbial, verb) {
                (Some(adverbial), Some(verb)) => adverbial < verb && !self.relative_adverbial,
                _ => false,
            };
            if before_verb {
                if i == index {
                    return Flag::Optional;
                }
            } else {
                if i == index {
                    if !first {
                        return Flag::Optional;
                    }
                    return match self.clause_type {
                        ClauseType::Sva | ClauseType::Svoa => Flag::Required,
                        _ => Flag::Optional,
                    };
                }
                first = false;
            }
        }
        Flag::Required
    }

    /// `SVO (V: makes@2, S: Bell@1, O: products@7)`. With a configuration,
    /// adverbials carry their flag: `!` required, `?` optional, `-` ignored.
    pub fn describe(&self, config: Option<&Configuration>) -> String {
        let parts: Vec<String> = self
            .constituents
            .iter()
            .enumerate()
            .map(|(index, constituent)| {
                let mut tag = constituent.role().tag().to_string();
                if let Some(config) = config {
                    if self.adverbials.contains(&index) {
                        tag.push(match self.flag(index, config) {
                            Flag::Required => '!',
                            Flag::Optional => '?',
                            Flag::Ignore => '-',
                        });
                    }
                }
                match constituent.root() {
                    Some(root) => format!("{}: {}@{}", tag, constituent.root_text(), root),
                    None => format!("{}: \"{}\"", tag, constituent.root_text()),
                }
            })
            .collect();
        format!("{} ({})", self.clause_type, parts.join(", "))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(None))
    }
}
