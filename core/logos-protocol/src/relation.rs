//! Typed dependency relations (Stanford basic dependencies).
//!
//! Relations form a hierarchy rooted at [`Relation::Dependent`]. Most of the
//! clause machinery asks "is this edge *any* kind of subject/object/..." so
//! every relation knows its parent and ancestor tests walk that chain.

use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Relation {
    Root,
    Dependent,

    // Auxiliaries
    Auxiliary,
    PassiveAuxiliary,
    Copula,

    // Arguments
    Argument,
    Agent,
    Complement,
    AdjectivalComplement,
    Attributive,
    ClausalComplement,
    OpenClausalComplement,
    Complementizer,
    Marker,
    Relative,
    Object,
    DirectObject,
    IndirectObject,
    PrepositionalObject,
    PrepositionalComplement,
    Subject,
    NominalSubject,
    PassiveNominalSubject,
    ClausalSubject,
    PassiveClausalSubject,

    // Semantic dependents
    SemanticDependent,
    ControllingSubject,

    Coordination,
    Conjunct,
    Expletive,

    // Modifiers
    Modifier,
    Abbreviation,
    AdjectivalModifier,
    Apposition,
    AdverbialClause,
    PurposeClause,
    Determiner,
    Predeterminer,
    Preconjunct,
    InfinitivalModifier,
    MultiWordExpression,
    ParticipialModifier,
    AdverbialModifier,
    Negation,
    RelativeClauseModifier,
    QuantifierModifier,
    NounCompound,
    NounPhraseAdverbial,
    TemporalModifier,
    NumericModifier,
    NumberElement,
    PrepositionalModifier,
    PossessionModifier,
    PossessiveMarker,
    Particle,

    Parataxis,
    Punctuation,
    Referent,
}

impl Relation {
    /// Every relation, in declaration order.
    pub const ALL: [Relation; 58] = [
        Relation::Root,
        Relation::Dependent,
        Relation::Auxiliary,
        Relation::PassiveAuxiliary,
        Relation::Copula,
        Relation::Argument,
        Relation::Agent,
        Relation::Complement,
        Relation::AdjectivalComplement,
        Relation::Attributive,
        Relation::ClausalComplement,
        Relation::OpenClausalComplement,
        Relation::Complementizer,
        Relation::Marker,
        Relation::Relative,
        Relation::Object,
        Relation::DirectObject,
        Relation::IndirectObject,
        Relation::PrepositionalObject,
        Relation::PrepositionalComplement,
        Relation::Subject,
        Relation::NominalSubject,
        Relation::PassiveNominalSubject,
        Relation::ClausalSubject,
        Relation::PassiveClausalSubject,
        Relation::SemanticDependent,
        Relation::ControllingSubject,
        Relation::Coordination,
        Relation::Conjunct,
        Relation::Expletive,
        Relation::Modifier,
        Relation::Abbreviation,
        Relation::AdjectivalModifier,
        Relation::Apposition,
        Relation::AdverbialClause,
        Relation::PurposeClause,
        Relation::Determiner,
        Relation::Predeterminer,
        Relation::Preconjunct,
        Relation::InfinitivalModifier,
        Relation::MultiWordExpression,
        Relation::ParticipialModifier,
        Relation::AdverbialModifier,
        Relation::Negation,
        Relation::RelativeClauseModifier,
        Relation::QuantifierModifier,
        Relation::NounCompound,
        Relation::NounPhraseAdverbial,
        Relation::TemporalModifier,
        Relation::NumericModifier,
        Relation::NumberElement,
        Relation::PrepositionalModifier,
        Relation::PossessionModifier,
        Relation::PossessiveMarker,
        Relation::Particle,
        Relation::Parataxis,
        Relation::Punctuation,
        Relation::Referent,
    ];

    /// Short label as written in CoNLL files.
    pub const fn label(self) -> &'static str {
        match self {
            Relation::Root => "root",
            Relation::Dependent => "dep",
            Relation::Auxiliary => "aux",
            Relation::PassiveAuxiliary => "auxpass",
            Relation::Copula => "cop",
            Relation::Argument => "arg",
            Relation::Agent => "agent",
            Relation::Complement => "comp",
            Relation::AdjectivalComplement => "acomp",
            Relation::Attributive => "attr",
            Relation::ClausalComplement => "ccomp",
            Relation::OpenClausalComplement => "xcomp",
            Relation::Complementizer => "complm",
            Relation::Marker => "mark",
            Relation::Relative => "rel",
            Relation::Object => "obj",
            Relation::DirectObject => "dobj",
            Relation::IndirectObject => "iobj",
            Relation::PrepositionalObject => "pobj",
            Relation::PrepositionalComplement => "pcomp",
            Relation::Subject => "subj",
            Relation::NominalSubject => "nsubj",
            Relation::PassiveNominalSubject => "nsubjpass",
            Relation::ClausalSubject => "csubj",
            Relation::PassiveClausalSubject => "csubjpass",
            Relation::SemanticDependent => "sdep",
            Relation::ControllingSubject => "xsubj",
            Relation::Coordination => "cc",
            Relation::Conjunct => "conj",
            Relation::Expletive => "expl",
            Relation::Modifier => "mod",
            Relation::Abbreviation => "abbrev",
            Relation::AdjectivalModifier => "amod",
            Relation::Apposition => "appos",
            Relation::AdverbialClause => "advcl",
            Relation::PurposeClause => "purpcl",
            Relation::Determiner => "det",
            Relation::Predeterminer => "predet",
            Relation::Preconjunct => "preconj",
            Relation::InfinitivalModifier => "infmod",
            Relation::MultiWordExpression => "mwe",
            Relation::ParticipialModifier => "partmod",
            Relation::AdverbialModifier => "advmod",
            Relation::Negation => "neg",
            Relation::RelativeClauseModifier => "rcmod",
            Relation::QuantifierModifier => "quantmod",
            Relation::NounCompound => "nn",
            Relation::NounPhraseAdverbial => "npadvmod",
            Relation::TemporalModifier => "tmod",
            Relation::NumericModifier => "num",
            Relation::NumberElement => "number",
            Relation::PrepositionalModifier => "prep",
            Relation::PossessionModifier => "poss",
            Relation::PossessiveMarker => "possessive",
            Relation::Particle => "prt",
            Relation::Parataxis => "parataxis",
            Relation::Punctuation => "punct",
            Relation::Referent => "ref",
        }
    }

    /// Parses a CoNLL label. Unknown labels degrade to [`Relation::Dependent`],
    /// the least specific relation, as parsers do for unclassifiable arcs.
    pub fn from_label(label: &str) -> Relation {
        // Collapsed labels such as `prep_in` or `conj_and` keep their family.
        let base = label.split('_').next().unwrap_or(label);
        Relation::ALL
            .iter()
            .copied()
            .find(|relation| relation.label() == base)
            .unwrap_or(Relation::Dependent)
    }

    /// Immediate generalization of this relation, `None` for the top of the hierarchy.
    pub const fn parent(self) -> Option<Relation> {
        use Relation::*;
        match self {
            Root | Dependent => None,

            Auxiliary | Argument | SemanticDependent | Coordination | Conjunct | Expletive
            | Modifier | Parataxis | Punctuation | Referent => Some(Dependent),

            PassiveAuxiliary | Copula => Some(Auxiliary),

            Agent | Complement | Subject => Some(Argument),

            AdjectivalComplement | Attributive | ClausalComplement | OpenClausalComplement
            | Complementizer | Marker | Relative | Object | PrepositionalComplement => {
                Some(Complement)
            }

            DirectObject | IndirectObject | PrepositionalObject => Some(Object),

            NominalSubject | ClausalSubject => Some(Subject),
            PassiveNominalSubject => Some(NominalSubject),
            PassiveClausalSubject => Some(ClausalSubject),

            ControllingSubject => Some(SemanticDependent),

            Abbreviation | AdjectivalModifier | Apposition | AdverbialClause | PurposeClause
            | Determiner | Predeterminer | Preconjunct | InfinitivalModifier
            | MultiWordExpression | ParticipialModifier | AdverbialModifier
            | RelativeClauseModifier | QuantifierModifier | NounCompound | NounPhraseAdverbial
            | NumericModifier | NumberElement | PrepositionalModifier | PossessionModifier
            | PossessiveMarker | Particle => Some(Modifier),

            Negation => Some(AdverbialModifier),
            TemporalModifier => Some(NounPhraseAdverbial),
        }
    }

    /// True if `self` equals `other` or generalizes it.
    pub fn is_ancestor_of(self, other: Relation) -> bool {
        let mut current = Some(other);
        while let Some(relation) = current {
            if relation == self {
                return true;
            }
            current = relation.parent();
        }
        false
    }

    pub fn is_any_subject(self) -> bool {
        Relation::Subject.is_ancestor_of(self)
    }

    pub fn is_any_object(self) -> bool {
        Relation::Object.is_ancestor_of(self)
    }

    pub fn is_any_preposition(self) -> bool {
        Relation::PrepositionalModifier.is_ancestor_of(self)
    }

    pub fn is_any_conjunct(self) -> bool {
        Relation::Conjunct.is_ancestor_of(self)
    }

    /// `cc` or `preconj`: the coordinating words themselves.
    pub fn is_coordinator(self) -> bool {
        matches!(self, Relation::Coordination | Relation::Preconjunct)
    }

    /// Relations whose dependent fills an adverbial slot of a clause.
    pub fn is_adverbial(self) -> bool {
        Relation::PrepositionalModifier.is_ancestor_of(self)
            || matches!(
                self,
                Relation::PrepositionalObject
                    | Relation::TemporalModifier
                    | Relation::AdverbialClause
                    | Relation::NounPhraseAdverbial
                    | Relation::PurposeClause
                    | Relation::AdverbialModifier
                    | Relation::ParticipialModifier
            )
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Relation {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Relation::from_label(s))
    }
}

/// True if any relation in `relations` is an ancestor of `relation`.
pub fn contains_ancestor(relations: &[Relation], relation: Relation) -> bool {
    relations.iter().any(|candidate| candidate.is_ancestor_of(relation))
}
