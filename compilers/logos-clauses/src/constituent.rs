use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use logos_graph::DependencyGraph;
use logos_protocol::{Token, TokenId};

use crate::clause::Clause;

/// Semantic slot a constituent fills in its clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Subject,
    Verb,
    Complement,
    DirectObject,
    IndirectObject,
    ClausalComplement,
    OpenClausalComplement,
    AdjectivalComplement,
    Adverbial,
    Unknown,
}

impl Role {
    /// Short tag used in clause descriptions.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Subject => "S",
            Role::Verb => "V",
            Role::Complement => "C",
            Role::DirectObject => "O",
            Role::IndirectObject => "IO",
            Role::ClausalComplement => "CCOMP",
            Role::OpenClausalComplement => "XCOMP",
            Role::AdjectivalComplement => "ACOMP",
            Role::Adverbial => "A",
            Role::Unknown => "?",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A constituent backed by a region of a dependency graph.
///
/// The span covers `root`, every `additional_roots` entry and everything
/// reachable from them in `graph`, minus whatever hangs below an `excluded`
/// token. `graph` is a private snapshot: detection and coordination rewrite
/// copies, never a graph another constituent still points to. `sentence` is
/// the untouched input graph.
#[derive(Debug, Clone)]
pub struct Span {
    pub graph: Arc<DependencyGraph>,
    pub sentence: Arc<DependencyGraph>,
    pub root: TokenId,
    pub additional_roots: BTreeSet<TokenId>,
    pub excluded: BTreeSet<TokenId>,
    pub role: Role,
}

impl Span {
    pub fn new(
        graph: Arc<DependencyGraph>,
        sentence: Arc<DependencyGraph>,
        root: TokenId,
        role: Role,
    ) -> Self {
        Self {
            graph,
            sentence,
            root,
            additional_roots: BTreeSet::new(),
            excluded: BTreeSet::new(),
            role,
        }
    }

    pub fn with_excluded(mut self, excluded: BTreeSet<TokenId>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_additional_roots(mut self, roots: BTreeSet<TokenId>) -> Self {
        self.additional_roots = roots;
        self
    }

    pub fn root_token(&self) -> Option<&Token> {
        self.graph.token(self.root)
    }

    /// Copy of `graph` with the edges into excluded tokens cut below every root.
    pub fn reduced_graph(&self) -> DependencyGraph {
        let mut reduced = (*self.graph).clone();
        reduced.remove_edges(self.root, &self.excluded, &[], &[]);
        for extra in &self.additional_roots {
            if *extra != self.root {
                reduced.remove_edges(*extra, &self.excluded, &[], &[]);
            }
        }
        reduced
    }

    /// Root attached to its governor through a prepositional relation in the sentence.
    pub fn is_prepositional_phrase(&self) -> bool {
        self.sentence
            .incoming(self.root)
            .iter()
            .any(|edge| edge.relation.is_any_preposition())
    }
}

/// New kinds may be added; renderers outside this crate reject what they do not know.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Constituent {
    Span(Span),
    /// Synthesized text with no graph backing ("is", "has", "be crying").
    Literal { text: String, role: Role },
    /// An open clausal complement together with the clauses detected inside it.
    Embedded { span: Span, clauses: Vec<Clause> },
}

impl Constituent {
    pub fn literal(text: impl Into<String>, role: Role) -> Self {
        Constituent::Literal {
            text: text.into(),
            role,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Constituent::Span(span) => span.role,
            Constituent::Literal { role, .. } => *role,
            Constituent::Embedded { span, .. } => span.role,
        }
    }

    /// The graph region, for spans and embedded clauses.
    pub fn span(&self) -> Option<&Span> {
        match self {
            Constituent::Span(span) | Constituent::Embedded { span, .. } => Some(span),
            Constituent::Literal { .. } => None,
        }
    }

    pub fn span_mut(&mut self) -> Option<&mut Span> {
        match self {
            Constituent::Span(span) | Constituent::Embedded { span, .. } => Some(span),
            Constituent::Literal { .. } => None,
        }
    }

    pub fn root(&self) -> Option<TokenId> {
        self.span().map(|span| span.root)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Constituent::Literal { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Constituent::Span(_) => "span",
            Constituent::Literal { .. } => "literal",
            Constituent::Embedded { .. } => "embedded",
        }
    }

    /// Root word, or the literal text.
    pub fn root_text(&self) -> &str {
        match self {
            Constituent::Literal { text, .. } => text,
            _ => self
                .span()
                .and_then(Span::root_token)
                .map(|token| token.word.as_str())
                .unwrap_or(""),
        }
    }
}
