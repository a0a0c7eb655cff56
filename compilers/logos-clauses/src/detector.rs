//! Clause detection.
//!
//! One pass over the sentence edges. Subject edges open ordinary clauses,
//! appositions and possessives synthesize "is"/"has" clauses, participial
//! modifiers open clauses with an implicit copula. Open clausal complements
//! are analysed recursively and kept inside the constituent that holds them.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use logos_graph::{find_first, find_first_descendant, DependencyEdge, DependencyGraph};
use logos_protocol::{Configuration, Relation, Token, TokenId};
use tracing::{debug, trace};

use crate::clause::{Clause, ClauseType};
use crate::constituent::{Constituent, Role, Span};
use crate::coordination::coordinated_heads;
use crate::error::{DetectionError, DetectionResult};

/// Dependents of a copular head that stay out of the complement span.
const EXCLUDE_COMPLEMENT: [Relation; 5] = [
    Relation::Auxiliary,
    Relation::PassiveAuxiliary,
    Relation::Subject,
    Relation::Copula,
    Relation::AdverbialModifier,
];

/// Dependents of a copular head rendered with the copula.
const INCLUDE_VERB: [Relation; 3] = [
    Relation::Auxiliary,
    Relation::PassiveAuxiliary,
    Relation::Negation,
];

/// Deepest chain of nested open clausal complements.
pub const MAX_NESTING: usize = 32;

/// Detects the clauses of one sentence.
pub fn detect_clauses(
    graph: &DependencyGraph,
    config: &Configuration,
) -> DetectionResult<Vec<Clause>> {
    ClauseDetector::new(Arc::new(graph.clone()), config).detect()
}

/// Clauses found so far with the head token each was built from.
/// Synthesized clauses have no head.
#[derive(Debug, Default)]
struct Detected {
    clauses: Vec<Clause>,
    heads: Vec<Option<TokenId>>,
}

impl Detected {
    fn push(&mut self, clause: Clause, head: Option<TokenId>) {
        self.clauses.push(clause);
        self.heads.push(head);
    }
}

enum Built {
    Clause(Clause),
    /// The head only says who said what; see [`ClauseDetector::parataxis_clause`].
    Parataxis(DependencyEdge),
}

pub struct ClauseDetector<'a> {
    sentence: Arc<DependencyGraph>,
    config: &'a Configuration,
}

impl<'a> ClauseDetector<'a> {
    pub fn new(sentence: Arc<DependencyGraph>, config: &'a Configuration) -> Self {
        Self { sentence, config }
    }

    pub fn detect(&self) -> DetectionResult<Vec<Clause>> {
        let mut detected = Detected::default();

        for edge in self.sentence.edges() {
            if edge.relation.is_any_subject() {
                self.subject_clauses(edge.dependent, edge.governor, false, 0, &mut detected)?;
            } else if self.config.appositions() && edge.relation == Relation::Apposition {
                let clause = self.apposition_clause(edge.governor, edge.dependent);
                detected.push(clause, None);
            } else if self.config.possessives() && edge.relation == Relation::PossessionModifier {
                let clause = self.possessive_clause(edge.dependent, edge.governor)?;
                detected.push(clause, None);
            } else if self.config.participial_modifiers()
                && edge.relation == Relation::ParticipialModifier
            {
                self.subject_clauses(edge.governor, edge.dependent, true, 0, &mut detected)?;
            }
        }

        let Detected { mut clauses, heads } = detected;
        for (index, clause) in clauses.iter_mut().enumerate() {
            if let Some(head) = heads[index] {
                clause.parent = enclosing_clause(&self.sentence, head, &heads, index);
            }
            clause.exclude_siblings();
        }

        debug!(target: "logos::detect", clauses = clauses.len(), "detected clauses");
        Ok(clauses)
    }

    fn span(&self, graph: &Arc<DependencyGraph>, root: TokenId, role: Role) -> Span {
        Span::new(graph.clone(), self.sentence.clone(), root, role)
    }

    /// Span rooted at a relative-clause antecedent. Copular antecedents drop
    /// their own subject, copula and auxiliaries.
    fn relative_span(&self, graph: &Arc<DependencyGraph>, root: TokenId, role: Role) -> Span {
        self.span(graph, root, role)
            .with_excluded(relative_exclusions(graph, root))
    }

    /// "the man whose car broke": the possessor edge is rewired from the
    /// relative pronoun to the antecedent.
    fn possessive_relative_span(
        &self,
        graph: &DependencyGraph,
        possession: DependencyEdge,
        relative: DependencyEdge,
        root: TokenId,
        role: Role,
    ) -> DetectionResult<Span> {
        let mut rewired = graph.clone();
        rewired.add_edge(
            possession.governor,
            Relation::PossessionModifier,
            relative.governor,
        )?;
        let excluded = rewired.exclude(relative.governor, &EXCLUDE_COMPLEMENT);
        rewired.remove_edge(&possession);
        rewired.remove_edge(&relative);
        Ok(self
            .span(&Arc::new(rewired), root, role)
            .with_excluded(excluded))
    }

    /// Builds one clause per coordinated head of `head`.
    fn subject_clauses(
        &self,
        subject: TokenId,
        head: TokenId,
        participial: bool,
        depth: usize,
        out: &mut Detected,
    ) -> DetectionResult<()> {
        if depth > MAX_NESTING {
            return Err(DetectionError::RecursionLimit { depth: MAX_NESTING });
        }

        let mut working = (*self.sentence).clone();
        let heads = coordinated_heads(&mut working, head, self.config)?;
        let working = Arc::new(working);

        for root in heads {
            match self.head_clause(&working, subject, root, participial, depth)? {
                Built::Clause(mut clause) => {
                    if participial {
                        clause.clause_type = ClauseType::Sva;
                    } else {
                        clause.classify(self.config);
                    }
                    trace!(
                        target: "logos::detect",
                        head = %root,
                        kind = %clause.clause_type,
                        constituents = clause.constituents.len(),
                        "clause"
                    );
                    out.push(clause, Some(root));
                }
                Built::Parataxis(edge) => {
                    trace!(target: "logos::detect", head = %root, "parataxis");
                    if let Some(clause) = self.parataxis_clause(edge.governor, edge.dependent) {
                        out.push(clause, None);
                    }
                }
            }
        }
        Ok(())
    }

    fn head_clause(
        &self,
        graph: &Arc<DependencyGraph>,
        subject: TokenId,
        root: TokenId,
        participial: bool,
        depth: usize,
    ) -> DetectionResult<Built> {
        let outgoing = graph.outgoing(root);
        let incoming = graph.incoming(root);
        let mut clause = Clause::new();

        let copula = find_first(&outgoing, Relation::Copula);
        let mut relative = find_first(&incoming, Relation::RelativeClauseModifier);
        let possession = relative.and_then(|_| relative_possession(graph, root));

        let implicit_copula = || -> DetectionResult<Constituent> {
            let word = &graph.try_token(root)?.word;
            Ok(Constituent::literal(format!("be {}", word), Role::Verb))
        };

        // the constituent standing for the predicate head
        let anchor = match copula {
            Some(copula) => {
                let excluded = graph.exclude(root, &EXCLUDE_COMPLEMENT);
                let included = graph.exclude(root, &INCLUDE_VERB);
                let complement = clause.push(Constituent::Span(
                    self.span(graph, root, Role::Complement)
                        .with_excluded(excluded),
                ));
                clause.complement = Some(complement);
                clause.verb = clause.push(if participial {
                    implicit_copula()?
                } else {
                    Constituent::Span(
                        self.span(graph, copula.dependent, Role::Verb)
                            .with_additional_roots(included),
                    )
                });
                complement
            }
            None => {
                clause.verb = clause.push(if participial {
                    implicit_copula()?
                } else {
                    Constituent::Span(self.span(graph, root, Role::Verb))
                });
                clause.verb
            }
        };

        let (subject_wh, subject_verb) = {
            let token = graph.try_token(subject)?;
            (token.is_wh(), token.is_verb())
        };
        let subject_span = match (relative, possession) {
            (Some(rcmod), _) if subject_wh => {
                relative = None;
                clause.exclude_tokens(anchor, [subject]);
                self.relative_span(graph, rcmod.governor, Role::Subject)
            }
            (Some(rcmod), Some(possession)) if possession.governor == subject => {
                relative = None;
                self.possessive_relative_span(graph, possession, rcmod, subject, Role::Subject)?
            }
            _ if participial && subject_verb => {
                let own = find_first_descendant(&self.sentence.outgoing(subject), Relation::Subject)
                    .map_or(subject, |edge| edge.dependent);
                self.span(graph, own, Role::Subject)
            }
            _ => self.span(graph, subject, Role::Subject),
        };
        let subject_index = clause.push(Constituent::Span(subject_span));
        clause.subject = Some(subject_index);

        if participial {
            // "He is the man crying": the subject stops short of the participle
            let below = self.sentence.outgoing(subject);
            let mut excluded = vec![root];
            if let Some(copula) = find_first_descendant(&below, Relation::Copula) {
                excluded.push(copula.dependent);
                if let Some(own) = find_first_descendant(&below, Relation::Subject) {
                    excluded.push(own.dependent);
                }
            }
            clause.exclude_tokens(subject_index, excluded);
        }

        for edge in &outgoing {
            let dependent = edge.dependent;
            match edge.relation {
                Relation::Complementizer | Relation::Marker => {
                    clause.exclude_tokens(anchor, [dependent]);
                }
                Relation::IndirectObject => {
                    let index = self.argument(
                        graph,
                        &mut clause,
                        anchor,
                        dependent,
                        Role::IndirectObject,
                        &mut relative,
                        possession,
                    )?;
                    clause.indirect_objects.push(index);
                }
                Relation::DirectObject => {
                    let index = self.argument(
                        graph,
                        &mut clause,
                        anchor,
                        dependent,
                        Role::DirectObject,
                        &mut relative,
                        possession,
                    )?;
                    clause.direct_objects.push(index);
                }
                Relation::ClausalComplement => {
                    let index = clause.push(Constituent::Span(self.span(
                        graph,
                        dependent,
                        Role::ClausalComplement,
                    )));
                    clause.ccomps.push(index);
                }
                Relation::OpenClausalComplement => {
                    let embedded = self.embedded(graph, subject, dependent, depth)?;
                    let index = clause.push(embedded);
                    clause.xcomps.push(index);
                }
                Relation::AdjectivalComplement => {
                    let index = clause.push(Constituent::Span(self.span(
                        graph,
                        dependent,
                        Role::AdjectivalComplement,
                    )));
                    clause.acomps.push(index);
                }
                relation if relation.is_adverbial() => {
                    let index =
                        clause.push(Constituent::Span(self.span(graph, dependent, Role::Adverbial)));
                    clause.adverbials.push(index);
                }
                Relation::Relative => {
                    self.relative_adverbial(graph, &mut clause, dependent, relative)?;
                    relative = None;
                }
                Relation::Expletive => clause.clause_type = ClauseType::Existential,
                _ => {}
            }
        }

        // zero relative: "the house I grew up in", "the book I like"
        if let Some(rcmod) = relative {
            if let Some(candidate) = bare_preposition(&clause) {
                if let Some(span) = clause.span_mut(candidate) {
                    let mut rewired = (*span.graph).clone();
                    let excluded = relative_exclusions(&rewired, rcmod.governor);
                    rewired.add_edge(span.root, Relation::PrepositionalObject, rcmod.governor)?;
                    span.excluded.extend(excluded);
                    span.graph = Arc::new(rewired);
                }
            } else if find_first(&outgoing, Relation::DirectObject).is_none() {
                let index = clause.push(Constituent::Span(self.relative_span(
                    graph,
                    rcmod.governor,
                    Role::DirectObject,
                )));
                clause.direct_objects.push(index);
            } else if find_first(&outgoing, Relation::IndirectObject).is_none() {
                let index = clause.push(Constituent::Span(self.relative_span(
                    graph,
                    rcmod.governor,
                    Role::IndirectObject,
                )));
                clause.indirect_objects.push(index);
            }
        }

        if let Some(parataxis) = find_first(&incoming, Relation::Parataxis) {
            if clause.constituents.len() < 3 {
                return Ok(Built::Parataxis(parataxis));
            }
        }
        Ok(Built::Clause(clause))
    }

    /// Object constituent, resolving a relative pronoun to its antecedent.
    #[allow(clippy::too_many_arguments)]
    fn argument(
        &self,
        graph: &Arc<DependencyGraph>,
        clause: &mut Clause,
        anchor: usize,
        dependent: TokenId,
        role: Role,
        relative: &mut Option<DependencyEdge>,
        possession: Option<DependencyEdge>,
    ) -> DetectionResult<usize> {
        if graph.try_token(dependent)?.is_wh() {
            if let Some(rcmod) = relative.take() {
                clause.exclude_tokens(anchor, [dependent]);
                let span = self.relative_span(graph, rcmod.governor, role);
                return Ok(clause.push(Constituent::Span(span)));
            }
        }
        if let (Some(rcmod), Some(possession)) = (*relative, possession) {
            if possession.governor == dependent {
                *relative = None;
                let span =
                    self.possessive_relative_span(graph, possession, rcmod, dependent, role)?;
                return Ok(clause.push(Constituent::Span(span)));
            }
        }
        Ok(clause.push(Constituent::Span(self.span(graph, dependent, role))))
    }

    /// Analyses an open clausal complement as clauses of its own, borrowing
    /// the outer subject.
    fn embedded(
        &self,
        graph: &Arc<DependencyGraph>,
        subject: TokenId,
        dependent: TokenId,
        depth: usize,
    ) -> DetectionResult<Constituent> {
        let own_subject = find_first_descendant(&graph.outgoing(dependent), Relation::Subject)
            .map(|edge| edge.dependent);

        let mut inner = Detected::default();
        self.subject_clauses(subject, dependent, false, depth + 1, &mut inner)?;

        let mut clauses = inner.clauses;
        for clause in &mut clauses {
            if let Some(own) = own_subject {
                let verb = clause.verb;
                if let Some(span) = clause.span_mut(verb) {
                    span.additional_roots.insert(own);
                }
            }
            clause.exclude_siblings();
        }

        Ok(Constituent::Embedded {
            span: self.span(graph, dependent, Role::OpenClausalComplement),
            clauses,
        })
    }

    /// A `rel` edge: the relative pronoun is the object of a preposition,
    /// as in "the house in which I grew". The antecedent takes its place.
    fn relative_adverbial(
        &self,
        graph: &Arc<DependencyGraph>,
        clause: &mut Clause,
        dependent: TokenId,
        relative: Option<DependencyEdge>,
    ) -> DetectionResult<()> {
        let Some(rcmod) = relative else {
            return Ok(());
        };
        let mut rewired = (**graph).clone();
        let below = rewired.outgoing(dependent);
        let Some(object) = find_first(&below, Relation::PrepositionalObject) else {
            return Ok(());
        };

        if rewired.try_token(object.dependent)?.is_wh() {
            rewired.add_edge(dependent, Relation::PrepositionalObject, rcmod.governor)?;
            rewired.remove_edge(&object);
        } else if let Some(possession) = find_first(&below, Relation::PossessionModifier) {
            rewired.add_edge(
                possession.governor,
                Relation::PossessionModifier,
                rcmod.governor,
            )?;
            rewired.remove_edge(&possession);
        } else {
            return Ok(());
        }

        let excluded = relative_exclusions(&rewired, rcmod.governor);
        let span = self
            .span(&Arc::new(rewired), dependent, Role::Adverbial)
            .with_excluded(excluded);
        let index = clause.push(Constituent::Span(span));
        clause.adverbials.push(index);
        clause.relative_adverbial = true;
        Ok(())
    }

    /// "Bell, a company, ..." gives (Bell, is, a company).
    fn apposition_clause(&self, governor: TokenId, dependent: TokenId) -> Clause {
        let sentence = &self.sentence;
        let mut clause = Clause::new();
        clause.subject = Some(clause.push(Constituent::Span(self.span(
            sentence,
            governor,
            Role::Subject,
        ))));
        clause.verb = clause.push(Constituent::literal(
            self.config.apposition_verb.as_str(),
            Role::Verb,
        ));
        clause.complement = Some(clause.push(Constituent::Span(self.span(
            sentence,
            dependent,
            Role::Complement,
        ))));
        clause.clause_type = ClauseType::Svc;
        clause
    }

    /// "John's car" gives (John, has, car).
    fn possessive_clause(
        &self,
        possessor: TokenId,
        possessed: TokenId,
    ) -> DetectionResult<Clause> {
        let sentence = &self.sentence;

        let mut excluded_object = BTreeSet::from([possessor]);
        for edge in sentence.outgoing(possessed) {
            let relation = edge.relation;
            if matches!(
                relation,
                Relation::AdverbialClause
                    | Relation::AdverbialModifier
                    | Relation::Auxiliary
                    | Relation::Copula
                    | Relation::TemporalModifier
            ) || relation.is_any_object()
                || relation.is_any_subject()
                || (relation.is_any_conjunct() && self.config.coordination_on_non_verbs())
            {
                excluded_object.insert(edge.dependent);
            }
        }

        let subject = if sentence.try_token(possessor)?.is_wh() {
            // "the man whose car broke", "the man in whose house I live"
            let mut anchor = sentence.parent(possessed).ok_or(DetectionError::MalformedGraph {
                token: possessed,
                reason: "possessed word of a relative pronoun has no governor",
            })?;
            if sentence.try_token(anchor)?.is_preposition() {
                anchor = sentence.parent(anchor).ok_or(DetectionError::MalformedGraph {
                    token: anchor,
                    reason: "preposition over a relative possessive has no governor",
                })?;
            }
            match find_first(&sentence.incoming(anchor), Relation::RelativeClauseModifier) {
                Some(rcmod) => self.relative_span(sentence, rcmod.governor, Role::Subject),
                None => self.span(sentence, possessor, Role::Subject),
            }
        } else {
            let marker = find_first(&sentence.outgoing(possessor), Relation::PossessiveMarker);
            self.span(sentence, possessor, Role::Subject)
                .with_excluded(marker.map(|edge| edge.dependent).into_iter().collect())
        };

        let mut clause = Clause::new();
        clause.subject = Some(clause.push(Constituent::Span(subject)));
        clause.verb = clause.push(Constituent::literal(
            self.config.possessive_verb.as_str(),
            Role::Verb,
        ));
        let object = clause.push(Constituent::Span(
            self.span(sentence, possessed, Role::DirectObject)
                .with_excluded(excluded_object),
        ));
        clause.direct_objects.push(object);
        clause.clause_type = ClauseType::Svo;
        Ok(clause)
    }

    /// "Profits rose, analysts said" gives (analysts, said, Profits rose).
    fn parataxis_clause(&self, governor: TokenId, dependent: TokenId) -> Option<Clause> {
        let sentence = &self.sentence;
        let own = find_first_descendant(&sentence.outgoing(dependent), Relation::Subject)?;

        let mut clause = Clause::new();
        clause.subject = Some(clause.push(Constituent::Span(self.span(
            sentence,
            own.dependent,
            Role::Subject,
        ))));
        clause.verb = clause.push(Constituent::Span(self.span(sentence, dependent, Role::Verb)));
        let object = clause.push(Constituent::Span(
            self.span(sentence, governor, Role::DirectObject)
                .with_excluded(BTreeSet::from([dependent])),
        ));
        clause.direct_objects.push(object);
        clause.clause_type = ClauseType::Svo;
        Some(clause)
    }
}

fn relative_exclusions(graph: &DependencyGraph, root: TokenId) -> BTreeSet<TokenId> {
    if find_first(&graph.outgoing(root), Relation::Copula).is_some() {
        graph.exclude(root, &EXCLUDE_COMPLEMENT)
    } else {
        BTreeSet::new()
    }
}

/// Possessive relative pronoun below `root`, following first dependents only.
fn relative_possession(graph: &DependencyGraph, root: TokenId) -> Option<DependencyEdge> {
    let mut current = root;
    let mut seen = BTreeSet::new();
    while seen.insert(current) {
        let first = graph.outgoing(current).into_iter().next()?;
        if graph.token(first.dependent).is_some_and(Token::is_wh)
            && Relation::PossessionModifier.is_ancestor_of(first.relation)
        {
            return Some(first);
        }
        current = first.dependent;
    }
    None
}

/// A childless preposition left stranded by a zero relative.
fn bare_preposition(clause: &Clause) -> Option<usize> {
    clause.constituents.iter().position(|constituent| {
        constituent.span().is_some_and(|span| {
            span.root_token().is_some_and(Token::is_preposition)
                && !span.graph.has_children(span.root)
        })
    })
}

/// Nearest clause whose head governs `head` in the sentence graph.
fn enclosing_clause(
    sentence: &DependencyGraph,
    head: TokenId,
    heads: &[Option<TokenId>],
    own: usize,
) -> Option<usize> {
    let mut seen = BTreeSet::from([head]);
    let mut queue: VecDeque<TokenId> = sentence.parents(head).into();
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let found = heads
            .iter()
            .enumerate()
            .find(|(index, candidate)| *index != own && **candidate == Some(current));
        if let Some((index, _)) = found {
            return Some(index);
        }
        queue.extend(sentence.parents(current));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Flag;
    use logos_graph::fixtures::GraphBuilder;
    use logos_protocol::Switches;
    use proptest::prelude::*;

    fn describe(clauses: &[Clause]) -> Vec<String> {
        clauses.iter().map(|clause| clause.to_string()).collect()
    }

    #[test]
    fn test_simple_transitive() {
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "makes", "make", "VBZ")
            .token(3, "products", "product", "NNS")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 3)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(describe(&clauses), vec!["SVO (V: makes@2, S: Bell@1, O: products@3)"]);
        assert_eq!(clauses[0].parent, None);

        // siblings exclude each other
        let verb = clauses[0].constituent(0).and_then(Constituent::span).unwrap();
        assert_eq!(verb.excluded, BTreeSet::from([TokenId(1), TokenId(3)]));
    }

    #[test]
    fn test_copular_clause() {
        // "Einstein is smart"
        let graph = GraphBuilder::new()
            .token(1, "Einstein", "Einstein", "NNP")
            .token(2, "is", "be", "VBZ")
            .token(3, "smart", "smart", "JJ")
            .edge(3, Relation::NominalSubject, 1)
            .edge(3, Relation::Copula, 2)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(describe(&clauses), vec!["SVC (C: smart@3, V: is@2, S: Einstein@1)"]);
        assert_eq!(clauses[0].complement, Some(0));
        assert_eq!(clauses[0].verb, 1);

        let complement = clauses[0].constituent(0).and_then(Constituent::span).unwrap();
        assert!(complement.excluded.contains(&TokenId(1)));
        assert!(complement.excluded.contains(&TokenId(2)));
    }

    #[test]
    fn test_open_clausal_complement() {
        // "Bell decided to expand"
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "decided", "decide", "VBD")
            .token(3, "to", "to", "TO")
            .token(4, "expand", "expand", "VB")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::OpenClausalComplement, 4)
            .edge(4, Relation::Auxiliary, 3)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec!["SVO (V: decided@2, S: Bell@1, XCOMP: expand@4)"]
        );
        assert_eq!(clauses[0].xcomps, vec![2]);

        match clauses[0].constituent(2) {
            Some(Constituent::Embedded { clauses: inner, .. }) => {
                assert_eq!(describe(inner), vec!["SV (V: expand@4, S: Bell@1)"]);
            }
            other => panic!("expected an embedded clause, got {:?}", other),
        }
    }

    #[test]
    fn test_apposition_and_switch() {
        // "Bell, a company, makes products"
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "a", "a", "DT")
            .token(3, "company", "company", "NN")
            .token(4, "makes", "make", "VBZ")
            .token(5, "products", "product", "NNS")
            .edge(1, Relation::Apposition, 3)
            .edge(3, Relation::Determiner, 2)
            .edge(4, Relation::NominalSubject, 1)
            .edge(4, Relation::DirectObject, 5)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVC (S: Bell@1, V: \"is\", C: company@3)",
                "SVO (V: makes@4, S: Bell@1, O: products@5)",
            ]
        );

        let config = Configuration::default().with_switch(Switches::APPOSITIONS, false);
        assert_eq!(detect_clauses(&graph, &config).unwrap().len(), 1);
    }

    #[test]
    fn test_possessive_clause() {
        // "John 's car broke"
        let graph = GraphBuilder::new()
            .token(1, "John", "John", "NNP")
            .token(2, "'s", "'s", "POS")
            .token(3, "car", "car", "NN")
            .token(4, "broke", "break", "VBD")
            .edge(3, Relation::PossessionModifier, 1)
            .edge(1, Relation::PossessiveMarker, 2)
            .edge(4, Relation::NominalSubject, 3)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (S: John@1, V: \"has\", O: car@3)",
                "SV (V: broke@4, S: car@3)",
            ]
        );

        let possessor = clauses[0].constituent(0).and_then(Constituent::span).unwrap();
        assert!(possessor.excluded.contains(&TokenId(2)));
    }

    #[test]
    fn test_relative_pronoun_subject() {
        // "I saw the man who left"
        let graph = GraphBuilder::new()
            .token(1, "I", "I", "PRP")
            .token(2, "saw", "see", "VBD")
            .token(3, "the", "the", "DT")
            .token(4, "man", "man", "NN")
            .token(5, "who", "who", "WP")
            .token(6, "left", "leave", "VBD")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::RelativeClauseModifier, 6)
            .edge(6, Relation::NominalSubject, 5)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (V: saw@2, S: I@1, O: man@4)",
                "SV (V: left@6, S: man@4)",
            ]
        );
        assert_eq!(clauses[1].parent, Some(0));

        // the pronoun never reaches the verb span
        let verb = clauses[1].constituent(0).and_then(Constituent::span).unwrap();
        assert!(verb.excluded.contains(&TokenId(5)));
    }

    #[test]
    fn test_zero_relative() {
        // "I saw the house I grew up in"
        let graph = GraphBuilder::new()
            .token(1, "I", "I", "PRP")
            .token(2, "saw", "see", "VBD")
            .token(3, "the", "the", "DT")
            .token(4, "house", "house", "NN")
            .token(5, "I", "I", "PRP")
            .token(6, "grew", "grow", "VBD")
            .token(7, "up", "up", "RP")
            .token(8, "in", "in", "IN")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::RelativeClauseModifier, 6)
            .edge(6, Relation::NominalSubject, 5)
            .edge(6, Relation::Particle, 7)
            .edge(6, Relation::PrepositionalModifier, 8)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].to_string(), "SVA (V: grew@6, S: I@5, A: in@8)");
        assert_eq!(clauses[1].parent, Some(0));

        // the stranded preposition now governs the antecedent
        let adverbial = clauses[1].constituent(2).and_then(Constituent::span).unwrap();
        assert_eq!(
            adverbial.graph.relation(TokenId(8), TokenId(4)),
            Some(Relation::PrepositionalObject)
        );
        // the sentence graph is untouched
        assert_eq!(graph.relation(TokenId(8), TokenId(4)), None);
    }

    #[test]
    fn test_relative_adverbial() {
        // "I saw the house in which I live"
        let graph = GraphBuilder::new()
            .token(1, "I", "I", "PRP")
            .token(2, "saw", "see", "VBD")
            .token(3, "the", "the", "DT")
            .token(4, "house", "house", "NN")
            .token(5, "in", "in", "IN")
            .token(6, "which", "which", "WDT")
            .token(7, "I", "I", "PRP")
            .token(8, "live", "live", "VBP")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::RelativeClauseModifier, 8)
            .edge(8, Relation::NominalSubject, 7)
            .edge(8, Relation::Relative, 5)
            .edge(5, Relation::PrepositionalObject, 6)
            .build();

        let config = Configuration::default();
        let clauses = detect_clauses(&graph, &config).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (V: saw@2, S: I@1, O: house@4)",
                "SVA (V: live@8, S: I@7, A: in@5)",
            ]
        );
        let relative = &clauses[1];
        assert!(relative.relative_adverbial);
        assert_eq!(relative.adverbials, vec![2]);
        // ahead of the verb, yet still obligatory
        assert_eq!(relative.flag(2, &config), Flag::Required);

        // the antecedent replaces the pronoun under the preposition
        let adverbial = relative.constituent(2).and_then(Constituent::span).unwrap();
        assert_eq!(
            adverbial.graph.relation(TokenId(5), TokenId(4)),
            Some(Relation::PrepositionalObject)
        );
        assert_eq!(adverbial.graph.relation(TokenId(5), TokenId(6)), None);
        assert_eq!(graph.relation(TokenId(5), TokenId(6)), Some(Relation::PrepositionalObject));
    }

    #[test]
    fn test_possessive_relative() {
        // "I saw the man whose car broke"
        let graph = GraphBuilder::new()
            .token(1, "I", "I", "PRP")
            .token(2, "saw", "see", "VBD")
            .token(3, "the", "the", "DT")
            .token(4, "man", "man", "NN")
            .token(5, "whose", "whose", "WP$")
            .token(6, "car", "car", "NN")
            .token(7, "broke", "break", "VBD")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::RelativeClauseModifier, 7)
            .edge(7, Relation::NominalSubject, 6)
            .edge(6, Relation::PossessionModifier, 5)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (V: saw@2, S: I@1, O: man@4)",
                "SVO (S: man@4, V: \"has\", O: car@6)",
                "SV (V: broke@7, S: car@6)",
            ]
        );

        // "car" is possessed by the antecedent, not the pronoun
        let subject = clauses[2].constituent(1).and_then(Constituent::span).unwrap();
        assert_eq!(
            subject.graph.relation(TokenId(6), TokenId(4)),
            Some(Relation::PossessionModifier)
        );
        assert_eq!(subject.graph.relation(TokenId(6), TokenId(5)), None);
    }

    #[test]
    fn test_possessive_relative_under_preposition() {
        // "I know the man in whose house I live"
        let graph = GraphBuilder::new()
            .token(1, "I", "I", "PRP")
            .token(2, "know", "know", "VBP")
            .token(3, "the", "the", "DT")
            .token(4, "man", "man", "NN")
            .token(5, "in", "in", "IN")
            .token(6, "whose", "whose", "WP$")
            .token(7, "house", "house", "NN")
            .token(8, "I", "I", "PRP")
            .token(9, "live", "live", "VBP")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::RelativeClauseModifier, 9)
            .edge(9, Relation::NominalSubject, 8)
            .edge(9, Relation::Relative, 5)
            .edge(5, Relation::PrepositionalObject, 7)
            .edge(7, Relation::PossessionModifier, 6)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[1].to_string(), "SVO (S: man@4, V: \"has\", O: house@7)");
    }

    #[test]
    fn test_possessive_relative_without_governor() {
        let graph = GraphBuilder::new()
            .token(1, "whose", "whose", "WP$")
            .token(2, "car", "car", "NN")
            .edge(2, Relation::PossessionModifier, 1)
            .build();

        let result = detect_clauses(&graph, &Configuration::default());
        assert!(matches!(
            result,
            Err(DetectionError::MalformedGraph { token: TokenId(2), .. })
        ));
    }

    #[test]
    fn test_parataxis() {
        // "Profits rose, analysts said"
        let graph = GraphBuilder::new()
            .token(1, "Profits", "profit", "NNS")
            .token(2, "rose", "rise", "VBD")
            .token(3, "analysts", "analyst", "NNS")
            .token(4, "said", "say", "VBD")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::Parataxis, 4)
            .edge(4, Relation::NominalSubject, 3)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SV (V: rose@2, S: Profits@1)",
                "SVO (S: analysts@3, V: said@4, O: rose@2)",
            ]
        );
        assert_eq!(clauses[1].parent, None);
    }

    #[test]
    fn test_coordinated_verbs() {
        // "Bell makes and distributes products"
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "makes", "make", "VBZ")
            .token(3, "and", "and", "CC")
            .token(4, "distributes", "distribute", "VBZ")
            .token(5, "products", "product", "NNS")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::Coordination, 3)
            .edge(2, Relation::Conjunct, 4)
            .edge(2, Relation::DirectObject, 5)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (V: makes@2, S: Bell@1, O: products@5)",
                "SVO (V: distributes@4, S: Bell@1, O: products@5)",
            ]
        );
        assert_eq!(clauses[1].parent, Some(0));
    }

    #[test]
    fn test_existential() {
        // "There is a ghost in the room"
        let graph = GraphBuilder::new()
            .token(1, "There", "there", "EX")
            .token(2, "is", "be", "VBZ")
            .token(3, "a", "a", "DT")
            .token(4, "ghost", "ghost", "NN")
            .token(5, "in", "in", "IN")
            .token(6, "the", "the", "DT")
            .token(7, "room", "room", "NN")
            .edge(2, Relation::Expletive, 1)
            .edge(2, Relation::NominalSubject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(2, Relation::PrepositionalModifier, 5)
            .edge(5, Relation::PrepositionalObject, 7)
            .edge(7, Relation::Determiner, 6)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec!["EXISTENTIAL (V: is@2, S: ghost@4, A: in@5)"]
        );
    }

    #[test]
    fn test_participial_modifier() {
        // "He saw a man crying"
        let graph = GraphBuilder::new()
            .token(1, "He", "he", "PRP")
            .token(2, "saw", "see", "VBD")
            .token(3, "a", "a", "DT")
            .token(4, "man", "man", "NN")
            .token(5, "crying", "cry", "VBG")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 4)
            .edge(4, Relation::Determiner, 3)
            .edge(4, Relation::ParticipialModifier, 5)
            .build();

        let clauses = detect_clauses(&graph, &Configuration::default()).unwrap();
        assert_eq!(
            describe(&clauses),
            vec![
                "SVO (V: saw@2, S: He@1, O: man@4)",
                "SVA (V: \"be crying\", S: man@4)",
            ]
        );
        assert_eq!(clauses[1].parent, Some(0));

        let config = Configuration::default().with_switch(Switches::PARTICIPIAL_MODIFIERS, false);
        assert_eq!(detect_clauses(&graph, &config).unwrap().len(), 1);
    }

    #[test]
    fn test_recursion_limit() {
        // two open complements controlling each other
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "tried", "try", "VBD")
            .token(3, "wanted", "want", "VBD")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::OpenClausalComplement, 3)
            .edge(3, Relation::OpenClausalComplement, 2)
            .build();

        let result = detect_clauses(&graph, &Configuration::default());
        assert!(matches!(
            result,
            Err(DetectionError::RecursionLimit { depth: MAX_NESTING })
        ));
    }

    const DEPENDENTS: [(Relation, &str); 8] = [
        (Relation::DirectObject, "NN"),
        (Relation::IndirectObject, "NN"),
        (Relation::PrepositionalModifier, "IN"),
        (Relation::AdverbialModifier, "RB"),
        (Relation::TemporalModifier, "NN"),
        (Relation::AdjectivalComplement, "JJ"),
        (Relation::ClausalComplement, "VBD"),
        (Relation::Dependent, "NN"),
    ];

    proptest! {
        #[test]
        fn test_detection_is_total(
            verb_at in 1usize..6,
            picks in proptest::collection::vec(0usize..DEPENDENTS.len(), 0..6),
        ) {
            // 1. A flat clause: subject, verb and arbitrary dependents around it
            let total = picks.len() + 2;
            let verb_at = verb_at.min(total);
            let mut builder = GraphBuilder::new();
            let mut others = (1..=total as u32).filter(|id| *id != verb_at as u32);
            let subject = others.next().unwrap();
            builder = builder
                .token(verb_at as u32, "runs", "run", "VBZ")
                .token(subject, "Bell", "Bell", "NNP")
                .edge(verb_at as u32, Relation::NominalSubject, subject);
            for (id, pick) in others.zip(picks.iter()) {
                let (relation, tag) = DEPENDENTS[*pick];
                builder = builder
                    .token(id, "w", "w", tag)
                    .edge(verb_at as u32, relation, id);
            }
            let graph = builder.build();
            let config = Configuration::default();

            // 2. Every clause gets a type and required subject and verb
            let clauses = detect_clauses(&graph, &config).unwrap();
            prop_assert_eq!(clauses.len(), 1);
            for clause in &clauses {
                prop_assert!(clause.clause_type != ClauseType::Unknown);
                prop_assert!(clause.verb < clause.constituents.len());
                prop_assert_eq!(clause.flag(clause.verb, &config), crate::Flag::Required);
                if let Some(subject) = clause.subject {
                    prop_assert_eq!(clause.flag(subject, &config), crate::Flag::Required);
                }
            }
        }
    }
}
