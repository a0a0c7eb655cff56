//! Coordination splitting.
//!
//! Two passes use it. Detection asks [`coordinated_heads`] which conjuncts
//! of a predicate head their own clause. Generation asks [`alternatives`]
//! for one constituent per conjunct found below a constituent root, so that
//! "electronic, computer and building products" yields three objects.

use std::collections::BTreeSet;
use std::sync::Arc;

use logos_graph::{
    binds_pair, find_first, find_first_descendant, shares_dependent, DependencyEdge,
    DependencyGraph, GraphResult,
};
use logos_protocol::{Configuration, Relation, TokenId};
use tracing::trace;

use crate::constituent::{Constituent, Role, Span};

fn lemma_is(graph: &DependencyGraph, id: TokenId, lemma: &str) -> bool {
    graph.token(id).is_some_and(|token| token.lemma == lemma)
}

/// Every dependent of `root`, apart from subjects and coordination markers,
/// also belongs to `conjunct`.
fn shares_all(outgoing: &[DependencyEdge], root: TokenId, conjunct: TokenId) -> bool {
    outgoing
        .iter()
        .filter(|edge| {
            !(edge.relation.is_any_subject()
                || edge.relation.is_coordinator()
                || edge.relation == Relation::Punctuation
                || edge.dependent == conjunct)
        })
        .all(|edge| shares_dependent(root, conjunct, edge.dependent))
}

/// Splits coordinated predicates below `root`.
///
/// Returns `root` followed by every conjunct that heads a clause of its own.
/// Conjuncts carrying their own subject or expletive are cut loose without
/// being returned; they are detected through their own subject edge. Each
/// returned head inherits the governors and shared dependents of the heads
/// before it, and the coordinating edges are removed.
pub fn coordinated_heads(
    graph: &mut DependencyGraph,
    root: TokenId,
    config: &Configuration,
) -> GraphResult<Vec<TokenId>> {
    let mut heads = vec![root];
    let mut doomed = Vec::new();

    let view: &DependencyGraph = graph;
    let outgoing = view.outgoing(root);
    let root_is_verb = view.try_token(root)?.is_verb();

    for edge in outgoing.iter().filter(|edge| edge.relation == Relation::Conjunct) {
        let conjunct = edge.dependent;
        let below = view.outgoing(conjunct);

        let verbal = root_is_verb || view.try_token(conjunct)?.is_verb();
        let copular = find_first_descendant(&below, Relation::Copula).is_some();
        let independent = find_first_descendant(&below, Relation::Subject).is_some()
            || find_first_descendant(&below, Relation::Expletive).is_some();
        let redundant = !config.coordination_on_verbs()
            && below.is_empty()
            && shares_all(&outgoing, root, conjunct);

        if (verbal || copular) && !independent && !redundant {
            heads.push(conjunct);
        }
        if ((verbal || copular) && !redundant) || independent {
            doomed.push(*edge);
            if config.coordination_on_verbs() || !redundant {
                let marker = outgoing
                    .iter()
                    .filter(|marker| marker.relation == Relation::Coordination)
                    .filter(|marker| marker.dependent <= conjunct)
                    .find(|marker| binds_pair(view, root, conjunct, marker.dependent));
                if let Some(marker) = marker {
                    doomed.push(*marker);
                }
            }
        }
    }

    if heads.len() > 1 {
        rewrite_heads(graph, &heads)?;
    }
    for edge in &doomed {
        graph.remove_edge(edge);
    }

    trace!(
        target: "logos::coordination",
        root = %root,
        heads = heads.len(),
        cut = doomed.len(),
        "split predicate"
    );
    Ok(heads)
}

/// Makes each head self-sufficient: later heads receive the governors of
/// earlier ones and the dependents they share with them.
fn rewrite_heads(graph: &mut DependencyGraph, heads: &[TokenId]) -> GraphResult<()> {
    for (i, &head) in heads.iter().enumerate() {
        for &other in &heads[i + 1..] {
            for edge in graph.incoming(head) {
                if edge.governor == other || graph.parents(other).contains(&edge.governor) {
                    continue;
                }
                graph.add_edge(edge.governor, edge.relation, other)?;
            }

            for edge in graph.outgoing(head) {
                let child = edge.dependent;
                if child == other || graph.children(other).contains(&child) {
                    continue;
                }
                if !edge.relation.is_any_conjunct()
                    && edge.relation != Relation::Coordination
                    && shares_dependent(head, other, child)
                {
                    graph.add_edge(other, edge.relation, child)?;
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Draft {
    graph: usize,
    root: TokenId,
    excluded: BTreeSet<TokenId>,
}

/// Forks working graphs while walking down from a constituent root.
struct Rewriter<'a> {
    base: &'a Span,
    graphs: Vec<DependencyGraph>,
    drafts: Vec<Draft>,
    visited: BTreeSet<(usize, TokenId)>,
}

impl<'a> Rewriter<'a> {
    fn new(base: &'a Span) -> Self {
        Self {
            base,
            graphs: vec![base.reduced_graph()],
            drafts: vec![Draft {
                graph: 0,
                root: base.root,
                excluded: base.excluded.clone(),
            }],
            visited: BTreeSet::new(),
        }
    }

    /// "between X and Y" is one argument, not two.
    fn splits_at(&self, graph: usize, root: TokenId, outgoing: &[DependencyEdge]) -> bool {
        let working = &self.graphs[graph];
        let quantified = find_first(outgoing, Relation::QuantifierModifier)
            .is_some_and(|edge| lemma_is(working, edge.dependent, "between"));
        let governed = find_first(&working.incoming(root), Relation::PrepositionalObject)
            .is_some_and(|edge| lemma_is(working, edge.governor, "between"));
        !(quantified || governed)
    }

    /// First sibling of `root` attached as predeterminer or determiner.
    fn sibling_determiner(&self, graph: usize, root: TokenId) -> Option<DependencyEdge> {
        let working = &self.graphs[graph];
        working.siblings(root).into_iter().find_map(|sibling| {
            let incoming = working.incoming(sibling);
            find_first(&incoming, Relation::Predeterminer)
                .or_else(|| find_first(&incoming, Relation::Determiner))
        })
    }

    fn walk(
        &mut self,
        graph: usize,
        owner: usize,
        root: TokenId,
        first_level: bool,
    ) -> GraphResult<()> {
        if !self.visited.insert((graph, root)) {
            return Ok(());
        }

        let outgoing = self.graphs[graph].outgoing(root);
        let markers: Vec<DependencyEdge> = outgoing
            .iter()
            .copied()
            .filter(|edge| edge.relation == Relation::Coordination)
            .collect();
        let split = self.splits_at(graph, root, &outgoing);
        let determiner = self.sibling_determiner(graph, root);

        for edge in &outgoing {
            let relation = edge.relation;
            // these head clauses of their own
            if matches!(
                relation,
                Relation::Parataxis | Relation::RelativeClauseModifier | Relation::Apposition
            ) || (relation == Relation::Dependent && self.base.role == Role::Verb)
            {
                continue;
            }

            if relation.is_any_conjunct() && split {
                let working = &self.graphs[graph];
                let ampersand = markers.iter().any(|marker| {
                    lemma_is(working, marker.dependent, "&")
                        && binds_pair(working, root, edge.dependent, marker.dependent)
                });
                if ampersand {
                    continue;
                }
                self.fork(graph, owner, root, *edge, &outgoing, determiner, first_level)?;
            } else if relation.is_coordinator()
                && split
                && !lemma_is(&self.graphs[graph], edge.dependent, "&")
            {
                self.graphs[graph].remove_edge(edge);
            } else if relation != Relation::Predeterminer
                && !self.drafts[owner].excluded.contains(&edge.dependent)
            {
                self.walk(graph, owner, edge.dependent, false)?;
            }
        }
        Ok(())
    }

    /// Detaches the conjunct behind `edge` into a graph of its own where it
    /// takes the place of `root`.
    #[allow(clippy::too_many_arguments)]
    fn fork(
        &mut self,
        graph: usize,
        owner: usize,
        root: TokenId,
        edge: DependencyEdge,
        outgoing: &[DependencyEdge],
        determiner: Option<DependencyEdge>,
        first_level: bool,
    ) -> GraphResult<()> {
        let conjunct = edge.dependent;
        let mut forked = self.graphs[graph].clone();

        if let Some(determiner) = determiner {
            if lemma_is(&self.graphs[graph], determiner.dependent, "both") {
                self.drafts[owner].excluded.insert(determiner.dependent);
            }
        }

        let mut draft = self.drafts[owner].clone();
        draft.graph = self.graphs.len();
        if first_level {
            draft.root = conjunct;
        }

        for parent in forked.parents(root) {
            if let Some(relation) = forked.relation(parent, root) {
                forked.add_edge(parent, relation, conjunct)?;
            }
        }
        for child_edge in outgoing {
            let child = child_edge.dependent;
            if child_edge.relation == Relation::Predeterminer
                && lemma_is(&self.graphs[graph], child, "both")
            {
                self.graphs[graph].remove_edge(child_edge);
            } else if !child_edge.relation.is_any_conjunct()
                && !child_edge.relation.is_coordinator()
                && child != conjunct
                && shares_dependent(root, conjunct, child)
            {
                forked.add_edge(conjunct, child_edge.relation, child)?;
            }
        }
        for incoming in forked.incoming(root) {
            forked.remove_edge(&incoming);
        }
        self.graphs[graph].remove_edge(&edge);

        let forked_index = self.graphs.len();
        self.graphs.push(forked);
        self.drafts.push(draft);

        let next_owner = if first_level {
            self.drafts.len() - 1
        } else {
            owner
        };
        self.walk(forked_index, next_owner, conjunct, false)
    }
}

/// One constituent per conjunct reachable from the constituent root, the
/// original first. Literals and embedded clauses come back unchanged.
pub fn alternatives(constituent: &Arc<Constituent>) -> GraphResult<Vec<Arc<Constituent>>> {
    let Constituent::Span(span) = constituent.as_ref() else {
        return Ok(vec![constituent.clone()]);
    };

    let mut rewriter = Rewriter::new(span);
    rewriter.walk(0, 0, span.root, true)?;
    let Rewriter { graphs, drafts, .. } = rewriter;

    if drafts.len() > 1 {
        trace!(
            target: "logos::coordination",
            root = %span.root,
            alternatives = drafts.len(),
            "split constituent"
        );
    }

    let graphs: Vec<Arc<DependencyGraph>> = graphs.into_iter().map(Arc::new).collect();
    Ok(drafts
        .into_iter()
        .map(|draft| {
            Arc::new(Constituent::Span(Span {
                graph: graphs[draft.graph].clone(),
                sentence: span.sentence.clone(),
                root: draft.root,
                additional_roots: span.additional_roots.clone(),
                excluded: draft.excluded,
                role: span.role,
            }))
        })
        .collect())
}
