use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use logos_protocol::{Relation, Token, TokenId};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Token not found: {0}")]
    UnknownToken(TokenId),

    #[error("Token already present: {0}")]
    DuplicateToken(TokenId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A typed arc `governor --relation--> dependent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyEdge {
    pub governor: TokenId,
    pub dependent: TokenId,
    pub relation: Relation,
}

impl DependencyEdge {
    pub fn new(governor: TokenId, relation: Relation, dependent: TokenId) -> Self {
        Self {
            governor,
            dependent,
            relation,
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.relation, self.governor, self.dependent)
    }
}

/// Typed dependency graph of one sentence.
///
/// Nodes are tokens keyed by their 1-based position. The graph may be a DAG
/// or carry cycles after relative-clause rewiring; every traversal here is
/// cycle-safe. Cloning is a deep copy.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: Graph<Token, Relation, Directed>,
    index_map: BTreeMap<TokenId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: BTreeMap::new(),
        }
    }

    pub fn add_token(&mut self, token: Token) -> GraphResult<()> {
        if self.index_map.contains_key(&token.id) {
            return Err(GraphError::DuplicateToken(token.id));
        }
        let id = token.id;
        let idx = self.graph.add_node(token);
        self.index_map.insert(id, idx);
        Ok(())
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.index_map.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn try_token(&self, id: TokenId) -> GraphResult<&Token> {
        self.token(id).ok_or(GraphError::UnknownToken(id))
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.index_map.contains_key(&id)
    }

    /// Tokens in sentence order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.index_map.values().map(move |idx| &self.graph[*idx])
    }

    pub fn len(&self) -> usize {
        self.index_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_map.is_empty()
    }

    fn node(&self, id: TokenId) -> GraphResult<NodeIndex> {
        self.index_map
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownToken(id))
    }

    /// Adds an edge. Returns `false` if the identical edge already existed.
    pub fn add_edge(
        &mut self,
        governor: TokenId,
        relation: Relation,
        dependent: TokenId,
    ) -> GraphResult<bool> {
        let from = self.node(governor)?;
        let to = self.node(dependent)?;
        let exists = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .any(|edge| edge.target() == to && *edge.weight() == relation);
        if exists {
            return Ok(false);
        }
        self.graph.add_edge(from, to, relation);
        Ok(true)
    }

    /// Removes one edge. Returns `false` if it was not present.
    pub fn remove_edge(&mut self, edge: &DependencyEdge) -> bool {
        let (Some(from), Some(to)) = (
            self.index_map.get(&edge.governor).copied(),
            self.index_map.get(&edge.dependent).copied(),
        ) else {
            return false;
        };
        let found = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|candidate| candidate.target() == to && *candidate.weight() == edge.relation)
            .map(|candidate| candidate.id());
        match found {
            Some(id) => self.graph.remove_edge(id).is_some(),
            None => false,
        }
    }

    fn edge_at(&self, from: NodeIndex, to: NodeIndex, relation: Relation) -> DependencyEdge {
        DependencyEdge {
            governor: self.graph[from].id,
            dependent: self.graph[to].id,
            relation,
        }
    }

    /// All edges ordered by governor, then dependent, then relation.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_references()
            .map(|edge| self.edge_at(edge.source(), edge.target(), *edge.weight()))
            .collect();
        edges.sort();
        edges
    }

    /// Outgoing edges of `id` ordered by dependent position.
    pub fn outgoing(&self, id: TokenId) -> Vec<DependencyEdge> {
        let Some(idx) = self.index_map.get(&id).copied() else {
            return Vec::new();
        };
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| self.edge_at(edge.source(), edge.target(), *edge.weight()))
            .collect();
        edges.sort_by_key(|edge| (edge.dependent, edge.relation));
        edges
    }

    /// Incoming edges of `id` ordered by governor position.
    pub fn incoming(&self, id: TokenId) -> Vec<DependencyEdge> {
        let Some(idx) = self.index_map.get(&id).copied() else {
            return Vec::new();
        };
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| self.edge_at(edge.source(), edge.target(), *edge.weight()))
            .collect();
        edges.sort_by_key(|edge| (edge.governor, edge.relation));
        edges
    }

    pub fn has_children(&self, id: TokenId) -> bool {
        self.index_map
            .get(&id)
            .map(|idx| {
                self.graph
                    .edges_directed(*idx, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .unwrap_or(false)
    }

    /// First governor of `id` in sentence order.
    pub fn parent(&self, id: TokenId) -> Option<TokenId> {
        self.incoming(id).first().map(|edge| edge.governor)
    }

    pub fn parents(&self, id: TokenId) -> Vec<TokenId> {
        let mut parents: Vec<TokenId> = self.incoming(id).iter().map(|e| e.governor).collect();
        parents.dedup();
        parents
    }

    pub fn children(&self, id: TokenId) -> Vec<TokenId> {
        let mut children: Vec<TokenId> = self.outgoing(id).iter().map(|e| e.dependent).collect();
        children.dedup();
        children
    }

    /// Other children of every parent of `id`.
    pub fn siblings(&self, id: TokenId) -> Vec<TokenId> {
        let siblings: BTreeSet<TokenId> = self
            .parents(id)
            .into_iter()
            .flat_map(|parent| self.children(parent))
            .filter(|sibling| *sibling != id)
            .collect();
        siblings.into_iter().collect()
    }

    /// Relation of the first edge `governor -> dependent`.
    pub fn relation(&self, governor: TokenId, dependent: TokenId) -> Option<Relation> {
        self.outgoing(governor)
            .into_iter()
            .find(|edge| edge.dependent == dependent)
            .map(|edge| edge.relation)
    }

    /// `id` plus every token reachable from it.
    pub fn descendants(&self, id: TokenId) -> BTreeSet<TokenId> {
        let mut seen = BTreeSet::new();
        let Some(start) = self.index_map.get(&id).copied() else {
            return seen;
        };

        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(self.graph[current].id) {
                continue;
            }
            for edge in self.graph.edges_directed(current, Direction::Outgoing) {
                queue.push_back(edge.target());
            }
        }
        seen
    }

    /// Leftmost token of the subtree under `id`.
    pub fn leftmost(&self, id: TokenId) -> TokenId {
        self.descendants(id).into_iter().next().unwrap_or(id)
    }

    /// Tokens without governors.
    pub fn roots(&self) -> Vec<TokenId> {
        self.index_map
            .iter()
            .filter(|(_, idx)| {
                self.graph
                    .edges_directed(**idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Walks down from `root` and cuts every edge that leads to an excluded
    /// token or carries an excluded relation. `excluded_top` applies to the
    /// edges leaving `root` only. Subtrees behind a cut edge are not visited.
    pub fn remove_edges(
        &mut self,
        root: TokenId,
        excluded_tokens: &BTreeSet<TokenId>,
        excluded_relations: &[Relation],
        excluded_top: &[Relation],
    ) {
        if excluded_tokens.contains(&root) {
            return;
        }
        let mut doomed = Vec::new();
        let mut visited = BTreeSet::new();
        self.collect_cut_edges(
            root,
            excluded_tokens,
            excluded_relations,
            excluded_top,
            &mut visited,
            &mut doomed,
        );
        for edge in &doomed {
            self.remove_edge(edge);
        }
    }

    fn collect_cut_edges(
        &self,
        node: TokenId,
        excluded_tokens: &BTreeSet<TokenId>,
        excluded_relations: &[Relation],
        excluded_top: &[Relation],
        visited: &mut BTreeSet<TokenId>,
        doomed: &mut Vec<DependencyEdge>,
    ) {
        if !visited.insert(node) {
            return;
        }
        for edge in self.outgoing(node) {
            if excluded_tokens.contains(&edge.dependent)
                || excluded_relations.contains(&edge.relation)
                || excluded_top.contains(&edge.relation)
            {
                doomed.push(edge);
            } else {
                self.collect_cut_edges(
                    edge.dependent,
                    excluded_tokens,
                    excluded_relations,
                    &[],
                    visited,
                    doomed,
                );
            }
        }
    }

    /// Dependents of `root` whose relation is one of `relations` or a specialization of one.
    pub fn exclude(&self, root: TokenId, relations: &[Relation]) -> BTreeSet<TokenId> {
        self.outgoing(root)
            .into_iter()
            .filter(|edge| logos_protocol::contains_ancestor(relations, edge.relation))
            .map(|edge| edge.dependent)
            .collect()
    }
}

impl fmt::Display for DependencyGraph {
    /// One `rel(governor-i, dependent-j)` line per edge.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in self.edges() {
            let word = |id: TokenId| self.token(id).map(|t| t.word.as_str()).unwrap_or("?");
            writeln!(
                f,
                "{}({}-{}, {}-{})",
                edge.relation,
                word(edge.governor),
                edge.governor,
                word(edge.dependent),
                edge.dependent
            )?;
        }
        Ok(())
    }
}

/// First edge with exactly `relation`.
pub fn find_first(edges: &[DependencyEdge], relation: Relation) -> Option<DependencyEdge> {
    edges.iter().copied().find(|edge| edge.relation == relation)
}

/// First edge whose relation is `relation` or a specialization of it.
pub fn find_first_descendant(
    edges: &[DependencyEdge],
    relation: Relation,
) -> Option<DependencyEdge> {
    edges
        .iter()
        .copied()
        .find(|edge| relation.is_ancestor_of(edge.relation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::GraphBuilder;

    fn bell() -> DependencyGraph {
        // "Bell makes electronic, computer and building products"
        GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "makes", "make", "VBZ")
            .token(3, "electronic", "electronic", "JJ")
            .token(4, "computer", "computer", "NN")
            .token(5, "and", "and", "CC")
            .token(6, "building", "building", "NN")
            .token(7, "products", "product", "NNS")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 7)
            .edge(7, Relation::AdjectivalModifier, 3)
            .edge(3, Relation::Conjunct, 4)
            .edge(3, Relation::Coordination, 5)
            .edge(3, Relation::Conjunct, 6)
            .build()
    }

    #[test]
    fn test_sorted_edges() {
        let graph = bell();

        let out: Vec<u32> = graph.outgoing(TokenId(3)).iter().map(|e| e.dependent.0).collect();
        assert_eq!(out, vec![4, 5, 6]);

        let all = graph.edges();
        assert_eq!(all.first().map(|e| (e.governor.0, e.dependent.0)), Some((2, 1)));
        assert_eq!(all.last().map(|e| (e.governor.0, e.dependent.0)), Some((7, 3)));

        assert_eq!(graph.parent(TokenId(3)), Some(TokenId(7)));
        assert_eq!(graph.siblings(TokenId(7)), vec![TokenId(1)]);
        assert_eq!(graph.roots(), vec![TokenId(2)]);
        assert_eq!(graph.relation(TokenId(2), TokenId(7)), Some(Relation::DirectObject));
    }

    #[test]
    fn test_descendants_and_clone() {
        let graph = bell();
        let mut copy = graph.clone();

        let below: Vec<u32> = graph.descendants(TokenId(7)).iter().map(|t| t.0).collect();
        assert_eq!(below, vec![3, 4, 5, 6, 7]);
        assert_eq!(graph.leftmost(TokenId(7)), TokenId(3));

        // mutating the copy leaves the original intact
        assert!(copy.remove_edge(&DependencyEdge::new(
            TokenId(7),
            Relation::AdjectivalModifier,
            TokenId(3)
        )));
        assert_eq!(copy.descendants(TokenId(7)).len(), 1);
        assert_eq!(graph.descendants(TokenId(7)).len(), 5);
    }

    #[test]
    fn test_cycles_terminate() {
        // "house" <-pobj- "in" <-prep- "grew" <-rcmod- "house"
        let mut graph = GraphBuilder::new()
            .token(1, "house", "house", "NN")
            .token(2, "grew", "grow", "VBD")
            .token(3, "in", "in", "IN")
            .edge(1, Relation::RelativeClauseModifier, 2)
            .edge(2, Relation::PrepositionalModifier, 3)
            .edge(3, Relation::PrepositionalObject, 1)
            .build();

        assert_eq!(graph.descendants(TokenId(3)).len(), 3);

        let excluded = BTreeSet::from([TokenId(2)]);
        graph.remove_edges(TokenId(3), &excluded, &[], &[]);
        assert_eq!(graph.descendants(TokenId(3)).len(), 2);
    }

    #[test]
    fn test_remove_edges_by_relation() {
        let mut graph = bell();
        graph.remove_edges(TokenId(2), &BTreeSet::new(), &[], &[Relation::NominalSubject]);
        assert!(!graph.descendants(TokenId(2)).contains(&TokenId(1)));

        // excluded_top only applies at the root
        let mut graph = bell();
        graph.remove_edges(TokenId(2), &BTreeSet::new(), &[], &[Relation::Conjunct]);
        assert_eq!(graph.descendants(TokenId(2)).len(), 7);

        let mut graph = bell();
        graph.remove_edges(TokenId(2), &BTreeSet::new(), &[Relation::Conjunct], &[]);
        assert_eq!(graph.descendants(TokenId(2)).len(), 5);
    }

    #[test]
    fn test_exclude_uses_hierarchy() {
        let graph = GraphBuilder::new()
            .token(1, "Einstein", "Einstein", "NNP")
            .token(2, "is", "be", "VBZ")
            .token(3, "not", "not", "RB")
            .token(4, "smart", "smart", "JJ")
            .edge(4, Relation::NominalSubject, 1)
            .edge(4, Relation::Copula, 2)
            .edge(4, Relation::Negation, 3)
            .build();

        let excluded = graph.exclude(TokenId(4), &[Relation::Subject, Relation::Auxiliary]);
        assert_eq!(excluded, BTreeSet::from([TokenId(1), TokenId(2)]));

        let verb_side = graph.exclude(TokenId(4), &[Relation::Negation]);
        assert_eq!(verb_side, BTreeSet::from([TokenId(3)]));
    }

    #[test]
    fn test_token_errors() {
        let mut graph = bell();
        assert_eq!(
            graph.add_token(Token::new(1, "x", "x", "NN")),
            Err(GraphError::DuplicateToken(TokenId(1)))
        );
        assert_eq!(
            graph.add_edge(TokenId(1), Relation::Dependent, TokenId(42)),
            Err(GraphError::UnknownToken(TokenId(42)))
        );
        // identical edges are stored once
        assert_eq!(graph.add_edge(TokenId(2), Relation::NominalSubject, TokenId(1)), Ok(false));
    }
}
