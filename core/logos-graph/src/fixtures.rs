//! Hand-built sentence graphs for tests.

use logos_protocol::{Relation, Token, TokenId};

use crate::DependencyGraph;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    tokens: Vec<Token>,
    edges: Vec<(u32, Relation, u32)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, id: u32, word: &str, lemma: &str, tag: &str) -> Self {
        self.tokens.push(Token::new(id, word, lemma, tag));
        self
    }

    /// `governor --relation--> dependent`, by token position.
    pub fn edge(mut self, governor: u32, relation: Relation, dependent: u32) -> Self {
        self.edges.push((governor, relation, dependent));
        self
    }

    /// Panics on inconsistent fixtures.
    pub fn build(self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for token in self.tokens {
            graph.add_token(token).expect("fixture token ids must be unique");
        }
        for (governor, relation, dependent) in self.edges {
            graph
                .add_edge(TokenId(governor), relation, TokenId(dependent))
                .expect("fixture edges must reference declared tokens");
        }
        graph
    }
}
