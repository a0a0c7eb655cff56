//! Token-position stand-ins for the phrase-structure queries used when
//! splitting coordinations.

use logos_protocol::TokenId;

use crate::DependencyGraph;

/// Largest gap between a conjunction and the start of the conjunct it joins.
pub const MAX_CONJUNCTION_GAP: u32 = 3;

/// Whether `element`, a dependent of conjunct `pivot`, also belongs to the
/// conjunct headed by `other`. Dependents lying strictly between the two
/// heads sit inside the first conjunct and stay with it.
pub fn shares_dependent(pivot: TokenId, other: TokenId, element: TokenId) -> bool {
    let (low, high) = if pivot <= other {
        (pivot, other)
    } else {
        (other, pivot)
    };
    !(low < element && element < high)
}

/// Whether `conjunction` is the word coordinating `first` with `second`.
pub fn binds_pair(
    graph: &DependencyGraph,
    first: TokenId,
    second: TokenId,
    conjunction: TokenId,
) -> bool {
    if conjunction <= first {
        return false;
    }
    let start = graph.leftmost(second);
    start > conjunction && start.0 - conjunction.0 <= MAX_CONJUNCTION_GAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::GraphBuilder;
    use logos_protocol::Relation;

    #[test]
    fn test_shares_dependent() {
        // "He ate apples and drank water": apples stays with "ate"
        assert!(shares_dependent(TokenId(2), TokenId(5), TokenId(1)));
        assert!(!shares_dependent(TokenId(2), TokenId(5), TokenId(3)));
        assert!(shares_dependent(TokenId(2), TokenId(5), TokenId(6)));
        assert!(!shares_dependent(TokenId(5), TokenId(2), TokenId(3)));
    }

    #[test]
    fn test_binds_pair() {
        // "AT & T sued", "&" between the heads
        let graph = GraphBuilder::new()
            .token(1, "AT", "AT", "NNP")
            .token(2, "&", "&", "CC")
            .token(3, "T", "T", "NNP")
            .token(4, "and", "and", "CC")
            .token(5, "the", "the", "DT")
            .token(6, "big", "big", "JJ")
            .token(7, "rival", "rival", "NN")
            .edge(1, Relation::Coordination, 2)
            .edge(1, Relation::Conjunct, 3)
            .edge(1, Relation::Coordination, 4)
            .edge(1, Relation::Conjunct, 7)
            .edge(7, Relation::Determiner, 5)
            .edge(7, Relation::AdjectivalModifier, 6)
            .build();

        assert!(binds_pair(&graph, TokenId(1), TokenId(3), TokenId(2)));
        // the subtree of "rival" starts right after "and"
        assert!(binds_pair(&graph, TokenId(1), TokenId(7), TokenId(4)));
        // "and" comes after "T", so it cannot join "AT" with "T"
        assert!(!binds_pair(&graph, TokenId(1), TokenId(3), TokenId(4)));
        // a conjunction before the first conjunct binds nothing
        assert!(!binds_pair(&graph, TokenId(3), TokenId(7), TokenId(2)));
    }
}
