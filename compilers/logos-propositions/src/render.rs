use std::collections::BTreeSet;

use logos_clauses::{Constituent, Span};
use logos_graph::GraphResult;
use logos_protocol::{Relation, TokenId};

use crate::error::{GenerationError, GenerationResult};

/// Subtrees that belong to other clauses.
const EXCLUDED: [Relation; 3] = [
    Relation::RelativeClauseModifier,
    Relation::Apposition,
    Relation::Parataxis,
];

/// Verbs also drop unlabeled dependents.
const EXCLUDED_FROM_VERB: [Relation; 4] = [
    Relation::RelativeClauseModifier,
    Relation::Apposition,
    Relation::Parataxis,
    Relation::Dependent,
];

/// Tokens a span covers once it is cut off from its siblings and from
/// subtrees reached through `relations`.
pub fn span_words(span: &Span, relations: &[Relation]) -> BTreeSet<TokenId> {
    let mut reduced = span.reduced_graph();
    reduced.remove_edges(span.root, &BTreeSet::new(), relations, &[]);

    let mut words = reduced.descendants(span.root);
    for extra in &span.additional_roots {
        words.extend(reduced.descendants(*extra));
    }
    words
}

/// Space-joined text of a span in sentence order. A prepositional phrase
/// leads with its preposition even when a particle precedes it.
pub fn render_span(span: &Span, relations: &[Relation], lemmatize: bool) -> GraphResult<String> {
    let mut words = span_words(span, relations);
    let mut parts = Vec::with_capacity(words.len());

    if span.is_prepositional_phrase() && words.remove(&span.root) {
        parts.push(span.graph.try_token(span.root)?.text(lemmatize));
    }
    for id in &words {
        parts.push(span.graph.try_token(*id)?.text(lemmatize));
    }
    Ok(parts.join(" "))
}

/// Text of the constituent at `index` of its clause.
pub fn render(
    constituent: &Constituent,
    index: usize,
    is_verb: bool,
    lemmatize: bool,
) -> GenerationResult<String> {
    let relations: &[Relation] = if is_verb {
        &EXCLUDED_FROM_VERB
    } else {
        &EXCLUDED
    };
    match constituent {
        Constituent::Literal { text, .. } => Ok(text.clone()),
        Constituent::Span(span) | Constituent::Embedded { span, .. } => {
            Ok(render_span(span, relations, lemmatize)?)
        }
        other => Err(GenerationError::UnsupportedConstituent {
            index,
            kind: other.kind(),
        }),
    }
}
