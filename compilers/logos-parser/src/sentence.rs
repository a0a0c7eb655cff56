use std::iter::Enumerate;
use std::str::Lines;

use logos_graph::DependencyGraph;
use logos_protocol::{Relation, SentenceId, Token, TokenId};
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::parser::{id_comment, line, Line, Row};

/// One parsed sentence.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    /// From a `# id = N` comment, when the block has one.
    pub id: Option<SentenceId>,
    /// 1-based input line of the first token row.
    pub line: usize,
    pub graph: DependencyGraph,
}

impl Sentence {
    /// Surface forms joined by spaces.
    pub fn text(&self) -> String {
        self.graph
            .tokens()
            .map(|token| token.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Iterator over the sentences of a CoNLL-X document.
///
/// A malformed block yields one error and the iterator moves on to the next
/// block, so a batch run can report the failure and keep going.
pub struct Sentences<'a> {
    lines: Enumerate<Lines<'a>>,
}

pub fn sentences(input: &str) -> Sentences<'_> {
    Sentences {
        lines: input.lines().enumerate(),
    }
}

/// Parses every sentence, stopping at the first malformed one.
pub fn parse_document(input: &str) -> ParseResult<Vec<Sentence>> {
    sentences(input).collect()
}

/// Parses a single block. Input without token rows is an empty sentence.
pub fn parse_sentence(block: &str) -> ParseResult<Sentence> {
    sentences(block).next().unwrap_or_else(|| Ok(Sentence::default()))
}

#[derive(Default)]
struct Block<'a> {
    id: Option<SentenceId>,
    rows: Vec<(usize, Row<'a>)>,
    error: Option<ParseError>,
}

impl<'a> Block<'a> {
    fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.error.is_none()
    }

    fn build(self) -> ParseResult<Sentence> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut graph = DependencyGraph::new();
        for (_, row) in &self.rows {
            let lemma = if row.lemma == "_" {
                row.form.to_lowercase()
            } else {
                row.lemma.to_owned()
            };
            graph.add_token(Token::new(row.id, row.form, &lemma, row.tag()))?;
        }
        for (line, row) in &self.rows {
            if row.head == 0 {
                continue;
            }
            let head = TokenId(row.head);
            if !graph.contains(head) {
                return Err(ParseError::UnknownHead {
                    line: *line,
                    head: row.head,
                });
            }
            graph.add_edge(head, Relation::from_label(row.deprel), TokenId(row.id))?;
        }

        let line = self.rows.first().map_or(0, |(line, _)| *line);
        trace!(target: "logos::ingest", line, tokens = graph.len(), "sentence read");
        Ok(Sentence {
            id: self.id,
            line,
            graph,
        })
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = ParseResult<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = Block::default();

        for (index, raw) in self.lines.by_ref() {
            let number = index + 1;
            match line(raw.trim_end_matches('\r')) {
                Ok((_, Line::Blank)) => {
                    if !block.is_empty() {
                        break;
                    }
                }
                Ok((_, Line::Comment(comment))) => {
                    if let Ok((_, id)) = id_comment(comment) {
                        block.id = Some(SentenceId(id));
                    }
                }
                Ok((_, Line::Row(row))) => block.rows.push((number, row)),
                Err(error) => {
                    if block.error.is_none() {
                        block.error = Some(ParseError::Syntax {
                            line: number,
                            message: format!("malformed token row ({})", error),
                        });
                    }
                }
            }
        }

        if block.is_empty() {
            None
        } else {
            Some(block.build())
        }
    }
}
