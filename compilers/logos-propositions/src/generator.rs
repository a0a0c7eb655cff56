use std::collections::BTreeSet;
use std::sync::Arc;

use logos_clauses::{alternatives, Clause, Constituent, Flag};
use logos_protocol::Configuration;
use tracing::{debug, trace};

use crate::error::{GenerationError, GenerationResult};
use crate::proposition::Proposition;
use crate::render::render;

/// Generates the propositions of one sentence's clauses, clause by clause.
pub fn generate_propositions(
    clauses: &[Clause],
    config: &Configuration,
) -> GenerationResult<Vec<Proposition>> {
    PropositionGenerator::new(config).generate(clauses)
}

pub struct PropositionGenerator<'a> {
    config: &'a Configuration,
}

/// Per-clause state shared by every inclusion vector.
struct Plan {
    index: usize,
    flags: Vec<Flag>,
    options: Vec<Vec<Arc<Constituent>>>,
}

impl<'a> PropositionGenerator<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    pub fn generate(&self, clauses: &[Clause]) -> GenerationResult<Vec<Proposition>> {
        let propositions = self.generate_nested(clauses, false)?;
        debug!(
            target: "logos::generate",
            clauses = clauses.len(),
            propositions = propositions.len(),
            nary = self.config.nary(),
            "generated propositions"
        );
        Ok(propositions)
    }

    /// `embedded` marks the clauses of an open clausal complement; their
    /// subject is borrowed from the enclosing clause and is never split.
    fn generate_nested(
        &self,
        clauses: &[Clause],
        embedded: bool,
    ) -> GenerationResult<Vec<Proposition>> {
        let mut out = Vec::new();
        for (index, clause) in clauses.iter().enumerate() {
            let plan = Plan {
                index,
                flags: (0..clause.constituents.len())
                    .map(|i| clause.flag(i, self.config))
                    .collect(),
                options: self.options(clause, embedded)?,
            };

            for include in self.inclusions(&plan.flags) {
                let mut working = clause.clone();
                self.expand(&plan, &include, 0, &mut working, &mut out)?;
            }
            trace!(target: "logos::generate", clause = %clause, total = out.len(), "clause done");
        }
        Ok(out)
    }

    /// Interchangeable variants of every constituent of `clause`.
    fn options(
        &self,
        clause: &Clause,
        embedded: bool,
    ) -> GenerationResult<Vec<Vec<Arc<Constituent>>>> {
        let mut options = Vec::with_capacity(clause.constituents.len());
        for (i, constituent) in clause.constituents.iter().enumerate() {
            let borrowed_subject = embedded && clause.subject == Some(i);
            let splittable = if i == clause.verb {
                self.config.coordination_on_verbs()
            } else {
                self.config.coordination_on_non_verbs()
            };

            let variants = if borrowed_subject {
                vec![constituent.clone()]
            } else if clause.xcomps.contains(&i) {
                match constituent.as_ref() {
                    Constituent::Embedded { clauses, .. } => self
                        .generate_nested(clauses, true)?
                        .into_iter()
                        .map(|inner| {
                            // the borrowed subject is already in the enclosing clause
                            let text = inner.fields().get(1..).unwrap_or_default().join(" ");
                            Arc::new(Constituent::literal(text, constituent.role()))
                        })
                        .collect(),
                    _ => vec![constituent.clone()],
                }
            } else if splittable && matches!(constituent.as_ref(), Constituent::Span(_)) {
                alternatives(constituent)?
            } else {
                vec![constituent.clone()]
            };
            options.push(variants);
        }
        Ok(options)
    }

    /// Which constituents go into each proposition. N-ary mode keeps every
    /// non-ignored constituent at once; triple mode enumerates subsets of the
    /// optional ones within the configured bounds.
    fn inclusions(&self, flags: &[Flag]) -> Vec<Vec<bool>> {
        if self.config.nary() {
            return vec![flags.iter().map(|flag| *flag != Flag::Ignore).collect()];
        }

        let optional = flags.iter().filter(|flag| **flag == Flag::Optional).count();
        let mut out = Vec::new();
        let mut prefix = Vec::with_capacity(flags.len());
        self.enumerate(flags, optional, 0, &mut prefix, &mut out);
        out
    }

    fn enumerate(
        &self,
        flags: &[Flag],
        optional: usize,
        selected: usize,
        prefix: &mut Vec<bool>,
        out: &mut Vec<Vec<bool>>,
    ) {
        let position = prefix.len();
        if position == flags.len() {
            let min = self.config.min_optional_args.min(optional);
            if selected >= min && selected <= self.config.max_optional_args {
                out.push(prefix.clone());
            }
            return;
        }

        match flags[position] {
            Flag::Required => {
                prefix.push(true);
                self.enumerate(flags, optional, selected, prefix, out);
            }
            Flag::Optional => {
                prefix.push(true);
                self.enumerate(flags, optional, selected + 1, prefix, out);
                prefix.pop();
                prefix.push(false);
                self.enumerate(flags, optional, selected, prefix, out);
            }
            Flag::Ignore => {
                prefix.push(false);
                self.enumerate(flags, optional, selected, prefix, out);
            }
        }
        prefix.pop();
    }

    /// Cross product of the variants of included positions, in position order.
    fn expand(
        &self,
        plan: &Plan,
        include: &[bool],
        position: usize,
        working: &mut Clause,
        out: &mut Vec<Proposition>,
    ) -> GenerationResult<()> {
        if position == include.len() {
            out.push(self.proposition(plan, include, working)?);
            return Ok(());
        }
        if !include[position] {
            return self.expand(plan, include, position + 1, working, out);
        }
        for variant in &plan.options[position] {
            working.constituents[position] = variant.clone();
            self.expand(plan, include, position + 1, working, out)?;
        }
        Ok(())
    }

    fn render(&self, clause: &Clause, index: usize) -> GenerationResult<String> {
        render(
            &clause.constituents[index],
            index,
            index == clause.verb,
            self.config.lemmatize(),
        )
    }

    fn proposition(
        &self,
        plan: &Plan,
        include: &[bool],
        clause: &Clause,
    ) -> GenerationResult<Proposition> {
        let mut proposition = Proposition::new();

        if let Some(subject) = clause.subject {
            if include[subject] {
                proposition.push(self.render(clause, subject)?);
            }
        }
        if !include[clause.verb] {
            return Err(GenerationError::MissingVerb { clause: plan.index });
        }
        proposition.push(self.render(clause, clause.verb)?);

        let verb = clause.verb_root();
        let before_verb = |index: usize| match (clause.constituents[index].root(), verb) {
            (Some(root), Some(verb)) => root < verb,
            _ => false,
        };

        let adverbials: BTreeSet<usize> = clause.adverbials.iter().copied().collect();
        let arguments: BTreeSet<usize> = clause
            .indirect_objects
            .iter()
            .chain(&clause.direct_objects)
            .chain(&clause.xcomps)
            .chain(&clause.ccomps)
            .chain(&clause.acomps)
            .chain(&clause.adverbials)
            .chain(clause.complement.as_ref())
            .copied()
            .collect();

        for &index in &arguments {
            if adverbials.contains(&index) && before_verb(index) {
                continue;
            }
            if include[index] {
                proposition.push(self.render(clause, index)?);
            }
        }

        // Leading adverbials go last, marked when they may be dropped.
        for &index in &adverbials {
            if !before_verb(index) {
                break;
            }
            if include[index] {
                proposition.push(self.render(clause, index)?);
                if plan.flags[index] == Flag::Optional {
                    proposition.mark_last_optional();
                }
            }
        }

        if self.config.nary() {
            Ok(proposition)
        } else {
            Ok(proposition.into_triple())
        }
    }
}
