use std::collections::BTreeSet;
use std::fmt;

/// An ordered tuple of text fields: subject, relation, then arguments.
///
/// Clauses generated without a subject start at the relation; the accessors
/// still read position 0 as the subject, so callers that care check
/// [`Proposition::arity`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proposition {
    fields: Vec<String>,
    optional: BTreeSet<usize>,
}

impl Proposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            optional: BTreeSet::new(),
        }
    }

    pub(crate) fn push(&mut self, field: String) {
        self.fields.push(field);
    }

    pub(crate) fn mark_last_optional(&mut self) {
        if let Some(last) = self.fields.len().checked_sub(1) {
            self.optional.insert(last);
        }
    }

    /// Folds everything past the relation into one argument and drops
    /// the optional markers.
    pub(crate) fn into_triple(mut self) -> Self {
        self.optional.clear();
        if self.fields.len() > 3 {
            let tail = self.fields.split_off(2).join(" ");
            self.fields.push(tail);
        }
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn subject(&self) -> Option<&str> {
        self.field(0)
    }

    pub fn relation(&self) -> Option<&str> {
        self.field(1)
    }

    /// The `index`-th argument after subject and relation.
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.field(index + 2)
    }

    pub fn argument_count(&self) -> usize {
        self.fields.len().saturating_sub(2)
    }

    pub fn is_optional(&self, index: usize) -> bool {
        self.optional.contains(&index)
    }

    pub fn is_optional_argument(&self, index: usize) -> bool {
        self.is_optional(index + 2)
    }

    pub fn optional(&self) -> &BTreeSet<usize> {
        &self.optional
    }
}

impl fmt::Display for Proposition {
    /// `("Bell", "makes", "products")`, optional fields followed by `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{}\"", field)?;
            if self.is_optional(index) {
                f.write_str("?")?;
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut proposition = Proposition::from_fields(["Bell", "slept", "yesterday"]);
        proposition.mark_last_optional();

        assert_eq!(proposition.subject(), Some("Bell"));
        assert_eq!(proposition.relation(), Some("slept"));
        assert_eq!(proposition.argument(0), Some("yesterday"));
        assert_eq!(proposition.argument(1), None);
        assert_eq!(proposition.argument_count(), 1);
        assert!(proposition.is_optional_argument(0));
        assert!(!proposition.is_optional(0));
        assert_eq!(proposition.to_string(), "(\"Bell\", \"slept\", \"yesterday\"?)");
    }

    #[test]
    fn test_into_triple_folds_arguments() {
        let mut proposition = Proposition::from_fields(["He", "gave", "her", "a book"]);
        proposition.mark_last_optional();

        let triple = proposition.into_triple();
        assert_eq!(triple.fields(), ["He", "gave", "her a book"]);
        assert!(triple.optional().is_empty());

        // already short enough
        let pair = Proposition::from_fields(["Profits", "rose"]).into_triple();
        assert_eq!(pair.arity(), 2);
        assert_eq!(pair.argument_count(), 0);
    }
}
