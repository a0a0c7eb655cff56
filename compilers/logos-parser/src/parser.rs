use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, rest},
    sequence::{preceded, tuple},
    IResult,
};

/// One token row of a CoNLL-X block. FEATS, PHEAD and PDEPREL are read past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub id: u32,
    pub form: &'a str,
    pub lemma: &'a str,
    pub cpostag: &'a str,
    pub postag: &'a str,
    /// 0 for the sentence root.
    pub head: u32,
    pub deprel: &'a str,
}

impl<'a> Row<'a> {
    /// Fine-grained tag, falling back to the coarse one when it is blank.
    pub fn tag(&self) -> &'a str {
        if self.postag == "_" {
            self.cpostag
        } else {
            self.postag
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment(&'a str),
    Row(Row<'a>),
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

/// Columns are tab separated; runs of spaces are accepted too.
fn column(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '\t' || c == ' ')(input)
}

pub fn row(input: &str) -> IResult<&str, Row<'_>> {
    let (input, (id, _, form, _, lemma, _, cpostag, _, postag, _, _feats, _, head, _, deprel)) =
        tuple((
            number, space1, column, space1, column, space1, column, space1, column, space1,
            column, space1, number, space1, column,
        ))(input)?;
    let (input, _) = rest(input)?;

    Ok((
        input,
        Row {
            id,
            form,
            lemma,
            cpostag,
            postag,
            head,
            deprel,
        },
    ))
}

/// Classifies one input line (without its line terminator).
pub fn line(input: &str) -> IResult<&str, Line<'_>> {
    alt((
        map(all_consuming(space0), |_| Line::Blank),
        map(preceded(char('#'), rest), |text: &str| Line::Comment(text.trim())),
        map(row, Line::Row),
    ))(input)
}

/// `id = 12` or `sent_id = 12`, the body of a sentence id comment.
pub fn id_comment(input: &str) -> IResult<&str, u32> {
    preceded(
        tuple((alt((tag("sent_id"), tag("id"))), space0, char('='), space0)),
        number,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_tabs() {
        let (_, parsed) = row("2\tmakes\tmake\tVB\tVBZ\t_\t0\tROOT\t_\t_").unwrap();
        assert_eq!(
            parsed,
            Row {
                id: 2,
                form: "makes",
                lemma: "make",
                cpostag: "VB",
                postag: "VBZ",
                head: 0,
                deprel: "ROOT",
            }
        );
    }

    #[test]
    fn test_row_with_spaces_and_blank_postag() {
        let (_, parsed) = row("1  Bell  Bell  NNP  _  _  2  nsubj").unwrap();
        assert_eq!(parsed.head, 2);
        assert_eq!(parsed.deprel, "nsubj");
        assert_eq!(parsed.tag(), "NNP");
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(line("").unwrap().1, Line::Blank);
        assert_eq!(line("  \t").unwrap().1, Line::Blank);
        assert_eq!(line("# id = 7").unwrap().1, Line::Comment("id = 7"));
        assert!(matches!(line("3\tproducts\tproduct\tNN\tNNS\t_\t2\tdobj").unwrap().1, Line::Row(_)));

        // too few columns, or a head that is not a number
        assert!(line("3\tproducts\tproduct").is_err());
        assert!(line("3\tproducts\tproduct\tNN\tNNS\t_\t_\tdobj").is_err());
    }

    #[test]
    fn test_id_comment() {
        assert_eq!(id_comment("id = 12").unwrap().1, 12);
        assert_eq!(id_comment("sent_id=3").unwrap().1, 3);
        assert!(id_comment("text = Bell makes products").is_err());
    }
}
