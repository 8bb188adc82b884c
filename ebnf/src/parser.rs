use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt, rest, verify},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair},
    IResult,
};

use crate::{Node, EPSILON};

/// Characters that delimit factors and so can never appear in a bare word.
const RESERVED: &str = "|()\"<>?+*";

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !RESERVED.contains(c)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

/// A quoted literal, `"..."`. Quotes are stripped and the literal may not be
/// empty.
pub fn terminal(input: &str) -> IResult<&str, Node> {
    let (rem, matched) = verify(
        delimited(char('"'), take_until("\""), char('"')),
        |s: &str| !s.is_empty(),
    )(input)?;
    Ok((rem, Node::terminal(matched)))
}

/// A lexer token class reference, `<CLASS>`.
pub fn token(input: &str) -> IResult<&str, Node> {
    let (rem, matched) = delimited(char('<'), word, char('>'))(input)?;
    Ok((rem, Node::token(matched)))
}

/// A bare word names another rule, except for the epsilon marker.
pub fn nonterminal(input: &str) -> IResult<&str, Node> {
    let (rem, matched) = word(input)?;
    if matched == EPSILON {
        Ok((rem, Node::epsilon()))
    } else {
        Ok((rem, Node::nonterminal(matched)))
    }
}

fn group(input: &str) -> IResult<&str, Node> {
    delimited(
        pair(char('('), multispace0),
        expression,
        pair(multispace0, char(')')),
    )(input)
}

fn factor(input: &str) -> IResult<&str, Node> {
    let (rem, (atom, suffix)) = pair(
        alt((terminal, token, group, nonterminal)),
        opt(preceded(multispace0, char('?'))),
    )(input)?;
    match suffix {
        Some(_) => Ok((rem, Node::optional(atom))),
        None => Ok((rem, atom)),
    }
}

/// `term := factor+`
pub fn term(input: &str) -> IResult<&str, Node> {
    map(many1(preceded(multispace0, factor)), Node::seq)(input)
}

/// `expression := term ('|' term)*`
pub fn expression(input: &str) -> IResult<&str, Node> {
    map(
        separated_list1(delimited(multispace0, char('|'), multispace0), term),
        Node::alternation,
    )(input)
}

/// Parses a complete right-hand side. Trailing input is an error.
pub fn rhs(input: &str) -> IResult<&str, Node> {
    all_consuming(delimited(multispace0, expression, multispace0))(input)
}

/// Splits a `name ::= rhs` line into the rule name and its unparsed rhs.
pub fn rule_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (rem, (name, text)) = separated_pair(
        preceded(multispace0, word),
        delimited(multispace0, tag("::="), multispace0),
        rest,
    )(input)?;
    Ok((rem, (name, text.trim_end())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt::Debug;

    struct TestCase<T> {
        input: &'static str,
        // Some is the expected node, None indicates error.
        out: Option<T>,
    }

    fn assert_test_cases<T, F>(f: F, tests: Vec<TestCase<T>>)
    where
        T: Debug + Eq,
        F: Fn(&'static str) -> IResult<&'static str, T>,
    {
        for t in tests {
            let res = f(t.input);
            match t.out {
                Some(out) => assert_eq!(res.map(|(_, v)| v), Ok(out), "input: {}", t.input),
                None => assert!(res.is_err(), "expected error for {:?}: {:?}", t.input, res),
            }
        }
    }

    fn t(s: &str) -> Node {
        Node::terminal(s)
    }

    fn n(s: &str) -> Node {
        Node::nonterminal(s)
    }

    #[test]
    fn parse_factors() {
        let tests = vec![
            TestCase {
                input: "\"hello\"",
                out: Some(t("hello")),
            },
            TestCase {
                input: "<IDENTIFIER>",
                out: Some(Node::token("IDENTIFIER")),
            },
            TestCase {
                input: "noun-phrase",
                out: Some(n("noun-phrase")),
            },
            TestCase {
                input: "\"¬\"",
                out: Some(Node::epsilon()),
            },
            TestCase {
                input: "¬",
                out: Some(Node::epsilon()),
            },
        ];

        assert_test_cases(rhs, tests);
    }

    #[test]
    fn parse_sequences_and_alternation() {
        let tests = vec![
            TestCase {
                input: "T R",
                out: Some(Node::Term(vec![n("T"), n("R")])),
            },
            TestCase {
                input: "\"+\" T R | \"#\"",
                out: Some(Node::Or(vec![
                    Node::Term(vec![t("+"), n("T"), n("R")]),
                    t("#"),
                ])),
            },
            TestCase {
                input: "<IDENTIFIER> \"=\" <DIGIT>",
                out: Some(Node::Term(vec![
                    Node::token("IDENTIFIER"),
                    t("="),
                    Node::token("DIGIT"),
                ])),
            },
            TestCase {
                input: "  a   |b|  c ",
                out: Some(Node::Or(vec![n("a"), n("b"), n("c")])),
            },
        ];

        assert_test_cases(rhs, tests);
    }

    #[test]
    fn parse_groups_and_optionals() {
        let tests = vec![
            // A group that is a whole alternative is spliced into the parent.
            TestCase {
                input: "( B | C ) | \"a\"",
                out: Some(Node::Or(vec![n("B"), n("C"), t("a")])),
            },
            // Sequences in a group are spliced into the enclosing sequence.
            TestCase {
                input: "\"x\" ( a b ) \"y\"",
                out: Some(Node::Term(vec![t("x"), n("a"), n("b"), t("y")])),
            },
            TestCase {
                input: "\"x\" ( a | b ) \"y\"",
                out: Some(Node::Term(vec![
                    t("x"),
                    Node::Or(vec![n("a"), n("b")]),
                    t("y"),
                ])),
            },
            TestCase {
                input: "\"-\"? operand",
                out: Some(Node::Term(vec![Node::optional(t("-")), n("operand")])),
            },
            TestCase {
                input: "( \",\" item ) ?",
                out: Some(Node::optional(Node::Term(vec![t(","), n("item")]))),
            },
        ];

        assert_test_cases(rhs, tests);
    }

    #[test]
    fn parse_malformed() {
        let tests: Vec<TestCase<Node>> = vec![
            TestCase {
                input: "\"unterminated",
                out: None,
            },
            TestCase {
                input: "<UNTERMINATED",
                out: None,
            },
            TestCase {
                input: "\"\"",
                out: None,
            },
            TestCase {
                input: "<>",
                out: None,
            },
            TestCase {
                input: "",
                out: None,
            },
            TestCase {
                input: "a | | b",
                out: None,
            },
            TestCase {
                input: "( a b",
                out: None,
            },
            TestCase {
                input: "a +",
                out: None,
            },
        ];

        assert_test_cases(rhs, tests);
    }

    #[test]
    fn parse_rule_line() {
        assert_eq!(
            rule_line("E ::= T R  ").map(|(_, v)| v),
            Ok(("E", "T R"))
        );
        assert_eq!(
            rule_line("  F ::=\"(\" E \")\" | \"i\"").map(|(_, v)| v),
            Ok(("F", "\"(\" E \")\" | \"i\""))
        );
        assert!(rule_line("E = T R").is_err());
    }
}
