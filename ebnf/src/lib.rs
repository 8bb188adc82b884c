//! Grammar model and rule parser.
//!
//! A grammar is an ordered set of productions, each mapping a rule name to a
//! tree of [`Node`]s parsed from an EBNF-like right-hand side:
//!
//! ```text
//! E ::= T R
//! R ::= "+" T R | "¬"
//! ASSIGN ::= <IDENTIFIER> "=" <DIGIT>
//! ```
//!
//! `"..."` is a literal terminal, `<...>` a token class produced by the lexer,
//! bare words reference other rules and `¬` is the epsilon marker.

use indexmap::IndexMap;
use std::fmt::{self, Display};
use std::ops::BitOr;
use std::str::FromStr;

mod error;
mod parser;

pub use error::{Error, Result};

/// Literal denoting an alternative that matches nothing.
pub const EPSILON: &str = "¬";

/// A node in the tree of a production's right-hand side.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Node {
    /// A literal the input must match exactly.
    Terminal(String),
    /// A token matched by its lexer class.
    Token(String),
    /// A reference to another production.
    Nonterminal(String),
    /// A fixed sequence. Always has more than one child.
    Term(Vec<Node>),
    /// Mutually exclusive alternatives, in declared order.
    Or(Vec<Node>),
    /// A factor that may be absent.
    Optional(Box<Node>),
}

impl Node {
    pub fn terminal(s: impl Into<String>) -> Node {
        Node::Terminal(s.into())
    }

    pub fn token(class: impl Into<String>) -> Node {
        Node::Token(class.into())
    }

    pub fn nonterminal(rule: impl Into<String>) -> Node {
        Node::Nonterminal(rule.into())
    }

    pub fn epsilon() -> Node {
        Node::Terminal(EPSILON.to_owned())
    }

    pub fn optional(node: Node) -> Node {
        Node::Optional(Box::new(node))
    }

    /// Builds a sequence. A single factor is returned unwrapped, and nested
    /// sequences are spliced into this one.
    pub fn seq(nodes: Vec<Node>) -> Node {
        let mut factors = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Term(mut inner) => factors.append(&mut inner),
                node => factors.push(node),
            }
        }
        if factors.len() == 1 {
            factors.remove(0)
        } else {
            Node::Term(factors)
        }
    }

    /// Builds an alternation. A single alternative is returned unwrapped, and
    /// nested alternations are spliced into this one.
    pub fn alternation(nodes: Vec<Node>) -> Node {
        let mut alternatives = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Or(mut inner) => alternatives.append(&mut inner),
                node => alternatives.push(node),
            }
        }
        if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            Node::Or(alternatives)
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Node::Terminal(s) if s == EPSILON)
    }

    /// Returns whether a nonterminal appears anywhere below this node.
    pub fn contains_nonterminal(&self) -> bool {
        match self {
            Node::Nonterminal(_) => true,
            Node::Terminal(_) | Node::Token(_) => false,
            Node::Term(nodes) | Node::Or(nodes) => nodes.iter().any(Node::contains_nonterminal),
            Node::Optional(node) => node.contains_nonterminal(),
        }
    }

    /// The factors this node matches in order. Anything but a sequence is a
    /// sequence of one.
    pub fn factors(&self) -> &[Node] {
        match self {
            Node::Term(nodes) => nodes,
            node => std::slice::from_ref(node),
        }
    }

    /// The alternatives of an alternation. Anything else is its own single
    /// alternative.
    pub fn alternatives(&self) -> &[Node] {
        match self {
            Node::Or(nodes) => nodes,
            node => std::slice::from_ref(node),
        }
    }

    /// Calls `f` with every rule name referenced below this node.
    pub fn for_each_nonterminal<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Node::Nonterminal(name) => f(name),
            Node::Terminal(_) | Node::Token(_) => (),
            Node::Term(nodes) | Node::Or(nodes) => {
                for node in nodes {
                    node.for_each_nonterminal(f);
                }
            }
            Node::Optional(node) => node.for_each_nonterminal(f),
        }
    }

    fn fmt_grouped(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Term(_) | Node::Or(_) | Node::Optional(_) => write!(f, "( {} )", self),
            node => write!(f, "{}", node),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Terminal(s) => write!(f, "\"{}\"", s),
            Node::Token(class) => write!(f, "<{}>", class),
            Node::Nonterminal(name) => write!(f, "{}", name),
            Node::Term(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match node {
                        Node::Or(_) => node.fmt_grouped(f)?,
                        node => write!(f, "{}", node)?,
                    }
                }
                Ok(())
            }
            Node::Or(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    match node {
                        Node::Or(_) => node.fmt_grouped(f)?,
                        node => write!(f, "{}", node)?,
                    }
                }
                Ok(())
            }
            Node::Optional(node) => {
                node.fmt_grouped(f)?;
                write!(f, " ?")
            }
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::nonterminal(s)
    }
}

impl BitOr for Node {
    type Output = Node;

    fn bitor(self, rhs: Node) -> Node {
        Node::alternation(vec![self, rhs])
    }
}

/// A named production rule.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Production {
    pub name: String,
    pub root: Node,
}

impl Production {
    pub fn new(name: impl Into<String>, root: Node) -> Self {
        Production {
            name: name.into(),
            root,
        }
    }

    /// Parses a right-hand side for the named rule.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        match parser::rhs(text) {
            Ok((_, root)) => Ok(Production { name, root }),
            Err(_) => Err(Error::MalformedRule {
                rule: name,
                text: text.to_owned(),
            }),
        }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ::= {}", self.name, self.root)
    }
}

/// A set of productions. The first declared production is the start rule.
///
/// Every nonterminal referenced from any production is guaranteed to name a
/// production of the same grammar.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Grammar {
    productions: IndexMap<String, Production>,
    /// Right-hand side text as written, for diagnostics.
    source: IndexMap<String, String>,
}

impl Grammar {
    /// Builds a grammar from already constructed productions.
    pub fn new(productions: Vec<Production>) -> Result<Self> {
        let entries = productions
            .into_iter()
            .map(|prod| {
                let text = prod.root.to_string();
                (prod, text)
            })
            .collect();
        Self::build(entries)
    }

    /// Parses each `(name, rhs)` pair into a production, in order.
    pub fn from_rules<I, N, R>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (name, text) in rules {
            let text = text.as_ref().trim();
            entries.push((Production::parse(name, text)?, text.to_owned()));
        }
        Self::build(entries)
    }

    fn build(entries: Vec<(Production, String)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyGrammar);
        }

        let mut productions = IndexMap::with_capacity(entries.len());
        let mut source = IndexMap::with_capacity(entries.len());
        for (prod, text) in entries {
            if productions.contains_key(&prod.name) {
                return Err(Error::DuplicateRule(prod.name));
            }
            source.insert(prod.name.clone(), text);
            productions.insert(prod.name.clone(), prod);
        }

        for prod in productions.values() {
            let mut missing = None;
            prod.root.for_each_nonterminal(&mut |name| {
                if missing.is_none() && !productions.contains_key(name) {
                    missing = Some(name.to_owned());
                }
            });
            if let Some(rule) = missing {
                return Err(Error::UnknownRule {
                    rule,
                    referenced_by: prod.name.clone(),
                });
            }
        }

        Ok(Grammar {
            productions,
            source,
        })
    }

    pub fn start(&self) -> &Production {
        // Construction rejects empty grammars.
        &self.productions[0]
    }

    pub fn production(&self, name: &str) -> Option<&Production> {
        self.productions.get(name)
    }

    /// Position of the named production in declaration order. This is the
    /// production's identity for traversals.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.productions.get_index_of(name)
    }

    pub fn get_index(&self, index: usize) -> Option<&Production> {
        self.productions.get_index(index).map(|(_, prod)| prod)
    }

    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// The right-hand side text the named production was built from.
    pub fn source(&self, name: &str) -> Option<&str> {
        self.source.get(name).map(String::as_str)
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for prod in self.productions.values() {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    /// Parses one `name ::= rhs` rule per line. Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for (i, line) in s.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parser::rule_line(line) {
                Ok((_, (name, text))) => rules.push((name, text)),
                Err(_) => {
                    return Err(Error::MalformedLine {
                        line: i + 1,
                        text: line.to_owned(),
                    })
                }
            }
        }
        Self::from_rules(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXPRESSIONS: &str = r##"
E ::= T R
R ::= "+" T R | "#"
T ::= F Y
Y ::= "*" F Y | "#"
F ::= "(" E ")" | "i"
"##;

    #[test]
    fn parse_grammar() {
        let g: Grammar = EXPRESSIONS.parse().unwrap();
        assert_eq!(g.len(), 5);
        assert_eq!(g.start().name, "E");
        assert_eq!(g.index_of("Y"), Some(3));
        assert_eq!(g.source("R"), Some("\"+\" T R | \"#\""));
        assert_eq!(
            g.production("F").unwrap().root,
            Node::Or(vec![
                Node::seq(vec![Node::terminal("("), "E".into(), Node::terminal(")")]),
                Node::terminal("i"),
            ])
        );
    }

    #[test]
    fn builders_flatten() {
        let a = Node::terminal("a") | Node::terminal("b");
        let b = Node::nonterminal("c") | a;
        assert_eq!(
            b,
            Node::Or(vec![
                Node::nonterminal("c"),
                Node::terminal("a"),
                Node::terminal("b"),
            ])
        );

        let s = Node::seq(vec![
            Node::seq(vec!["x".into(), "y".into()]),
            Node::terminal("z"),
        ]);
        assert_eq!(s.factors().len(), 3);
        assert_eq!(Node::seq(vec!["x".into()]), Node::nonterminal("x"));
    }

    #[test]
    fn lossless_grammar() {
        let g = Grammar::new(vec![
            Production::new(
                "list",
                Node::seq(vec![
                    Node::terminal("["),
                    Node::optional(Node::seq(vec!["item".into(), "rest".into()])),
                    Node::terminal("]"),
                ]),
            ),
            Production::new(
                "rest",
                Node::seq(vec![Node::terminal(","), "item".into(), "rest".into()]) | Node::epsilon(),
            ),
            Production::new(
                "item",
                Node::token("NUMBER")
                    | Node::seq(vec![
                        Node::terminal("-"),
                        Node::terminal("a") | Node::terminal("b"),
                    ])
                    | "list".into(),
            ),
        ])
        .unwrap();

        let reparsed: Grammar = g.to_string().parse().unwrap();
        assert_eq!(g, reparsed, "To string:\n{}\n", g);
    }

    #[test]
    fn malformed_rule() {
        let err = Grammar::from_rules(vec![("A", "\"a"), ("B", "\"b\"")]).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedRule {
                rule: "A".to_owned(),
                text: "\"a".to_owned(),
            }
        );
    }

    #[test]
    fn malformed_line() {
        let err = "A ::= \"a\"\n\nB = \"b\"".parse::<Grammar>().unwrap_err();
        assert_eq!(
            err,
            Error::MalformedLine {
                line: 3,
                text: "B = \"b\"".to_owned(),
            }
        );
    }

    #[test]
    fn unknown_rule() {
        let err = "A ::= B \"a\"\nB ::= C".parse::<Grammar>().unwrap_err();
        assert_eq!(
            err,
            Error::UnknownRule {
                rule: "C".to_owned(),
                referenced_by: "B".to_owned(),
            }
        );
    }

    #[test]
    fn duplicate_and_empty() {
        let err = "A ::= \"a\"\nA ::= \"b\"".parse::<Grammar>().unwrap_err();
        assert_eq!(err, Error::DuplicateRule("A".to_owned()));

        let err = "\n  \n".parse::<Grammar>().unwrap_err();
        assert_eq!(err, Error::EmptyGrammar);
    }

    #[test]
    fn node_queries() {
        let g: Grammar = EXPRESSIONS.parse().unwrap();
        let r = &g.production("R").unwrap().root;
        assert!(r.contains_nonterminal());
        assert!(!g.production("F").unwrap().root.factors()[0].is_epsilon());
        assert!(Node::epsilon().is_epsilon());

        let mut refs = Vec::new();
        r.for_each_nonterminal(&mut |name| refs.push(name));
        assert_eq!(refs, vec!["T", "R"]);
    }
}
