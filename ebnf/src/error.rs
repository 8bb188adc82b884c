use std::error;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a grammar. Any of these aborts construction,
/// no partial grammar is ever produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A right-hand side that can't be tokenized, e.g. an unterminated quote
    /// or an empty factor.
    MalformedRule { rule: String, text: String },
    /// A line in grammar text that isn't of the form `name ::= rhs`.
    MalformedLine { line: usize, text: String },
    /// A nonterminal reference to a rule that was never declared.
    UnknownRule { rule: String, referenced_by: String },
    DuplicateRule(String),
    EmptyGrammar,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedRule { ref rule, ref text } => {
                write!(f, "malformed rule '{}': {}", rule, text)
            }
            Error::MalformedLine { line, ref text } => {
                write!(f, "line {}: expected 'name ::= rhs', got: {}", line, text)
            }
            Error::UnknownRule {
                ref rule,
                ref referenced_by,
            } => write!(
                f,
                "rule '{}' references undefined rule '{}'",
                referenced_by, rule
            ),
            Error::DuplicateRule(ref rule) => write!(f, "rule '{}' declared twice", rule),
            Error::EmptyGrammar => write!(f, "grammar has no rules"),
        }
    }
}

impl error::Error for Error {}
