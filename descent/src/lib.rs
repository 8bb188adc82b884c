//! Generates recursive descent parsers from EBNF grammars.
//!
//! ```text
//! json ::= object | array
//! object ::= "{" pairs "}"
//! ...
//! ```
//!
//! Each rule becomes one routine of the generated program, which reads its
//! tokens from an external lexer and aborts on the first mismatch.

use anyhow::{anyhow, Context, Result};
use std::fmt::{self, Display};
use std::str::FromStr;

pub use ebnf::Grammar;
pub use parsegen::Options;

use parsegen::backend::{Python, Rust};

/// Language of the generated parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Python,
    Rust,
}

impl Target {
    /// File extension of generated sources.
    pub fn extension(self) -> &'static str {
        match self {
            Target::Python => "py",
            Target::Rust => "rs",
        }
    }
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Target::Python),
            "rust" | "rs" => Ok(Target::Rust),
            _ => Err(anyhow!("unknown target language: {}", s)),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Python => write!(f, "python"),
            Target::Rust => write!(f, "rust"),
        }
    }
}

/// Generates a parser for grammar text, one `name ::= rhs` rule per line,
/// using the default lexer interface.
pub fn generate(source: &str, target: Target) -> Result<String> {
    let grammar: Grammar = source.parse().context("invalid grammar")?;
    generate_with(&grammar, target, &Options::default())
}

pub fn generate_with(grammar: &Grammar, target: Target, options: &Options) -> Result<String> {
    let program = parsegen::synthesize(grammar, options)
        .with_context(|| format!("failed to synthesize {} parser", target))?;
    let source = match target {
        Target::Python => parsegen::render(&program, &mut Python::new()),
        Target::Rust => parsegen::render(&program, &mut Rust::new()),
    };
    Ok(source)
}
