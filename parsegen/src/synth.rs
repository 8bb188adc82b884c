//! Recursive descent synthesis.
//!
//! Every production becomes one routine. Alternations dispatch on their left
//! set, consuming the current token up front only when every alternative
//! starts by matching it.

use ebnf::{Grammar, Node, Production, EPSILON};
use indexmap::IndexMap;

use crate::backend::canonical;
use crate::bootstrap::{self, GET_TOKEN, PEEK};
use crate::error::{Error, Result};
use crate::left_set::{LeftEntry, LeftSet, Resolver};
use crate::options::Options;
use crate::program::{Expr, Field, Item, Program, Routine, RoutineKind, Stmt, Type};

/// Builds the complete parsing program for a grammar.
pub fn synthesize(grammar: &Grammar, options: &Options) -> Result<Program> {
    Synthesizer::new(grammar, options).program()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fetch {
    Peek,
    Get,
}

pub struct Synthesizer<'g> {
    grammar: &'g Grammar,
    resolver: Resolver<'g>,
    options: &'g Options,
}

impl<'g> Synthesizer<'g> {
    pub fn new(grammar: &'g Grammar, options: &'g Options) -> Self {
        Synthesizer {
            grammar,
            resolver: Resolver::new(grammar),
            options,
        }
    }

    pub fn program(&self) -> Result<Program> {
        let mut routines: IndexMap<String, &str> = IndexMap::new();
        for prod in self.grammar.productions() {
            self.check_name(&prod.name)?;
            if let Some(first) = routines.insert(canonical(&prod.name), &prod.name) {
                return Err(Error::NameCollision(first.to_owned(), prod.name.clone()));
            }
        }

        let mut items = bootstrap::prelude(self.options);
        for prod in self.grammar.productions() {
            items.push(Item::Routine(self.rule(prod)?));
        }
        items.push(bootstrap::parse(&self.grammar.start().name));
        items.push(bootstrap::main(self.options));
        Ok(Program { items })
    }

    /// Synthesizes the routine for a single production.
    pub fn rule(&self, prod: &'g Production) -> Result<Routine> {
        self.check_name(&prod.name)?;

        let source = match self.grammar.source(&prod.name) {
            Some(text) => text.to_owned(),
            None => prod.root.to_string(),
        };
        let mut body = vec![Stmt::Comment(format!("{} ::= {}", prod.name, source))];

        let stmts = match prod.root {
            Node::Or(_) | Node::Optional(_) => {
                let set = self.resolver.left_set(&prod.name)?;
                self.alternation(&prod.name, &prod.root, set)?
            }
            _ => self.sequence(&prod.name, prod.root.factors())?,
        };

        let token_var = &self.options.token_var;
        if stmts.iter().any(|s| s.assigns(token_var)) {
            body.push(Stmt::Declare {
                name: token_var.clone(),
                ty: Type::Token,
            });
        }
        body.extend(stmts);

        Ok(Routine {
            name: prod.name.clone(),
            kind: RoutineKind::Rule,
            params: Vec::new(),
            returns: None,
            body,
        })
    }

    /// Rejects rule names that render like a bootstrap routine or variable.
    fn check_name(&self, rule: &str) -> Result<()> {
        let name = canonical(rule);
        let token_var = canonical(&self.options.token_var);
        if bootstrap::RESERVED.contains(&name.as_str()) || name == token_var {
            return Err(Error::ReservedName(rule.to_owned()));
        }
        Ok(())
    }

    /// Matches each factor in turn, aborting on the first mismatch.
    fn sequence(&self, owner: &'g str, factors: &'g [Node]) -> Result<Vec<Stmt>> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < factors.len() {
            let factor = &factors[i];
            i += 1;
            match factor {
                node if node.is_epsilon() => (),
                Node::Terminal(literal) | Node::Token(literal) => {
                    let is_token = matches!(factor, Node::Token(_));
                    out.push(self.fetch(Fetch::Get));

                    // Rules directly following the match are called from its
                    // success branch.
                    let mut matched = Vec::new();
                    while let Some(Node::Nonterminal(name)) = factors.get(i) {
                        matched.push(self.call(name)?);
                        i += 1;
                    }
                    out.push(Stmt::If {
                        arms: vec![(self.matches(literal, is_token), matched)],
                        otherwise: Some(vec![self.expect(literal)]),
                    });
                }
                Node::Nonterminal(name) => out.push(self.call(name)?),
                Node::Or(_) | Node::Optional(_) => {
                    let set = self.resolver.left_set_of(owner, factor);
                    out.extend(self.alternation(owner, factor, set)?);
                }
                Node::Term(nodes) => out.extend(self.sequence(owner, nodes)?),
            }
        }
        Ok(out)
    }

    /// Dispatches on the current token to the alternative its left set
    /// entry names.
    fn alternation(&self, owner: &'g str, node: &'g Node, set: LeftSet<'g>) -> Result<Vec<Stmt>> {
        let has_epsilon = set.contains_key(EPSILON);
        let fetch = if has_epsilon
            || node.contains_nonterminal()
            || !node.alternatives().iter().all(starts_with_leaf)
        {
            Fetch::Peek
        } else {
            Fetch::Get
        };

        let mut arms = Vec::new();
        let mut expected = Vec::new();
        for (literal, entry) in &set {
            if *literal == EPSILON {
                continue;
            }
            let body = self.branch(owner, literal, entry, fetch)?;
            arms.push((self.matches(literal, entry.is_token), body));
            expected.push(*literal);
        }

        if arms.is_empty() {
            // Nothing can start this node, so only its absence is valid.
            if has_epsilon {
                return Ok(Vec::new());
            }
            return Ok(vec![self.fetch(fetch), self.expect("")]);
        }

        let otherwise = if has_epsilon {
            None
        } else {
            Some(vec![self.expect(&expected.join(","))])
        };
        Ok(vec![self.fetch(fetch), Stmt::If { arms, otherwise }])
    }

    /// The statements run once `literal` selected `entry`.
    fn branch(
        &self,
        owner: &'g str,
        literal: &str,
        entry: &LeftEntry<'g>,
        fetch: Fetch,
    ) -> Result<Vec<Stmt>> {
        let factors = leading_factors(entry.branch);
        let starts_with_literal = match factors.first() {
            Some(Node::Terminal(text)) => !entry.is_token && text == literal,
            Some(Node::Token(class)) => entry.is_token && class == literal,
            _ => false,
        };
        if !starts_with_literal {
            return self.sequence(owner, factors);
        }

        let mut body = Vec::new();
        if fetch == Fetch::Peek {
            body.push(Stmt::call(GET_TOKEN));
        }
        body.extend(self.sequence(owner, &factors[1..])?);
        Ok(body)
    }

    fn fetch(&self, fetch: Fetch) -> Stmt {
        let routine = match fetch {
            Fetch::Peek => PEEK,
            Fetch::Get => GET_TOKEN,
        };
        Stmt::Assign {
            name: self.options.token_var.clone(),
            value: Expr::call(routine, Vec::new()),
        }
    }

    fn matches(&self, literal: &str, is_token: bool) -> Expr {
        let field = if is_token { Field::Class } else { Field::Literal };
        self.token().field(field).equals(Expr::str(literal))
    }

    fn expect(&self, expected: &str) -> Stmt {
        Stmt::Expect {
            position: self.token().field(Field::Position),
            expected: expected.to_owned(),
        }
    }

    fn call(&self, rule: &str) -> Result<Stmt> {
        if self.grammar.production(rule).is_none() {
            return Err(Error::UnknownRule(rule.to_owned()));
        }
        Ok(Stmt::call(rule))
    }

    fn token(&self) -> Expr {
        Expr::var(&self.options.token_var)
    }
}

/// The factors of `node` past any leading epsilon markers.
fn leading_factors(node: &Node) -> &[Node] {
    let factors = node.factors();
    let skip = factors.iter().take_while(|f| f.is_epsilon()).count();
    &factors[skip..]
}

fn starts_with_leaf(node: &Node) -> bool {
    match leading_factors(node).first() {
        Some(Node::Terminal(_)) | Some(Node::Token(_)) => true,
        _ => false,
    }
}
