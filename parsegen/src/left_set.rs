//! Left (FIRST) sets of productions.
//!
//! The left set of a rule maps every terminal literal or token class that can
//! begin a derivation of the rule to the production that owns it and the
//! alternative to take when it is seen.

use ebnf::{Grammar, Node, EPSILON};
use indexmap::IndexMap;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::sets::{gen_nullable, is_nullable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeftEntry<'g> {
    /// Name of the production the literal appears in.
    pub producer: &'g str,
    /// Whether the literal is a token class rather than literal text.
    pub is_token: bool,
    /// The alternative of the queried node to execute on this literal.
    pub branch: &'g Node,
}

/// Entries keyed by literal, in discovery order.
pub type LeftSet<'g> = IndexMap<&'g str, LeftEntry<'g>>;

pub struct Resolver<'g> {
    grammar: &'g Grammar,
    nullable: BitSet,
}

impl<'g> Resolver<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Resolver {
            grammar,
            nullable: gen_nullable(grammar),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Computes the left set of the named rule.
    ///
    /// Contains the epsilon marker if the rule may derive nothing.
    pub fn left_set(&self, rule: &str) -> Result<LeftSet<'g>> {
        let grammar = self.grammar;
        let index = grammar
            .index_of(rule)
            .ok_or_else(|| Error::UnknownRule(rule.to_owned()))?;
        let prod = grammar
            .get_index(index)
            .ok_or_else(|| Error::UnknownRule(rule.to_owned()))?;

        let mut visited = BitSet::new(grammar.len());
        visited.insert(index);
        Ok(self.resolve(&prod.name, &prod.root, &mut visited))
    }

    /// Computes the left set of a node inside the production `owner`.
    pub fn left_set_of(&self, owner: &'g str, node: &'g Node) -> LeftSet<'g> {
        let mut visited = BitSet::new(self.grammar.len());
        if let Some(index) = self.grammar.index_of(owner) {
            visited.insert(index);
        }
        self.resolve(owner, node, &mut visited)
    }

    pub fn is_nullable(&self, node: &Node) -> bool {
        is_nullable(self.grammar, &self.nullable, node)
    }

    /// Depth first resolution. `visited` holds every production entered so
    /// far, a production is never entered twice.
    fn resolve(&self, owner: &'g str, node: &'g Node, visited: &mut BitSet) -> LeftSet<'g> {
        let mut set = LeftSet::new();
        match node {
            Node::Terminal(text) => {
                set.insert(
                    text,
                    LeftEntry {
                        producer: owner,
                        is_token: false,
                        branch: node,
                    },
                );
            }
            Node::Token(class) => {
                set.insert(
                    class,
                    LeftEntry {
                        producer: owner,
                        is_token: true,
                        branch: node,
                    },
                );
            }
            Node::Nonterminal(name) => {
                let grammar = self.grammar;
                if let Some(index) = grammar.index_of(name) {
                    if let Some(prod) = grammar.get_index(index) {
                        if visited.insert(index) {
                            set = self.resolve(&prod.name, &prod.root, visited);
                            for entry in set.values_mut() {
                                entry.branch = node;
                            }
                        }
                    }
                }
            }
            Node::Term(factors) => {
                for factor in factors {
                    for (literal, entry) in self.resolve(owner, factor, visited) {
                        if literal != EPSILON {
                            set.entry(literal).or_insert(entry);
                        }
                    }
                    if !self.is_nullable(factor) {
                        return set;
                    }
                }
                set.entry(EPSILON).or_insert(LeftEntry {
                    producer: owner,
                    is_token: false,
                    branch: node,
                });
            }
            Node::Or(alternatives) => {
                for alternative in alternatives {
                    let other = self.resolve(owner, alternative, visited);
                    merge(&mut set, other, alternative);
                    // A rule already entered through an earlier sibling
                    // contributes nothing, so nullability comes from the
                    // fixpoint.
                    if self.is_nullable(alternative) {
                        set.entry(EPSILON).or_insert(LeftEntry {
                            producer: owner,
                            is_token: false,
                            branch: alternative,
                        });
                    }
                }
            }
            Node::Optional(inner) => {
                let other = self.resolve(owner, inner, visited);
                merge(&mut set, other, inner);
                set.entry(EPSILON).or_insert(LeftEntry {
                    producer: owner,
                    is_token: false,
                    branch: node,
                });
            }
        }
        set
    }
}

/// Adds entries missing from `set`, all dispatching to `branch`.
fn merge<'g>(set: &mut LeftSet<'g>, other: LeftSet<'g>, branch: &'g Node) {
    for (literal, mut entry) in other {
        entry.branch = branch;
        set.entry(literal).or_insert(entry);
    }
}
