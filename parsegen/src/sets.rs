use ebnf::{Grammar, Node};

use crate::bitset::BitSet;

/// Computes which productions can derive the empty string, indexed by
/// declaration order.
pub(crate) fn gen_nullable(grammar: &Grammar) -> BitSet {
    let mut nullable = BitSet::new(grammar.len());

    loop {
        let mut changed = false;
        for (i, prod) in grammar.productions().enumerate() {
            if !nullable.contains(i) && is_nullable(grammar, &nullable, &prod.root) {
                nullable.insert(i);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    nullable
}

pub(crate) fn is_nullable(grammar: &Grammar, nullable: &BitSet, node: &Node) -> bool {
    match node {
        Node::Terminal(_) => node.is_epsilon(),
        Node::Token(_) => false,
        Node::Nonterminal(name) => grammar
            .index_of(name)
            .map_or(false, |i| nullable.contains(i)),
        Node::Term(nodes) => nodes.iter().all(|n| is_nullable(grammar, nullable, n)),
        Node::Or(nodes) => nodes.iter().any(|n| is_nullable(grammar, nullable, n)),
        Node::Optional(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_nullable() {
        let g: Grammar = r#"
            Z ::= "d" | X Y Z
            Y ::= "¬" | "c"
            X ::= Y | "a"
        "#
        .parse()
        .unwrap();
        let nullable = gen_nullable(&g);
        assert_eq!(nullable.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn nullable_through_sequences() {
        let g: Grammar = r#"
            program ::= opts tail
            opts ::= "-"? <FLAG>?
            tail ::= rest | "x"
            rest ::= tail "y"
        "#
        .parse()
        .unwrap();
        let nullable = gen_nullable(&g);
        assert!(nullable.contains(1));
        assert!(!nullable.contains(0));
        assert!(!nullable.contains(2));
        assert!(!nullable.contains(3));
    }
}
