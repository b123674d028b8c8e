use serde::Serialize;

use super::{Grammar, LL1ParsingTable, END_MARK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub symbol: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            children: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Leaves left to right.
    pub fn leaves(&self) -> Vec<&str> {
        if self.children.is_empty() {
            return vec![self.symbol.as_str()];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
}

struct TreeBuilder<'a> {
    grammar: &'a Grammar,
    table: &'a LL1ParsingTable,
    input: Vec<&'a str>,
    cursor: usize,
    budget: usize,
}

impl TreeBuilder<'_> {
    fn current(&self) -> &str {
        self.input.get(self.cursor).copied().unwrap_or(END_MARK)
    }

    fn expand(&mut self, symbol: &str) -> TreeNode {
        let mut node = TreeNode::leaf(symbol);
        self.budget = self.budget.saturating_sub(1);

        if !self.grammar.is_non_terminal(symbol) {
            if symbol == self.current() {
                self.cursor += 1;
            }
            return node;
        }

        let table = self.table;
        let production = match table.get(symbol, self.current()) {
            Some(production) if self.budget > 0 => production,
            _ => return node,
        };
        for s in production {
            if self.grammar.is_empty_symbol(s) {
                node.children.push(TreeNode::leaf(s));
            } else {
                node.children.push(self.expand(s));
            }
        }
        node
    }
}

impl Grammar {
    /// Derivation tree for `tokens`, choosing productions the same way `simulate` does.
    ///
    /// A nonterminal with no table entry for the current token stays childless, and so
    /// does every nonterminal reached after `node_limit` nodes have been created.
    pub fn derivation_tree<S: AsRef<str>>(
        &self,
        table: &LL1ParsingTable,
        tokens: &[S],
        start: &str,
        node_limit: usize,
    ) -> TreeNode {
        let mut builder = TreeBuilder {
            grammar: self,
            table,
            input: tokens.iter().map(|t| t.as_ref()).collect(),
            cursor: 0,
            budget: node_limit,
        };
        let tree = builder.expand(start);
        log::debug!(
            "derivation tree with {} nodes consumed {} of {} tokens",
            tree.size(),
            builder.cursor,
            tokens.len()
        );
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::AnalyzerConfig;
    use pretty_assertions::assert_eq;

    fn setup(grammar: &str, config: &AnalyzerConfig) -> (Grammar, LL1ParsingTable) {
        let g = Grammar::parse_with(grammar, config).unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let table = g.ll1_parsing_table(&first, &follow);
        (g, table)
    }

    fn node(symbol: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            symbol: symbol.to_string(),
            children,
        }
    }

    #[test]
    fn right_leaning_chain() {
        let config = AnalyzerConfig {
            lowercase_lhs: false,
            ..AnalyzerConfig::default()
        };
        let (g, table) = setup("s -> a A\nA -> b A | ε\na -> id\nb -> num", &config);
        let tree = g.derivation_tree(&table, &["id", "num", "num"], "s", 1000);

        let expected = node(
            "s",
            vec![
                node("a", vec![TreeNode::leaf("id")]),
                node(
                    "A",
                    vec![
                        node("b", vec![TreeNode::leaf("num")]),
                        node(
                            "A",
                            vec![
                                node("b", vec![TreeNode::leaf("num")]),
                                node("A", vec![TreeNode::leaf("ε")]),
                            ],
                        ),
                    ],
                ),
            ],
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.leaves(), vec!["id", "num", "num", "ε"]);
    }

    #[test]
    fn missing_cell_leaves_childless_node() {
        let (g, table) = setup(
            "expr -> term expr_tail\nexpr_tail -> + term expr_tail | ε\nterm -> id",
            &AnalyzerConfig::default(),
        );
        let tree = g.derivation_tree(&table, &["id", "id"], "expr", 1000);
        assert_eq!(
            tree,
            node(
                "expr",
                vec![
                    node("term", vec![TreeNode::leaf("id")]),
                    TreeNode::leaf("expr_tail"),
                ]
            )
        );
    }

    #[test]
    fn unmatched_terminal_is_still_a_leaf() {
        let (g, table) = setup("s -> ( s ) | x", &AnalyzerConfig::default());
        let tree = g.derivation_tree(&table, &["(", "x"], "s", 1000);
        assert_eq!(tree.leaves(), vec!["(", "x", ")"]);
    }

    #[test]
    fn node_limit_bounds_runaway_expansion() {
        let (g, table) = setup("s -> x | s", &AnalyzerConfig::default());
        let tree = g.derivation_tree(&table, &["x"], "s", 20);
        assert_eq!(tree.size(), 20);
    }
}
