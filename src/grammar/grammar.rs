use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::END_MARK;

pub type Production = Vec<String>;

/// Nonterminals in declaration order, each with its alternatives.
///
/// A symbol is a nonterminal iff it is a key of `rules`; the first key is the start
/// symbol. The grammar is never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grammar {
    pub rules: IndexMap<String, Vec<Production>>,
    pub empty_symbol: String,
}

impl Grammar {
    pub fn new(empty_symbol: &str) -> Self {
        Self {
            rules: IndexMap::new(),
            empty_symbol: empty_symbol.to_string(),
        }
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.rules.keys().next().map(|s| s.as_str())
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    pub fn is_empty_symbol(&self, symbol: &str) -> bool {
        symbol == self.empty_symbol
    }

    pub fn is_empty_production(&self, production: &[String]) -> bool {
        production.len() == 1 && self.is_empty_symbol(&production[0])
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|s| s.as_str())
    }

    pub fn productions(&self, non_terminal: &str) -> &[Production] {
        self.rules
            .get(non_terminal)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// Sorted terminal alphabet followed by the end marker.
    pub fn terminals(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .rules
            .values()
            .flatten()
            .flatten()
            .map(|s| s.as_str())
            .filter(|s| !self.is_non_terminal(s) && !self.is_empty_symbol(s))
            .collect();
        set.into_iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(END_MARK.to_string()))
            .collect()
    }

    pub(crate) fn add_rule(&mut self, left: String, productions: Vec<Production>) {
        // a redeclared left-hand side replaces the earlier alternatives but keeps its slot
        self.rules.insert(left, productions);
    }
}
