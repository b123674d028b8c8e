use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::{Grammar, END_MARK};

/// One set of symbols per nonterminal, in declaration order.
pub type SymbolSets = IndexMap<String, BTreeSet<String>>;

impl Grammar {
    fn empty_sets(&self) -> SymbolSets {
        self.non_terminal_iter()
            .map(|nt| (nt.to_string(), BTreeSet::new()))
            .collect()
    }

    /// FIRST of a symbol string, with the empty symbol included when the whole string
    /// can vanish. The flag repeats that answer.
    ///
    /// The walk stops at the empty symbol, at a terminal, or at a nonterminal whose
    /// FIRST lacks the empty symbol. Symbols without a FIRST entry count as terminals.
    pub fn first_of_string(&self, symbols: &[String], first: &SymbolSets) -> (BTreeSet<String>, bool) {
        let mut result = BTreeSet::new();
        let mut nullable = true;
        for symbol in symbols {
            if self.is_empty_symbol(symbol) {
                break;
            }
            match first.get(symbol) {
                Some(set) => {
                    result.extend(
                        set.iter()
                            .filter(|s| !self.is_empty_symbol(s))
                            .cloned(),
                    );
                    if !set.contains(&self.empty_symbol) {
                        nullable = false;
                        break;
                    }
                }
                None => {
                    result.insert(symbol.clone());
                    nullable = false;
                    break;
                }
            }
        }
        if nullable {
            result.insert(self.empty_symbol.clone());
        }
        (result, nullable)
    }

    /// One pass over every production. Returns whether any set grew.
    fn relax_first(&self, first: &mut SymbolSets) -> bool {
        let mut changed = false;
        for (left, productions) in &self.rules {
            for production in productions {
                let (contribution, _) = self.first_of_string(production, first);
                let set = &mut first[left.as_str()];
                let before = set.len();
                set.extend(contribution);
                changed |= set.len() != before;
            }
        }
        changed
    }

    pub fn first_sets(&self) -> SymbolSets {
        let mut first = self.empty_sets();
        let mut passes = 1;
        while self.relax_first(&mut first) {
            passes += 1;
        }
        log::debug!("FIRST sets stable after {} passes", passes);
        first
    }

    fn relax_follow(&self, first: &SymbolSets, follow: &mut SymbolSets) -> bool {
        let mut changed = false;
        for (left, productions) in &self.rules {
            for production in productions {
                for (i, symbol) in production.iter().enumerate() {
                    if !self.is_non_terminal(symbol) {
                        continue;
                    }
                    let (beta_first, nullable) = self.first_of_string(&production[i + 1..], first);
                    let mut additions: BTreeSet<String> = beta_first
                        .into_iter()
                        .filter(|s| !self.is_empty_symbol(s))
                        .collect();
                    if nullable {
                        additions.extend(follow[left.as_str()].iter().cloned());
                    }

                    let set = &mut follow[symbol.as_str()];
                    let before = set.len();
                    set.extend(additions);
                    changed |= set.len() != before;
                }
            }
        }
        changed
    }

    /// FOLLOW sets, seeded with the end marker on the start symbol.
    pub fn follow_sets(&self, first: &SymbolSets) -> SymbolSets {
        let mut follow = self.empty_sets();
        if let Some(start) = self.start_symbol() {
            follow[start].insert(END_MARK.to_string());
        }
        let mut passes = 1;
        while self.relax_follow(first, &mut follow) {
            passes += 1;
        }
        log::debug!("FOLLOW sets stable after {} passes", passes);
        follow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(symbols: &[&str]) -> BTreeSet<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn expression_grammar() -> Grammar {
        Grammar::parse(
            "e -> t e2
             e2 -> + t e2 | ε
             t -> f t2
             t2 -> * f t2 | ε
             f -> ( e ) | id",
            "ε",
        )
        .unwrap()
    }

    #[test]
    fn first_of_simple_sum() {
        let g = Grammar::parse("expr -> term expr_tail\nexpr_tail -> + term expr_tail | ε\nterm -> id", "ε")
            .unwrap();
        let first = g.first_sets();
        assert_eq!(first["term"], set(&["id"]));
        assert_eq!(first["expr_tail"], set(&["+", "ε"]));
        assert_eq!(first["expr"], set(&["id"]));

        let follow = g.follow_sets(&first);
        assert_eq!(follow["expr_tail"], set(&["$"]));
        assert_eq!(follow["term"], set(&["+", "$"]));
    }

    #[test]
    fn expression_grammar_sets() {
        let g = expression_grammar();
        let first = g.first_sets();
        assert_eq!(first["e"], set(&["(", "id"]));
        assert_eq!(first["e2"], set(&["+", "ε"]));
        assert_eq!(first["t2"], set(&["*", "ε"]));
        assert_eq!(first["f"], set(&["(", "id"]));

        let follow = g.follow_sets(&first);
        assert_eq!(follow["e"], set(&["$", ")"]));
        assert_eq!(follow["e2"], set(&["$", ")"]));
        assert_eq!(follow["t"], set(&["$", ")", "+"]));
        assert_eq!(follow["t2"], set(&["$", ")", "+"]));
        assert_eq!(follow["f"], set(&["$", ")", "*", "+"]));
    }

    #[test]
    fn nullable_chain_propagates() {
        let g = Grammar::parse("s -> a b c\na -> x | ε\nb -> ε\nc -> y | ε", "ε").unwrap();
        let first = g.first_sets();
        assert_eq!(first["s"], set(&["x", "y", "ε"]));

        let follow = g.follow_sets(&first);
        assert_eq!(follow["a"], set(&["y", "$"]));
        assert_eq!(follow["b"], set(&["y", "$"]));
        assert_eq!(follow["c"], set(&["$"]));
    }

    #[test]
    fn first_string_walk() {
        let g = expression_grammar();
        let first = g.first_sets();
        let symbols = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();

        assert_eq!(g.first_of_string(&symbols("t2 e2"), &first), (set(&["*", "+", "ε"]), true));
        assert_eq!(g.first_of_string(&symbols("t2 )"), &first), (set(&["*", ")"]), false));
        assert_eq!(g.first_of_string(&[], &first), (set(&["ε"]), true));
        assert_eq!(g.first_of_string(&symbols("ε id"), &first), (set(&["ε"]), true));
        // undeclared symbols behave as terminals
        assert_eq!(g.first_of_string(&symbols("Unknown"), &first), (set(&["Unknown"]), false));
    }

    #[test]
    fn first_grows_monotonically_to_a_fixed_point() {
        let g = expression_grammar();
        let mut first = g.empty_sets();
        loop {
            let before = first.clone();
            let changed = g.relax_first(&mut first);
            for (nt, set) in &before {
                assert!(set.is_subset(&first[nt.as_str()]));
            }
            if !changed {
                break;
            }
        }
        assert_eq!(first, g.first_sets());

        let mut again = first.clone();
        assert!(!g.relax_first(&mut again));
        assert_eq!(again, first);
    }

    #[test]
    fn follow_has_end_mark_and_never_empty_symbol() {
        for g in [
            expression_grammar(),
            Grammar::parse("s -> a s | ε\na -> x a | ε", "ε").unwrap(),
            Grammar::parse("p -> q r\nq -> eps\nr -> eps | z", "eps").unwrap(),
        ] {
            let first = g.first_sets();
            let follow = g.follow_sets(&first);
            assert!(follow[g.start_symbol().unwrap()].contains(END_MARK));
            for set in follow.values() {
                assert!(!set.contains(&g.empty_symbol));
            }

            let mut again = follow.clone();
            assert!(!g.relax_follow(&first, &mut again));
        }
    }

    #[test]
    fn left_recursion_still_terminates() {
        let g = Grammar::parse("e -> e + t | t\nt -> id", "ε").unwrap();
        let first = g.first_sets();
        assert_eq!(first["e"], set(&["id"]));
        let follow = g.follow_sets(&first);
        assert_eq!(follow["e"], set(&["+", "$"]));
        assert_eq!(follow["t"], set(&["+", "$"]));
    }
}
