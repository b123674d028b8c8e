use crate::Grammar;

use super::{
    config::AnalyzerConfig,
    error::GrammarError,
    scan::{scan, BAR},
    Production,
};

/// Lowercase in the sense of "has cased letters and none of them are uppercase".
fn is_lowercase_name(name: &str) -> bool {
    name.chars().any(char::is_lowercase) && !name.chars().any(char::is_uppercase)
}

impl Grammar {
    pub fn parse(grammar: &str, empty_symbol: &str) -> Result<Self, GrammarError> {
        Self::parse_with(grammar, &AnalyzerConfig::with_empty_symbol(empty_symbol))
    }

    pub fn parse_with(grammar: &str, config: &AnalyzerConfig) -> Result<Self, GrammarError> {
        let mut g = Self::new(&config.empty_symbol);

        for tokens in scan(grammar, &config.empty_symbol) {
            // a line made only of dropped characters carries no rule
            let Some(left) = tokens.first().cloned() else {
                continue;
            };
            if config.lowercase_lhs && !is_lowercase_name(&left) {
                return Err(GrammarError::MalformedGrammar { symbol: left });
            }

            // tokens[1] is taken to be the arrow
            let productions: Vec<Production> = tokens
                .get(2..)
                .unwrap_or(&[])
                .split(|t| t == BAR)
                .map(|right| {
                    if right.is_empty() {
                        vec![config.empty_symbol.clone()]
                    } else {
                        right.to_vec()
                    }
                })
                .collect();

            g.add_rule(left, productions);
        }

        log::debug!("parsed grammar with {} nonterminals", g.rules.len());
        Ok(g)
    }
}
