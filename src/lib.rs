extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{
    AnalyzerConfig, Conflict, Grammar, GrammarError, LL1ParsingTable, SymbolSets, Trace,
    TreeNode,
};

/// A grammar together with everything derived from it. Immutable once built, so one
/// analysis can serve any number of token lists.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub grammar: Grammar,
    pub first: SymbolSets,
    pub follow: SymbolSets,
    pub table: LL1ParsingTable,
    #[serde(skip)]
    pub config: AnalyzerConfig,
}

impl Analysis {
    pub fn new(grammar: &str, config: &AnalyzerConfig) -> Result<Self, GrammarError> {
        let grammar = Grammar::parse_with(grammar, config)?;
        let first = grammar.first_sets();
        let follow = grammar.follow_sets(&first);
        let table = grammar.ll1_parsing_table(&first, &follow);
        Ok(Self {
            grammar,
            first,
            follow,
            table,
            config: config.clone(),
        })
    }

    /// Start symbol, or the empty string for a grammar without rules. The empty string is
    /// never a token, so such a run stops at its first step.
    pub fn start_symbol(&self) -> &str {
        self.grammar.start_symbol().unwrap_or_default()
    }

    pub fn simulate<S: AsRef<str>>(&self, tokens: &[S]) -> Trace {
        self.grammar
            .simulate(&self.table, tokens, self.start_symbol(), self.config.step_limit)
    }

    pub fn derivation_tree<S: AsRef<str>>(&self, tokens: &[S]) -> TreeNode {
        self.grammar
            .derivation_tree(&self.table, tokens, self.start_symbol(), self.config.step_limit)
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        self.table.conflicts()
    }
}

fn error_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

fn with_analysis(
    grammar: &str,
    options: &str,
    f: impl FnOnce(&Analysis) -> serde_json::Value,
) -> String {
    let analysis = AnalyzerConfig::from_json(options)
        .map_err(GrammarError::from)
        .and_then(|config| Analysis::new(grammar, &config));
    match analysis {
        Ok(analysis) => f(&analysis).to_string(),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn analyze_to_json(grammar: &str, options: &str) -> String {
    with_analysis(grammar, options, |a| {
        serde_json::json!({
            "analysis": a,
            "conflicts": a.conflicts(),
        })
    })
}

#[wasm_bindgen]
pub fn simulate_to_json(grammar: &str, options: &str, tokens: &str) -> String {
    let tokens: Vec<&str> = tokens.split_whitespace().collect();
    with_analysis(grammar, options, |a| {
        let trace = a.simulate(&tokens);
        serde_json::json!({
            "accepted": trace.accepted(),
            "trace": trace,
        })
    })
}

#[wasm_bindgen]
pub fn derivation_tree_to_json(grammar: &str, options: &str, tokens: &str) -> String {
    let tokens: Vec<&str> = tokens.split_whitespace().collect();
    with_analysis(grammar, options, |a| {
        serde_json::json!({ "tree": a.derivation_tree(&tokens) })
    })
}
