use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    /// A rule's left-hand side does not follow the lowercase naming convention.
    #[error("malformed grammar: left-hand side `{symbol}` must be lowercase (nonterminal)")]
    MalformedGrammar { symbol: String },

    #[error("invalid options: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
