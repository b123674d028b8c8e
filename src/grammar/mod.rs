pub mod config;
pub mod derivation_tree;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;
pub mod scan;
pub mod simulate;

pub use config::AnalyzerConfig;
pub use derivation_tree::TreeNode;
pub use error::GrammarError;
pub use first_follow::SymbolSets;
pub use grammar::{Grammar, Production};
pub use ll1_parsing_table::{Conflict, LL1ParsingTable};
pub use simulate::{Action, Trace, TraceStep};

pub const DEFAULT_EPSILON: &str = "ε";
pub const END_MARK: &str = "$";
pub const STEP_LIMIT: usize = 1000;
