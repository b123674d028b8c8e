use serde::Deserialize;

use super::{DEFAULT_EPSILON, STEP_LIMIT};

/// Knobs shared by every stage of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Marker that stands for the empty production.
    pub empty_symbol: String,
    /// Reject rules whose left-hand side is not lowercase.
    pub lowercase_lhs: bool,
    /// Ceiling on simulator steps and on derivation tree nodes.
    pub step_limit: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            empty_symbol: DEFAULT_EPSILON.to_string(),
            lowercase_lhs: true,
            step_limit: STEP_LIMIT,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_empty_symbol(empty_symbol: &str) -> Self {
        Self {
            empty_symbol: empty_symbol.to_string(),
            ..Self::default()
        }
    }

    /// Reads options sent by a front end. Blank input means defaults.
    pub fn from_json(options: &str) -> Result<Self, serde_json::Error> {
        if options.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnalyzerConfig::from_json(r#"{"empty_symbol": "eps"}"#).unwrap();
        assert_eq!(config.empty_symbol, "eps");
        assert!(config.lowercase_lhs);
        assert_eq!(config.step_limit, STEP_LIMIT);
    }

    #[test]
    fn blank_json_is_default() {
        assert_eq!(AnalyzerConfig::from_json("  ").unwrap(), AnalyzerConfig::default());
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(AnalyzerConfig::from_json("{").is_err());
    }
}
