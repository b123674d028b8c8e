use regex::Regex;

pub const ARROW: &str = "->";
pub const BAR: &str = "|";

/// Single-character operator terminals such as `+` or `(`. `$` is reserved for the
/// end marker and quotes, `#`, `@` and backslashes are not operators, so those drop.
const OPERATOR_CLASS: &str = r"[+\-*/%^=<>!&(){}\[\],;.:~?]";

fn token_pattern(empty_symbol: &str) -> Regex {
    let mut alternatives = vec![regex::escape(ARROW), regex::escape(BAR)];
    if !empty_symbol.is_empty() {
        alternatives.push(regex::escape(empty_symbol));
    }
    alternatives.push("[A-Za-z0-9_]+".to_string());
    alternatives.push(OPERATOR_CLASS.to_string());
    Regex::new(&alternatives.join("|")).expect("token pattern")
}

/// Splits grammar text into one token list per non-blank line.
///
/// Recognised tokens, in priority order: `->`, `|`, the empty symbol, runs of
/// `[A-Za-z0-9_]` and single operator characters. Anything else is dropped.
pub fn scan(text: &str, empty_symbol: &str) -> Vec<Vec<String>> {
    let pattern = token_pattern(empty_symbol);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            pattern
                .find_iter(line)
                .map(|m| m.as_str().to_string())
                .collect()
        })
        .collect()
}
