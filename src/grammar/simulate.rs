use std::fmt;

use serde::Serialize;

use super::{Grammar, LL1ParsingTable, Production, END_MARK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Expand { left: String, production: Production },
    Match { terminal: String },
    NoRule { top: String, current: String },
    Mismatch { expected: String, found: String },
    StepLimit,
    Accept,
}

impl Action {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Action::NoRule { .. } | Action::Mismatch { .. } | Action::StepLimit
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Expand { left, production } => write!(f, "{} → {}", left, production.join(" ")),
            Action::Match { terminal } => write!(f, "Match {}", terminal),
            Action::NoRule { top, current } => write!(f, "Error: no regla para {} con {}", top, current),
            Action::Mismatch { expected, found } => write!(f, "Error: expected {}, got {}", expected, found),
            Action::StepLimit => write!(f, "Error: step limit reached"),
            Action::Accept => write!(f, "Aceptado"),
        }
    }
}

/// Parser state before the step's action: the stack bottom to top, with the popped
/// symbol last, and the unread input including `$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub stack: Vec<String>,
    pub input: Vec<String>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn accepted(&self) -> bool {
        self.steps.iter().any(|s| s.action == Action::Accept)
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.steps.last().map(|s| &s.action)
    }
}

impl Grammar {
    /// Replays `tokens` against `table` with an explicit stack.
    ///
    /// Never fails: a missing cell, a mismatched terminal or running past `step_limit`
    /// ends the trace with an error step.
    pub fn simulate<S: AsRef<str>>(
        &self,
        table: &LL1ParsingTable,
        tokens: &[S],
        start: &str,
        step_limit: usize,
    ) -> Trace {
        let input: Vec<String> = tokens
            .iter()
            .map(|t| t.as_ref().to_string())
            .chain(std::iter::once(END_MARK.to_string()))
            .collect();
        let mut stack: Vec<String> = vec![END_MARK.to_string(), start.to_string()];
        let mut cursor = 0;
        let mut trace = Trace::default();

        while let Some(top) = stack.pop() {
            if trace.steps.len() >= step_limit {
                stack.push(top);
                trace.steps.push(TraceStep {
                    stack,
                    input: input[cursor..].to_vec(),
                    action: Action::StepLimit,
                });
                break;
            }

            let current = input[cursor].as_str();
            let snapshot: Vec<String> = stack.iter().chain(std::iter::once(&top)).cloned().collect();
            let remaining = input[cursor..].to_vec();

            let action = if self.is_non_terminal(&top) {
                match table.get(&top, current) {
                    None => Action::NoRule {
                        top: top.clone(),
                        current: current.to_string(),
                    },
                    Some(production) => {
                        if !self.is_empty_production(production) {
                            stack.extend(production.iter().rev().cloned());
                        }
                        Action::Expand {
                            left: top.clone(),
                            production: production.clone(),
                        }
                    }
                }
            } else if top == current {
                cursor += 1;
                if top == END_MARK {
                    Action::Accept
                } else {
                    Action::Match {
                        terminal: top.clone(),
                    }
                }
            } else {
                Action::Mismatch {
                    expected: top.clone(),
                    found: current.to_string(),
                }
            };

            log::trace!("{} | {} | {}", snapshot.join(" "), remaining.join(" "), action);
            let done = action.is_error() || action == Action::Accept;
            trace.steps.push(TraceStep {
                stack: snapshot,
                input: remaining,
                action,
            });
            if done {
                break;
            }
        }

        trace
    }
}
