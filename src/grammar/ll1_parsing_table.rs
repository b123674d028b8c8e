use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;

use crate::Grammar;

use super::{first_follow::SymbolSets, pretty_print::ProductionOutput, Production};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1Row {
    pub non_terminal: String,
    pub first: Vec<String>,
    pub follow: Vec<String>,
    /// One cell per terminal column. A cell lists every production that claimed it,
    /// in evaluation order; the last one wins.
    pub cells: Vec<Vec<Production>>,
}

/// Predictive table: one row per nonterminal, one column per terminal plus `$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1ParsingTable {
    pub terminals: Vec<String>,
    pub rows: Vec<LL1Row>,
}

/// A cell claimed by more than one production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub non_terminal: String,
    pub terminal: String,
    pub productions: Vec<Production>,
}

impl LL1ParsingTable {
    fn column(&self, terminal: &str) -> Option<usize> {
        self.terminals.iter().position(|t| t == terminal)
    }

    fn row(&self, non_terminal: &str) -> Option<&LL1Row> {
        self.rows.iter().find(|r| r.non_terminal == non_terminal)
    }

    pub fn candidates(&self, non_terminal: &str, terminal: &str) -> &[Production] {
        match (self.row(non_terminal), self.column(terminal)) {
            (Some(row), Some(col)) => &row.cells[col],
            _ => &[],
        }
    }

    /// The production to expand for `non_terminal` under lookahead `terminal`.
    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<&Production> {
        self.candidates(non_terminal, terminal).last()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.cells
                    .iter()
                    .zip(self.terminals.iter())
                    .filter(|(cell, _)| cell.len() > 1)
                    .map(|(cell, terminal)| Conflict {
                        non_terminal: row.non_terminal.clone(),
                        terminal: terminal.clone(),
                        productions: cell.clone(),
                    })
            })
            .collect()
    }

    pub fn is_ll1(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(|cell| cell.len() <= 1))
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new(), "FIRST".to_string(), "FOLLOW".to_string()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for row in &self.rows {
            let left = row.non_terminal.as_str();
            let mut line: Vec<String> = vec![
                left.to_string(),
                row.first.join(", "),
                row.follow.join(", "),
            ];
            line.extend(row.cells.iter().map(|cell| {
                cell.iter()
                    .map(|production| ProductionOutput::single(left, production).to_plaintext(0, false))
                    .collect::<Vec<_>>()
                    .join(", ")
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self, empty_symbol: &str) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for row in &self.rows {
            let left = row.non_terminal.as_str();
            let mut line: Vec<String> = vec![escape_tex(left).to_string()];
            line.extend(row.cells.iter().map(|cell| {
                let r = cell
                    .iter()
                    .map(|production| {
                        ProductionOutput::single(left, production)
                            .with_empty_symbol(empty_symbol)
                            .to_latex(false)
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                if cell.len() > 1 {
                    format!("{{\\color{{red}}{}}}", r)
                } else {
                    r
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl Grammar {
    pub fn ll1_parsing_table(&self, first: &SymbolSets, follow: &SymbolSets) -> LL1ParsingTable {
        let terminals = self.terminals();
        let column = |t: &str| terminals.iter().position(|s| s == t);

        let mut rows: Vec<LL1Row> = Vec::new();
        for (left, productions) in &self.rules {
            let mut cells: Vec<Vec<Production>> = vec![Vec::new(); terminals.len()];
            let mut claim = |terminal: &str, production: &Production| {
                if let Some(col) = column(terminal) {
                    let cell = &mut cells[col];
                    if let Some(previous) = cell.last().filter(|p| *p != production) {
                        log::warn!(
                            "LL(1) conflict at [{}, {}]: {:?} overrides {:?}",
                            left,
                            terminal,
                            production,
                            previous
                        );
                    }
                    // a repeated claimant moves to the end so it stays the winner
                    cell.retain(|p| p != production);
                    cell.push(production.clone());
                }
            };

            let follow_set = follow.get(left);
            for production in productions {
                let (first_alpha, nullable) = self.first_of_string(production, first);
                for t in first_alpha.iter().filter(|t| !self.is_empty_symbol(t)) {
                    claim(t.as_str(), production);
                }
                if nullable {
                    for t in follow_set.into_iter().flatten() {
                        claim(t.as_str(), production);
                    }
                }
            }

            rows.push(LL1Row {
                non_terminal: left.clone(),
                first: first
                    .get(left)
                    .map(|s| s.iter().cloned().collect())
                    .unwrap_or_default(),
                follow: follow_set
                    .map(|s| s.iter().cloned().collect())
                    .unwrap_or_default(),
                cells,
            });
        }

        log::debug!(
            "built LL(1) table with {} rows and {} columns",
            rows.len(),
            terminals.len()
        );
        LL1ParsingTable { terminals, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn production(s: &str) -> Production {
        s.split_whitespace().map(String::from).collect()
    }

    fn table_for(grammar: &str) -> (Grammar, LL1ParsingTable) {
        let g = Grammar::parse(grammar, "ε").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        let table = g.ll1_parsing_table(&first, &follow);
        (g, table)
    }

    #[test]
    fn simple_sum_table() {
        let (_, table) = table_for("expr -> term expr_tail\nexpr_tail -> + term expr_tail | ε\nterm -> id");
        assert_eq!(table.terminals, vec!["+", "id", "$"]);
        assert_eq!(table.get("expr", "id"), Some(&production("term expr_tail")));
        assert_eq!(table.get("expr", "+"), None);
        assert_eq!(table.get("expr_tail", "+"), Some(&production("+ term expr_tail")));
        assert_eq!(table.get("expr_tail", "$"), Some(&production("ε")));
        assert_eq!(table.get("expr_tail", "id"), None);
        assert_eq!(table.get("term", "id"), Some(&production("id")));
        assert!(table.is_ll1());
        assert!(table.conflicts().is_empty());
    }

    #[test]
    fn table_is_fully_materialized() {
        let (g, table) = table_for("s -> a s | ε\na -> x");
        assert_eq!(table.rows.len(), g.rules.len());
        for row in &table.rows {
            assert_eq!(row.cells.len(), table.terminals.len());
        }
        assert_eq!(table.get("missing", "x"), None);
        assert_eq!(table.get("s", "not-a-terminal"), None);
    }

    #[test]
    fn nullable_start_maps_end_mark_to_empty_production() {
        let (_, table) = table_for("s -> x s | ε");
        assert_eq!(table.get("s", "$"), Some(&production("ε")));
        assert_eq!(table.get("s", "x"), Some(&production("x s")));
    }

    #[test]
    fn conflicts_are_recorded_and_last_wins() {
        let (_, table) = table_for("s -> a x | a y\na -> id");
        assert!(!table.is_ll1());
        assert_eq!(table.get("s", "id"), Some(&production("a y")));
        assert_eq!(
            table.conflicts(),
            vec![Conflict {
                non_terminal: "s".to_string(),
                terminal: "id".to_string(),
                productions: vec![production("a x"), production("a y")],
            }]
        );
    }

    #[test]
    fn repeated_alternative_wins_when_evaluated_last() {
        let (_, table) = table_for("s -> a x | a y | a x\na -> id");
        assert_eq!(table.get("s", "id"), Some(&production("a x")));
        assert_eq!(
            table.candidates("s", "id"),
            &[production("a y"), production("a x")]
        );
        assert_eq!(table.conflicts().len(), 1);
    }

    #[test]
    fn first_follow_overlap_is_a_conflict() {
        // FOLLOW(a) holds x, which also starts `x a`
        let (_, table) = table_for("s -> a x\na -> x a | ε");
        let conflicts = table.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].non_terminal, "a");
        assert_eq!(conflicts[0].terminal, "x");
        assert_eq!(table.get("a", "x"), Some(&production("ε")));
    }

    #[test]
    fn building_twice_is_identical() {
        let g = Grammar::parse("e -> t e2\ne2 -> + t e2 | ε\nt -> ( e ) | id", "ε").unwrap();
        let first = g.first_sets();
        let follow = g.follow_sets(&first);
        assert_eq!(g.ll1_parsing_table(&first, &follow), g.ll1_parsing_table(&first, &follow));
    }

    #[test]
    fn plaintext_has_header_and_rows() {
        let (_, table) = table_for("s -> x s | ε");
        let text = table.to_plaintext();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("FIRST"));
        assert!(lines[1].contains("s -> x s"));
        assert!(lines[1].contains("s -> ε"));
    }

    #[test]
    fn latex_marks_conflicts() {
        let (_, table) = table_for("s -> a x | a y\na -> id");
        assert!(table.to_latex("ε").contains("\\color{red}"));
    }
}
