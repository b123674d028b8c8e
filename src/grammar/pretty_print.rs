use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    derivation_tree::TreeNode, first_follow::SymbolSets, simulate::Trace, Grammar,
    DEFAULT_EPSILON,
};

#[derive(Debug, Clone)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
    pub empty_symbol: &'a str,
}

impl<'a> ProductionOutput<'a> {
    pub fn single(left: &'a str, production: &'a [String]) -> Self {
        Self {
            left,
            rights: vec![production.iter().map(|s| s.as_str()).collect()],
            empty_symbol: DEFAULT_EPSILON,
        }
    }

    pub fn with_empty_symbol(mut self, empty_symbol: &'a str) -> Self {
        self.empty_symbol = empty_symbol;
        self
    }
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| {
                        if *s == self.empty_symbol {
                            "\\epsilon".to_string()
                        } else {
                            escape::tex(*s).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .rules
            .iter()
            .map(|(left, productions)| ProductionOutput {
                left: left.as_str(),
                rights: productions
                    .iter()
                    .map(|p| p.iter().map(|s| s.as_str()).collect())
                    .collect(),
                empty_symbol: self.empty_symbol.as_str(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "FIRST({}) = {{ {} }} | FOLLOW({}) = {{ {} }}",
            self.name,
            self.first.join(", "),
            self.name,
            self.follow.join(", ")
        )
    }

    fn to_latex(&self, empty_symbol: &str) -> String {
        let f = |a: &Vec<&str>| -> String {
            a.iter()
                .map(|s| {
                    if *s == empty_symbol {
                        r"$\epsilon$".to_string()
                    } else {
                        escape::tex(*s).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        };

        format!(
            "{} & {} & {}",
            escape::tex(self.name),
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
    #[serde(skip)]
    empty_symbol: &'a str,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex(self.empty_symbol))
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c}\n".to_string()
            + "Symbol & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    /// FIRST and FOLLOW per nonterminal, sets sorted.
    pub fn to_non_terminal_output_vec<'a>(
        &'a self,
        first: &'a SymbolSets,
        follow: &'a SymbolSets,
    ) -> NonTerminalOutputVec<'a> {
        let sorted = |sets: &'a SymbolSets, name: &str| -> Vec<&'a str> {
            sets.get(name)
                .map(|s| s.iter().map(|t| t.as_str()).collect())
                .unwrap_or_default()
        };
        let data = self
            .non_terminal_iter()
            .map(|name| NonTerminalOutput {
                name,
                first: sorted(first, name),
                follow: sorted(follow, name),
            })
            .collect();
        NonTerminalOutputVec {
            data,
            empty_symbol: self.empty_symbol.as_str(),
        }
    }
}

impl Trace {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<[String; 3]> = vec![[
            "Stack".to_string(),
            "Input".to_string(),
            "Action".to_string(),
        ]];
        output.extend(
            self.steps
                .iter()
                .map(|step| [step.stack.join(" "), step.input.join(" "), step.action.to_string()]),
        );

        let width: Vec<usize> = (0..3)
            .map(|j| {
                output
                    .iter()
                    .map(|row| row[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        output
            .iter()
            .map(|row| {
                format!(
                    "{:>w0$} | {:>w1$} | {}",
                    row[0],
                    row[1],
                    row[2],
                    w0 = width[0],
                    w1 = width[1]
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .steps
            .iter()
            .map(|step| {
                format!(
                    "{} & {} & {}",
                    escape::tex(step.stack.join(" ")),
                    escape::tex(step.input.join(" ")),
                    escape::tex(step.action.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{r|r|l}\n".to_string()
            + "Stack & Input & Action\\\\\\hline\n"
            + &content
            + "\n\\end{tabular}"
    }
}

impl TreeNode {
    /// Indented outline, one node per line.
    pub fn to_plaintext(&self) -> String {
        fn walk(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
            lines.push(format!("{}{}", "  ".repeat(depth), node.symbol));
            for child in &node.children {
                walk(child, depth + 1, lines);
            }
        }

        let mut lines = Vec::new();
        walk(self, 0, &mut lines);
        lines.join("\n")
    }

    pub fn to_latex(&self) -> String {
        fn walk(node: &TreeNode) -> String {
            let label = escape::tex(node.symbol.as_str());
            if node.children.is_empty() {
                format!("{{{}}}", label)
            } else {
                format!(
                    "[.{{{}}} {} ]",
                    label,
                    node.children.iter().map(walk).collect::<Vec<_>>().join(" ")
                )
            }
        }

        format!("\\Tree {}", walk(self))
    }

    /// Graphviz digraph. Node ids are pre-order positions.
    pub fn to_dot(&self) -> String {
        fn walk(node: &TreeNode, next_id: &mut usize, lines: &mut Vec<String>) -> usize {
            let id = *next_id;
            *next_id += 1;
            lines.push(format!(
                "    n{} [label={}];",
                id,
                serde_json::to_string(&node.symbol).unwrap()
            ));
            for child in &node.children {
                let child_id = walk(child, next_id, lines);
                lines.push(format!("    n{} -> n{};", id, child_id));
            }
            id
        }

        let mut lines = vec!["digraph {".to_string()];
        walk(self, &mut 0, &mut lines);
        lines.push("}".to_string());
        lines.join("\n")
    }
}
