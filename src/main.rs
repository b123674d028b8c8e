use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use ll1_simulator::{
    grammar::{DEFAULT_EPSILON, STEP_LIMIT},
    Analysis, AnalyzerConfig,
};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// FIRST and FOLLOW sets
    Ff,
    /// LL(1) parsing table
    Ll1,
    /// Cells claimed by more than one production
    Conflicts,
    /// Step-by-step parse of the tokens
    Trace,
    /// Derivation tree of the tokens
    Tree,
    /// Derivation tree as Graphviz DOT
    Dot,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// What to print
    #[arg(value_enum, required = true)]
    outputs: Vec<Output>,

    /// File containing the grammar (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    grammar: Option<PathBuf>,

    /// Symbol that stands for the empty production
    #[arg(short, long, value_name = "SYMBOL", default_value = DEFAULT_EPSILON)]
    empty: String,

    /// Whitespace separated input tokens for `trace` and `tree`
    #[arg(short, long, value_name = "TOKENS", default_value = "")]
    tokens: String,

    #[arg(short, long, value_enum, default_value = "plain")]
    format: OutputFormat,

    /// Accept nonterminals that are not lowercase
    #[arg(long)]
    allow_uppercase: bool,

    /// Ceiling on parse steps and tree nodes
    #[arg(long, value_name = "N", default_value_t = STEP_LIMIT)]
    step_limit: usize,
}

fn render(analysis: &Analysis, output: Output, format: OutputFormat, tokens: &[&str]) -> String {
    let empty = analysis.grammar.empty_symbol.as_str();
    match output {
        Output::Prod => {
            let t = analysis.grammar.to_production_output_vec();
            match format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => serde_json::to_string(&analysis.grammar.rules).unwrap(),
            }
        }
        Output::Ff => {
            let t = analysis
                .grammar
                .to_non_terminal_output_vec(&analysis.first, &analysis.follow);
            match format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => t.to_json(),
            }
        }
        Output::Ll1 => match format {
            OutputFormat::Plain => analysis.table.to_plaintext(),
            OutputFormat::Latex => analysis.table.to_latex(empty),
            OutputFormat::Json => serde_json::to_string(&analysis.table).unwrap(),
        },
        Output::Conflicts => {
            let conflicts = analysis.conflicts();
            match format {
                OutputFormat::Json => serde_json::to_string(&conflicts).unwrap(),
                _ if conflicts.is_empty() => "no conflicts: the grammar is LL(1)".to_string(),
                _ => conflicts
                    .iter()
                    .map(|c| {
                        let productions = c
                            .productions
                            .iter()
                            .map(|p| p.join(" "))
                            .collect::<Vec<_>>()
                            .join(" | ");
                        format!("[{}, {}]: {}", c.non_terminal, c.terminal, productions)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        }
        Output::Trace => {
            let t = analysis.simulate(tokens);
            match format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => serde_json::to_string(&t).unwrap(),
            }
        }
        Output::Tree => {
            let t = analysis.derivation_tree(tokens);
            match format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => serde_json::to_string(&t).unwrap(),
            }
        }
        Output::Dot => analysis.derivation_tree(tokens).to_dot(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let input = match &cli.grammar {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("failed to read grammar: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = AnalyzerConfig {
        empty_symbol: cli.empty.clone(),
        lowercase_lhs: !cli.allow_uppercase,
        step_limit: cli.step_limit,
    };
    let analysis = match Analysis::new(&input, &config) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let tokens: Vec<&str> = cli.tokens.split_whitespace().collect();
    for output in &cli.outputs {
        println!("{}", render(&analysis, *output, cli.format, &tokens));
    }
    ExitCode::SUCCESS
}
