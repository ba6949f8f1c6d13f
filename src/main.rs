//! Command-line front end: parse a JSON document and inspect the result.
//!
//! Usage:
//!   json-parser `[FILE]` [--at `<segment>`]... [--find `<key>`]   - Print the value reached
//!   json-parser `[FILE]` --tokens                                - Print the token stream

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use json_parser::{tokenize, EscapePolicy, Explorer, Key, ParseOptions, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "json-parser", version, about = "Parse JSON and explore the value tree")]
struct Cli {
    /// Input file; standard input is read when omitted
    file: Option<PathBuf>,

    /// Path segment to walk into: an index for arrays, a key for objects
    #[arg(long = "at", value_name = "SEGMENT")]
    at: Vec<String>,

    /// Search below the reached node for the first value stored under this key
    #[arg(long, value_name = "KEY")]
    find: Option<String>,

    /// Print the token stream instead of parsing
    #[arg(long, conflicts_with_all = ["at", "find"])]
    tokens: bool,

    /// Maximum nesting depth of arrays and objects
    #[arg(long, default_value_t = ParseOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Reject a comma directly before `]` or `}`
    #[arg(long)]
    no_trailing_commas: bool,

    /// Keep strings with malformed escapes as raw text instead of failing
    #[arg(long)]
    lenient_escapes: bool,
}

impl Cli {
    fn options(&self) -> ParseOptions {
        let escapes = if self.lenient_escapes {
            EscapePolicy::Lenient
        } else {
            EscapePolicy::Strict
        };
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .with_trailing_commas(!self.no_trailing_commas)
            .with_escapes(escapes)
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let input = read_input(cli.file.as_ref()).unwrap_or_else(|e| {
        eprintln!("Error reading input: {}", e);
        process::exit(1);
    });

    if cli.tokens {
        for token in tokenize(&input) {
            println!("{}\t{}\t{}", token.position, token.kind, token.text);
        }
        return;
    }

    let value = json_parser::parse_with_options(&input, cli.options()).unwrap_or_else(|e| {
        eprintln!("Parse error: {}", e);
        process::exit(1);
    });

    let mut explorer = value.explore();
    for segment in &cli.at {
        explorer = step(explorer, segment);
    }
    if let Some(key) = &cli.find {
        explorer = explorer.find_key(key);
    }

    match explorer.value() {
        Ok(found) => println!("{:#?}", found),
        Err(e) => {
            eprintln!("Lookup error: {}", e);
            process::exit(1);
        }
    }
}

/// Applies one `--at` segment, reading it as an index when the current node
/// is an array.
fn step<'v>(explorer: Explorer<'v>, segment: &str) -> Explorer<'v> {
    let key = match (explorer.value(), segment.parse::<usize>()) {
        (Ok(Value::Array(_)), Ok(index)) => Key::Index(index),
        _ => Key::Field(segment),
    };
    explorer.traverse([key])
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
