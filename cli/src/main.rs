use std::path::PathBuf;
use std::process::ExitCode;

use caparg_core::{ParseResult, Parser as TreeParser};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod error;

use error::Result;

/// Exit status when the tokens do not match the declared tree.
const EXIT_PARSE_ERROR: u8 = 2;

/// Rendering of the parse result on stdout.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "caparg")]
#[command(about = "Parse command-line tokens against a declared command tree")]
struct Cli {
    /// Command tree declaration (YAML, or JSON with a .json extension).
    #[arg(long)]
    spec: PathBuf,
    /// Output format for the parse result.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(Ok(parsed)) => match render(&parsed, cli.format) {
            Ok(raw) => {
                println!("{raw}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        Ok(Err(parse_error)) => {
            tracing::debug!(kind = ?parse_error.kind(), "tokens rejected");
            eprintln!("{parse_error}");
            ExitCode::from(EXIT_PARSE_ERROR)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Loads and compiles the tree; the inner result is the parse outcome.
fn run(cli: &Cli) -> Result<std::result::Result<ParseResult, caparg_core::ParseError>> {
    let tree = config::load_tree(&cli.spec)?;
    let parser = TreeParser::new(&tree)?;
    tracing::debug!(commands = parser.table().len(), "compiled command tree");
    Ok(parser.parse(cli.tokens.iter().cloned()))
}

fn render(parsed: &ParseResult, format: CliOutputFormat) -> Result<String> {
    let raw = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(parsed)?,
        CliOutputFormat::Yaml => serde_yaml::to_string(parsed)?,
    };
    Ok(raw.trim_end().to_string())
}
