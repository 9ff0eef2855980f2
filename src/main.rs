use tetrad::CompileError;
use tetrad::ir;
use tetrad::lexer;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use yansi::Paint;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "tetrad")]
#[command(version, about = "Compile a script into a quaternion listing")]
struct Cli {
    /// Source file to compile
    input: PathBuf,

    /// Pipeline stage to print
    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Ir,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        yansi::disable();
    }

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let file = cli.input.display().to_string();
    let source =
        fs::read_to_string(&cli.input).with_context(|| format!("failed to read {}", file))?;

    match emit(cli.emit, &source) {
        Ok(output) => {
            print!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            err.eprint(&file, &source, !cli.no_color)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn emit(stage: Emit, source: &str) -> Result<String, CompileError> {
    let tokens = lexer::tokenize(source)?;
    if let Emit::Tokens = stage {
        return Ok(tokens.iter().map(|t| format!("{}\n", t)).collect());
    }

    let statements = tetrad::parse_checked(&tokens)?;
    if let Emit::Ast = stage {
        return Ok(statements.iter().map(|(s, _)| format!("{}\n", s)).collect());
    }

    let listing = ir::lower(&statements);
    Ok(listing
        .iter()
        .enumerate()
        .map(|(address, q)| format!("{}\t{}\n", address.dim(), q))
        .collect())
}
