// tabulon CLI - headless driver for the spreadsheet evaluation core.

mod exit_codes;
mod sheet_ops;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tabulon_engine::{Position, Sheet};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use sheet_ops::Command;

#[derive(Parser)]
#[command(name = "tabulon")]
#[command(about = "Headless spreadsheet evaluation core")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set a cell's raw text (formulas start with '=').
    Set { cell: String, text: String },
    /// Print a cell's displayed value.
    Get { cell: String },
    /// Clear a cell.
    Clear { cell: String },
    /// Print the whole sheet, tab-separated.
    Print {
        /// Print raw text instead of evaluated values.
        #[arg(long)]
        texts: bool,
    },
    /// Read `set`/`get`/`clear`/`print` commands from stdin, one per line.
    Repl,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut sheet = Sheet::new();
    let stdout = io::stdout();

    let result = match cli.command {
        Some(Commands::Set { cell, text }) => {
            parse_cell(&cell).and_then(|pos| run_one(&mut sheet, Command::Set { pos, text }, stdout.lock()))
        }
        Some(Commands::Get { cell }) => {
            parse_cell(&cell).and_then(|pos| run_one(&mut sheet, Command::Get { pos }, stdout.lock()))
        }
        Some(Commands::Clear { cell }) => {
            parse_cell(&cell).and_then(|pos| run_one(&mut sheet, Command::Clear { pos }, stdout.lock()))
        }
        Some(Commands::Print { texts }) => {
            let cmd = if texts { Command::PrintTexts } else { Command::PrintValues };
            run_one(&mut sheet, cmd, stdout.lock())
        }
        Some(Commands::Repl) | None => run_repl(&mut sheet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError::Usage(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_USAGE)
        }
        Err(CliError::Engine(e)) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

enum CliError {
    Usage(String),
    Engine(tabulon_engine::SheetError),
}

impl From<tabulon_engine::SheetError> for CliError {
    fn from(e: tabulon_engine::SheetError) -> Self {
        CliError::Engine(e)
    }
}

fn run_one(sheet: &mut Sheet, cmd: Command, out: impl Write) -> Result<(), CliError> {
    sheet_ops::run(sheet, cmd, out)?;
    Ok(())
}

fn run_repl(sheet: &mut Sheet) -> Result<(), CliError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        match sheet_ops::parse_line(&line) {
            Ok(Command::Noop) => continue,
            Ok(cmd) => {
                if let Err(e) = sheet_ops::run(sheet, cmd, stdout.lock()) {
                    eprintln!("error: {e}");
                }
            }
            Err(msg) => eprintln!("error: {msg}"),
        }
    }
    Ok(())
}

fn parse_cell(label: &str) -> Result<Position, CliError> {
    Position::parse(label).map_err(|_| CliError::Usage(format!("invalid cell label '{label}'")))
}
