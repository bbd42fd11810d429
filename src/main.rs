//! Tally - a reactive integer spreadsheet driven by line commands

mod command;
mod config;
mod error;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tally_core::Sheet;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reactive integer spreadsheet (command mode)")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/tally/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns (at most 26)
    #[arg(long)]
    cols: Option<usize>,

    /// Command to run (can be repeated); stdin is read when none are given
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    commands: Vec<String>,

    /// Log mutations at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, warnings) = if cli.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(cli.config.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let default_filter = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("warn")
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let rows = cli.rows.unwrap_or(config.sheet.rows);
    let columns = cli.cols.unwrap_or(config.sheet.columns);
    let mut sheet = Sheet::new(rows, columns);
    log::debug!("created {:?} sheet", sheet.dimensions());

    match run(&mut sheet, cli.commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(sheet: &mut Sheet, commands: Vec<String>) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if commands.is_empty() {
        let stdin = io::stdin().lock();
        command::run_commands(sheet, stdin.lines(), &mut stdout)?;
    } else {
        command::run_commands(sheet, commands.into_iter().map(Ok), &mut stdout)?;
    }
    Ok(())
}
