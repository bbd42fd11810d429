//! Line-oriented command mode.
//!
//! ```text
//! set A1 10
//! set B1 =A1+A2:A4
//! get B1
//! formula B1
//! ```

use std::io::Write;

use tally_core::Sheet;

use crate::error::{AppError, Result};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set { cell: String, value: String },
    Get { cell: String },
    Formula { cell: String },
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<std::result::Result<Command, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (keyword, rest) = split_word(line);
    let (cell, rest) = split_word(rest);
    if cell.is_empty() {
        return Some(Err(format!("'{keyword}' needs a cell id")));
    }
    let cell = cell.to_string();

    let command = match keyword {
        "set" => Ok(Command::Set {
            cell,
            value: rest.to_string(),
        }),
        "get" | "formula" if !rest.is_empty() => {
            Err(format!("unexpected text after '{keyword} {cell}': {rest}"))
        }
        "get" => Ok(Command::Get { cell }),
        "formula" => Ok(Command::Formula { cell }),
        other => Err(format!("unknown command: {other}")),
    };
    Some(command)
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// Run commands against `sheet`, stopping at the first error.
pub fn run_commands<I, W>(sheet: &mut Sheet, lines: I, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = std::io::Result<String>>,
    W: Write,
{
    for (i, line) in lines.into_iter().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let command = match parse_line(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                return Err(AppError::Parse {
                    line: line_no,
                    message,
                });
            }
        };
        execute(sheet, &command, line_no, out)?;
    }
    Ok(())
}

fn execute<W: Write>(sheet: &mut Sheet, command: &Command, line: usize, out: &mut W) -> Result<()> {
    let at_line = |error| AppError::Sheet { line, error };
    match command {
        Command::Set { cell, value } => sheet.set_cell_value(cell, value).map_err(at_line)?,
        Command::Get { cell } => {
            let value = sheet.get_cell_value(cell).map_err(at_line)?;
            writeln!(out, "{value}")?;
        }
        Command::Formula { cell } => {
            let formula = sheet.get_cell_formula(cell).map_err(at_line)?;
            writeln!(out, "{}", formula.unwrap_or(""))?;
        }
    }
    Ok(())
}
