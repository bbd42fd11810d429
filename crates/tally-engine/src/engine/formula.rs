//! Formula parsing into signed terms.
//!
//! A formula is `=` followed by terms joined with `+` or `-`. Each term is an
//! integer literal, a cell reference (`B2`) or a range (`A1:C3`). Ranges are
//! expanded here, so later stages only ever see literals and single cells.
//!
//! ```
//! use tally_engine::engine::{parse_formula, CellRef, Operand, Sign};
//!
//! let terms = parse_formula("=A1:B1-10").unwrap();
//! assert_eq!(terms.len(), 3);
//! assert_eq!(terms[1].operand, Operand::Cell(CellRef::new(1, 0)));
//! assert_eq!(terms[2].sign, Sign::Minus);
//! ```

use thiserror::Error;

use super::cell_ref::{CellRef, CellRefError};

/// Upper bound on the number of cells a single range may expand to.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Formula must start with '=': {0:?}")]
    MissingMarker(String),

    #[error("Formula has no terms")]
    EmptyFormula,

    #[error("Empty term at offset {offset}")]
    EmptyTerm { offset: usize },

    #[error("Integer literal out of range: {0}")]
    InvalidLiteral(String),

    #[error("Invalid reference {token:?}: {source}")]
    InvalidReference {
        token: String,
        #[source]
        source: CellRefError,
    },

    #[error("Malformed range: {0:?}")]
    MalformedRange(String),

    #[error("Range must run from top-left to bottom-right: {0}")]
    ReversedRange(String),

    #[error("Range {range} covers {cells} cells (limit {MAX_RANGE_CELLS})")]
    RangeTooLarge { range: String, cells: usize },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Apply this sign to a running total.
    pub fn accumulate(self, total: i64, value: i64) -> i64 {
        match self {
            Sign::Plus => total.wrapping_add(value),
            Sign::Minus => total.wrapping_sub(value),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    Literal(i64),
    Cell(CellRef),
}

/// One signed literal or cell reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Term {
    pub sign: Sign,
    pub operand: Operand,
}

impl Term {
    pub fn literal(sign: Sign, value: i64) -> Self {
        Term {
            sign,
            operand: Operand::Literal(value),
        }
    }

    pub fn cell(sign: Sign, cell: CellRef) -> Self {
        Term {
            sign,
            operand: Operand::Cell(cell),
        }
    }

    /// The referenced cell, if this is not a literal.
    pub fn cell_ref(&self) -> Option<CellRef> {
        match self.operand {
            Operand::Cell(cell) => Some(cell),
            Operand::Literal(_) => None,
        }
    }
}

/// Parse formula text (including the leading `=`) into terms.
///
/// Terms come out in source order; a range contributes its cells row-major,
/// each carrying the range's sign.
pub fn parse_formula(text: &str) -> Result<Vec<Term>, ParseError> {
    let trimmed = text.trim_start();
    let body = trimmed
        .strip_prefix('=')
        .ok_or_else(|| ParseError::MissingMarker(text.to_string()))?;
    // Offsets are reported relative to the text as given.
    let base = text.len() - trimmed.len() + 1;

    let mut segments = split_terms(body);

    // A sign before the first term (`=-A1`) leaves an empty leading segment.
    if segments.len() > 1 && segments[0].text.trim().is_empty() {
        segments.remove(0);
    }
    if segments.len() == 1 && segments[0].text.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    let mut terms = Vec::with_capacity(segments.len());
    for segment in segments {
        let token = segment.text.trim();
        if token.is_empty() {
            return Err(ParseError::EmptyTerm {
                offset: base + segment.offset,
            });
        }
        push_token(&mut terms, segment.sign, token)?;
    }
    Ok(terms)
}

struct Segment<'a> {
    sign: Sign,
    offset: usize,
    text: &'a str,
}

/// Split on every `+`/`-`. References never contain either character.
fn split_terms(body: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut sign = Sign::Plus;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        let next_sign = match ch {
            '+' => Sign::Plus,
            '-' => Sign::Minus,
            _ => continue,
        };
        segments.push(Segment {
            sign,
            offset: start,
            text: &body[start..i],
        });
        sign = next_sign;
        start = i + 1;
    }

    segments.push(Segment {
        sign,
        offset: start,
        text: &body[start..],
    });
    segments
}

/// Classify a token: integer literal, then range, then single cell.
fn push_token(terms: &mut Vec<Term>, sign: Sign, token: &str) -> Result<(), ParseError> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        let value = token
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidLiteral(token.to_string()))?;
        terms.push(Term::literal(sign, value));
        return Ok(());
    }

    if token.contains(':') {
        let (start, end) = parse_range(token)?;
        for row in start.row..=end.row {
            for col in start.col..=end.col {
                terms.push(Term::cell(sign, CellRef::new(col, row)));
            }
        }
        return Ok(());
    }

    terms.push(Term::cell(sign, resolve(token)?));
    Ok(())
}

/// Parse a range like "A1:B5" into its (top-left, bottom-right) corners.
fn parse_range(token: &str) -> Result<(CellRef, CellRef), ParseError> {
    let mut parts = token.split(':');
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::MalformedRange(token.to_string()));
    };
    let start = resolve(first)?;
    let end = resolve(second)?;

    if start.row > end.row || start.col > end.col {
        return Err(ParseError::ReversedRange(token.to_string()));
    }

    let rows = end.row - start.row + 1;
    let cols = end.col - start.col + 1;
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_RANGE_CELLS => Ok((start, end)),
        cells => Err(ParseError::RangeTooLarge {
            range: token.to_string(),
            cells: cells.unwrap_or(usize::MAX),
        }),
    }
}

fn resolve(token: &str) -> Result<CellRef, ParseError> {
    CellRef::from_str(token).map_err(|source| ParseError::InvalidReference {
        token: token.trim().to_string(),
        source,
    })
}
