//! Cell contents.

use super::cell_ref::CellRef;
use super::formula::{ParseError, Term, parse_formula};

/// A parsed formula, keeping the raw text it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    source: String,
    terms: Vec<Term>,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let terms = parse_formula(source)?;
        Ok(Formula {
            source: source.to_string(),
            terms,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Every cell referenced by this formula, in term order (may repeat).
    pub fn references(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.terms.iter().filter_map(Term::cell_ref)
    }
}

/// A cell holds either a literal or a formula with its last computed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Literal(i64),
    Formula { formula: Formula, value: i64 },
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Literal(0)
    }
}

impl Cell {
    pub fn value(&self) -> i64 {
        match self {
            Cell::Literal(v) => *v,
            Cell::Formula { value, .. } => *value,
        }
    }

    pub fn formula(&self) -> Option<&Formula> {
        match self {
            Cell::Literal(_) => None,
            Cell::Formula { formula, .. } => Some(formula),
        }
    }
}
