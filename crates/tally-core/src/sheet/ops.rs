use super::Sheet;
use crate::error::{Result, TallyError};
use log::{debug, trace};
use tally_engine::engine::{Cell, CellRef, Formula, evaluate};

impl Sheet {
    /// Set a cell from raw input and recompute everything that depends on it.
    ///
    /// Input that parses as an integer becomes a literal; anything else must
    /// be a formula starting with `=`. Blank input is treated as `0`.
    ///
    /// Either the whole change is applied (the cell and all of its transitive
    /// dependents are up to date) or nothing is: on error the sheet is left
    /// exactly as it was.
    pub fn set_cell_value(&mut self, cell_id: &str, raw: &str) -> Result<()> {
        let cell_ref = self.resolve(cell_id)?;
        let raw = if raw.trim().is_empty() { "0" } else { raw };
        let mut cell = self.parse_input(raw)?;
        let idx = self.dims.index_of(&cell_ref);

        // Swap the old formula's edges for the new one's.
        if let Some(old) = self.cells[idx].formula() {
            self.graph.remove_dependencies(cell_ref, old.terms());
        }
        if let Some(new) = cell.formula() {
            self.graph.add_dependencies(cell_ref, new.terms());
        }

        let order = match self.graph.transitive_dependents(cell_ref) {
            Ok(order) => order,
            Err(cycle) => {
                if let Some(new) = cell.formula() {
                    self.graph.remove_dependencies(cell_ref, new.terms());
                }
                if let Some(old) = self.cells[idx].formula() {
                    self.graph.add_dependencies(cell_ref, old.terms());
                }
                debug!("rejected {cell_ref} = {raw:?}: {cycle}");
                return Err(TallyError::CycleDetected { cell: cell_ref });
            }
        };

        // The new formula cannot read anything in `order` (that would be a
        // cycle), so current values are already final for it.
        if let Cell::Formula { formula, value } = &mut cell {
            *value = evaluate(formula.terms(), |c| self.lookup(c));
        }
        self.cells[idx] = cell;

        for dependent in &order {
            self.recompute(*dependent);
        }

        debug!(
            "set {cell_ref} to {} {raw:?}, recomputed {} dependents",
            if self.cells[idx].formula().is_some() { "formula" } else { "literal" },
            order.len()
        );
        Ok(())
    }

    /// Turn raw input into cell contents without touching the sheet.
    ///
    /// Formula references outside the sheet are rejected here so that no
    /// edge is ever recorded for a cell that does not exist.
    fn parse_input(&self, raw: &str) -> Result<Cell> {
        if let Ok(value) = raw.trim().parse::<i64>() {
            return Ok(Cell::Literal(value));
        }

        let formula = Formula::parse(raw)?;
        for referenced in formula.references() {
            self.check_bounds(referenced).inspect_err(|_| {
                debug!("rejected {raw:?}: {referenced} is outside the sheet");
            })?;
        }
        Ok(Cell::Formula { formula, value: 0 })
    }

    /// Re-evaluate one formula cell from the stored values of its inputs.
    fn recompute(&mut self, cell_ref: CellRef) {
        let idx = self.dims.index_of(&cell_ref);
        let Some(formula) = self.cells[idx].formula() else {
            return;
        };
        let new_value = evaluate(formula.terms(), |c| self.lookup(c));
        if let Cell::Formula { value, .. } = &mut self.cells[idx] {
            *value = new_value;
        }
        trace!("recomputed {cell_ref} = {new_value}");
    }
}
