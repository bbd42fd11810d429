use crate::error::{Result, TallyError};
use tally_engine::engine::{Cell, CellRef, DepGraph, Dimensions};

/// An in-memory sheet of integer cells.
///
/// Cells are stored row-major in a flat arena sized once at construction.
/// Every cell starts as the literal `0`; cells are never removed, only
/// overwritten through [`Sheet::set_cell_value`].
#[derive(Clone, Debug)]
pub struct Sheet {
    pub(crate) dims: Dimensions,
    pub(crate) cells: Vec<Cell>,
    /// Reverse dependency map: cell -> formula cells that read it
    pub(crate) graph: DepGraph,
}

impl Sheet {
    /// Create a sheet with `rows` rows and `columns` columns.
    ///
    /// `columns` is clamped to 26 (`A` through `Z`).
    pub fn new(rows: usize, columns: usize) -> Self {
        let dims = Dimensions::new(rows, columns);
        Sheet {
            dims,
            cells: vec![Cell::default(); dims.cell_count()],
            graph: DepGraph::new(dims),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Current value of a cell.
    pub fn get_cell_value(&self, cell_id: &str) -> Result<i64> {
        let cell = self.resolve(cell_id)?;
        Ok(self.cell(&cell).value())
    }

    /// Raw formula text of a cell, or `None` if it holds a literal.
    pub fn get_cell_formula(&self, cell_id: &str) -> Result<Option<&str>> {
        let cell = self.resolve(cell_id)?;
        Ok(self.cell(&cell).formula().map(|f| f.source()))
    }

    /// Cells whose formula directly references `cell_id`, row-major.
    pub fn dependents_of(&self, cell_id: &str) -> Result<Vec<CellRef>> {
        let cell = self.resolve(cell_id)?;
        Ok(self.graph.dependents(cell).collect())
    }

    /// Parse a cell id and check it against the sheet's dimensions.
    pub(crate) fn resolve(&self, cell_id: &str) -> Result<CellRef> {
        let cell = CellRef::from_str(cell_id)?;
        self.check_bounds(cell)?;
        Ok(cell)
    }

    pub(crate) fn check_bounds(&self, cell: CellRef) -> Result<()> {
        if self.dims.contains(&cell) {
            Ok(())
        } else {
            Err(TallyError::OutOfBounds {
                cell,
                rows: self.dims.rows,
                columns: self.dims.columns,
            })
        }
    }

    /// Cell at an in-bounds position.
    pub(crate) fn cell(&self, cell: &CellRef) -> &Cell {
        &self.cells[self.dims.index_of(cell)]
    }

    /// Stored value used as the evaluator's lookup. Out-of-sheet cells read 0.
    pub(crate) fn lookup(&self, cell: &CellRef) -> i64 {
        if self.dims.contains(cell) {
            self.cell(cell).value()
        } else {
            0
        }
    }
}
