//! Dependency graph over formula cells.
//!
//! Edges point from a referenced cell to the formula cells that read it:
//!
//! ```text
//! A1 → B1  means  "B1's formula references A1"
//! ```
//!
//! so "what must be recomputed if A1 changes?" is a walk along outgoing
//! edges. Cells live in a row-major arena and are keyed by index.

use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use super::cell_ref::{CellRef, Dimensions};
use super::formula::Term;

/// A formula cycle was found while walking dependents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected at {cell}")]
pub struct CycleError {
    /// The cell that was reached again while still on the traversal path.
    pub cell: CellRef,
}

#[derive(Clone, Copy)]
enum Mark {
    InProgress,
    Done,
}

/// Dependents of every cell in a fixed-size sheet.
///
/// Invariant: `b` is in `dependents[a]` iff the formula installed in `b`
/// references `a`. Callers keep this true by removing a formula's edges
/// before replacing it.
#[derive(Clone, Debug)]
pub struct DepGraph {
    dims: Dimensions,
    dependents: Vec<BTreeSet<usize>>,
}

impl DepGraph {
    pub fn new(dims: Dimensions) -> Self {
        DepGraph {
            dims,
            dependents: vec![BTreeSet::new(); dims.cell_count()],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Record `owner` as a dependent of every cell its terms reference.
    ///
    /// References outside the sheet have no slot and are skipped; callers
    /// reject such formulas before installing them.
    pub fn add_dependencies(&mut self, owner: CellRef, terms: &[Term]) {
        let owner = self.dims.index_of(&owner);
        for idx in referenced_indices(self.dims, terms) {
            self.dependents[idx].insert(owner);
        }
    }

    /// Remove the edges added for `terms`. Must be given the terms of the
    /// formula currently installed in `owner`.
    pub fn remove_dependencies(&mut self, owner: CellRef, terms: &[Term]) {
        let owner = self.dims.index_of(&owner);
        for idx in referenced_indices(self.dims, terms) {
            self.dependents[idx].remove(&owner);
        }
    }

    /// Direct dependents of `cell`, in row-major order.
    pub fn dependents(&self, cell: CellRef) -> impl Iterator<Item = CellRef> + '_ {
        let dims = self.dims;
        self.dependents
            .get(dims.index_of(&cell))
            .into_iter()
            .flat_map(move |set| set.iter().map(move |&idx| dims.cell_at(idx)))
    }

    /// Every cell reachable from `start`, excluding `start`, each exactly once,
    /// ordered so that a cell comes after every cell it reads from.
    ///
    /// Depth-first with in-progress marks; the reverse post-order of the walk
    /// is a topological order of the reachable subgraph. Reaching a cell that
    /// is still in progress (including `start` itself) is a cycle.
    pub fn transitive_dependents(&self, start: CellRef) -> Result<Vec<CellRef>, CycleError> {
        let start = self.dims.index_of(&start);
        let mut marks: HashMap<usize, Mark> = HashMap::new();
        let mut post_order = Vec::new();

        marks.insert(start, Mark::InProgress);
        let mut stack = vec![(start, self.dependents[start].iter())];

        while let Some((node, children)) = stack.last_mut() {
            let node = *node;
            match children.next().copied() {
                Some(child) => match marks.get(&child).copied() {
                    Some(Mark::InProgress) => {
                        return Err(CycleError {
                            cell: self.dims.cell_at(child),
                        });
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child, Mark::InProgress);
                        stack.push((child, self.dependents[child].iter()));
                    }
                },
                None => {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    if node != start {
                        post_order.push(self.dims.cell_at(node));
                    }
                }
            }
        }

        post_order.reverse();
        Ok(post_order)
    }
}

fn referenced_indices(dims: Dimensions, terms: &[Term]) -> impl Iterator<Item = usize> + '_ {
    terms
        .iter()
        .filter_map(Term::cell_ref)
        .filter(move |cell| dims.contains(cell))
        .map(move |cell| dims.index_of(&cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_formula;

    fn cell(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn graph() -> DepGraph {
        DepGraph::new(Dimensions::new(5, 5))
    }

    fn install(graph: &mut DepGraph, owner: &str, formula: &str) {
        graph.add_dependencies(cell(owner), &parse_formula(formula).unwrap());
    }

    fn position(order: &[CellRef], name: &str) -> usize {
        order.iter().position(|c| *c == cell(name)).unwrap()
    }

    #[test]
    fn test_add_dependencies_records_each_reference_once() {
        let mut g = graph();
        install(&mut g, "C1", "=A1+A1+B1:B2");

        assert_eq!(g.dependents(cell("A1")).collect::<Vec<_>>(), vec![cell("C1")]);
        assert_eq!(g.dependents(cell("B2")).collect::<Vec<_>>(), vec![cell("C1")]);
        assert_eq!(g.dependents(cell("C1")).count(), 0);
    }

    #[test]
    fn test_remove_dependencies_leaves_other_owners() {
        let mut g = graph();
        install(&mut g, "B1", "=A1");
        install(&mut g, "C1", "=A1");

        g.remove_dependencies(cell("B1"), &parse_formula("=A1").unwrap());
        assert_eq!(g.dependents(cell("A1")).collect::<Vec<_>>(), vec![cell("C1")]);
    }

    #[test]
    fn test_out_of_sheet_references_are_skipped() {
        let mut g = graph();
        install(&mut g, "A1", "=Z9+B1");
        assert_eq!(g.dependents(cell("B1")).collect::<Vec<_>>(), vec![cell("A1")]);
    }

    #[test]
    fn test_transitive_follows_chain() {
        // B1 = A1, C1 = B1, D1 = C1
        let mut g = graph();
        install(&mut g, "B1", "=A1");
        install(&mut g, "C1", "=B1");
        install(&mut g, "D1", "=C1");

        let order = g.transitive_dependents(cell("A1")).unwrap();
        assert_eq!(order, vec![cell("B1"), cell("C1"), cell("D1")]);
    }

    #[test]
    fn test_transitive_diamond_visits_once_in_order() {
        // B1 = A1, C1 = A1, D1 = B1 + C1, E1 = D1 + A1
        let mut g = graph();
        install(&mut g, "B1", "=A1");
        install(&mut g, "C1", "=A1");
        install(&mut g, "D1", "=B1+C1");
        install(&mut g, "E1", "=D1+A1");

        let order = g.transitive_dependents(cell("A1")).unwrap();
        assert_eq!(order.len(), 4);
        assert!(position(&order, "B1") < position(&order, "D1"));
        assert!(position(&order, "C1") < position(&order, "D1"));
        assert!(position(&order, "D1") < position(&order, "E1"));
    }

    #[test]
    fn test_transitive_of_unreferenced_cell_is_empty() {
        let mut g = graph();
        install(&mut g, "B1", "=A1");
        assert!(g.transitive_dependents(cell("B1")).unwrap().is_empty());
    }

    #[test]
    fn test_two_cell_cycle_is_detected() {
        let mut g = graph();
        install(&mut g, "A1", "=B1");
        install(&mut g, "B1", "=A1");
        assert!(g.transitive_dependents(cell("B1")).is_err());
    }

    #[test]
    fn test_self_reference_is_detected() {
        let mut g = graph();
        install(&mut g, "A1", "=A1+1");
        assert_eq!(
            g.transitive_dependents(cell("A1")),
            Err(CycleError { cell: cell("A1") })
        );
    }

    #[test]
    fn test_indirect_cycle_is_detected() {
        // B1 = A1, C1 = B1, A1 = C1
        let mut g = graph();
        install(&mut g, "B1", "=A1");
        install(&mut g, "C1", "=B1");
        install(&mut g, "A1", "=C1");
        for start in ["A1", "B1", "C1"] {
            assert!(g.transitive_dependents(cell(start)).is_err());
        }
    }

    #[test]
    fn test_cycle_downstream_of_start_is_found() {
        // B1 = A1 + C1, C1 = B1: cycle not through A1 but reachable from it.
        let mut g = graph();
        install(&mut g, "B1", "=A1+C1");
        install(&mut g, "C1", "=B1");
        assert!(g.transitive_dependents(cell("A1")).is_err());
    }
}
