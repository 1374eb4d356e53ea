//! Sparse grid: a hash map from position to cell

use std::collections::HashMap;

use crate::cell::Cell;
use crate::geom::{GridPos, GridRect};
use crate::grid::Grid;

/// A sparse grid holding only live cells.
///
/// Writing an empty cell deletes the key, so memory stays proportional to
/// live content rather than to the bounding extent. `rect()` is recomputed
/// from scratch over all live keys; batch writers should finish the batch
/// and read bounds once instead of calling it per cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseGrid {
    cells: HashMap<GridPos, Cell>,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Grid for SparseGrid {
    /// O(live cells). Returns [`GridRect::EMPTY`] when no cells are live.
    fn rect(&self) -> GridRect {
        self.cells
            .keys()
            .fold(GridRect::EMPTY, |rect, &pos| rect.expanded_to(pos))
    }

    fn try_get(&self, pos: GridPos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    fn set(&mut self, pos: GridPos, cell: Cell) {
        if cell.is_empty() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, cell);
        }
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (GridPos, &Cell)> + '_> {
        let mut live: Vec<(GridPos, &Cell)> =
            self.cells.iter().map(|(&pos, cell)| (pos, cell)).collect();
        live.sort_by_key(|(pos, _)| (pos.y, pos.x));
        Box::new(live.into_iter())
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
