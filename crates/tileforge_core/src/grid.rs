//! Grid storage abstraction
//!
//! Two backing stores implement [`Grid`]: [`DenseGrid`] (growable anchored
//! 2D array) and [`SparseGrid`] (hash map keyed by position). Both share one
//! presence semantic: `try_get` answers `Some` only for a live, non-empty
//! cell. A dense grid maps its stored default cells to `None`; a sparse grid
//! never stores empty cells in the first place.

use crate::cell::Cell;
use crate::dense::DenseGrid;
use crate::geom::{GridPos, GridRect};
use crate::sparse::SparseGrid;

/// Storage for a 2D field of cells addressed by signed coordinates.
pub trait Grid {
    /// Bounding rectangle of the grid's content. Dense grids report every
    /// position ever addressed; sparse grids report the span of live cells.
    fn rect(&self) -> GridRect;

    /// The live cell at `pos`, or `None` when the position is empty or
    /// outside the grid.
    fn try_get(&self, pos: GridPos) -> Option<&Cell>;

    /// Store `cell` at `pos`, growing or shrinking backing storage as the
    /// implementation requires.
    fn set(&mut self, pos: GridPos, cell: Cell);

    /// Iterate live cells in row-major order (increasing x within each row,
    /// rows by increasing y). Only positions inside `rect()` are visited.
    fn cells(&self) -> Box<dyn Iterator<Item = (GridPos, &Cell)> + '_>;

    /// The cell at `pos` by value; the empty cell when absent.
    fn get(&self, pos: GridPos) -> Cell {
        self.try_get(pos).cloned().unwrap_or_default()
    }

    /// Positions of all live cells, in iteration order.
    fn positions(&self) -> Vec<GridPos> {
        self.cells().map(|(pos, _)| pos).collect()
    }

    /// Number of live cells.
    fn len(&self) -> usize {
        self.cells().count()
    }

    fn is_empty(&self) -> bool {
        self.cells().next().is_none()
    }
}

/// The backing store used by one layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GridStorage {
    Dense(DenseGrid),
    Sparse(SparseGrid),
}

impl GridStorage {
    /// The default store for level layers.
    pub fn sparse() -> Self {
        GridStorage::Sparse(SparseGrid::new())
    }

    pub fn dense() -> Self {
        GridStorage::Dense(DenseGrid::new())
    }
}

impl Default for GridStorage {
    fn default() -> Self {
        GridStorage::sparse()
    }
}

impl Grid for GridStorage {
    fn rect(&self) -> GridRect {
        match self {
            GridStorage::Dense(grid) => grid.rect(),
            GridStorage::Sparse(grid) => grid.rect(),
        }
    }

    fn try_get(&self, pos: GridPos) -> Option<&Cell> {
        match self {
            GridStorage::Dense(grid) => grid.try_get(pos),
            GridStorage::Sparse(grid) => grid.try_get(pos),
        }
    }

    fn set(&mut self, pos: GridPos, cell: Cell) {
        match self {
            GridStorage::Dense(grid) => grid.set(pos, cell),
            GridStorage::Sparse(grid) => grid.set(pos, cell),
        }
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (GridPos, &Cell)> + '_> {
        match self {
            GridStorage::Dense(grid) => grid.cells(),
            GridStorage::Sparse(grid) => grid.cells(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ContentRef;
    use uuid::Uuid;

    fn tile() -> Cell {
        Cell::with_content(ContentRef(Uuid::new_v4()))
    }

    #[test]
    fn test_presence_semantic_matches_across_kinds() {
        let pos = GridPos::new(3, 4);
        for mut storage in [GridStorage::dense(), GridStorage::sparse()] {
            let cell = tile();
            storage.set(pos, cell.clone());
            assert_eq!(storage.try_get(pos), Some(&cell));

            storage.set(pos, Cell::empty());
            assert_eq!(storage.try_get(pos), None, "empty cell must read as absent");
            assert_eq!(storage.get(pos), Cell::empty());
        }
    }

    #[test]
    fn test_iteration_is_row_major_for_both_kinds() {
        let spots = [GridPos::new(2, 0), GridPos::new(0, 1), GridPos::new(1, 0)];
        for mut storage in [GridStorage::dense(), GridStorage::sparse()] {
            for pos in spots {
                storage.set(pos, tile());
            }
            let order = storage.positions();
            assert_eq!(
                order,
                vec![GridPos::new(1, 0), GridPos::new(2, 0), GridPos::new(0, 1)]
            );
        }
    }
}
