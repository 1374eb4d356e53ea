//! Dense grid: a growable 2D array anchored at a movable minimum corner

use crate::cell::Cell;
use crate::geom::{GridPos, GridRect};
use crate::grid::Grid;

/// A dense grid backed by a column-major array of cells.
///
/// The backing array covers every position ever addressed through `set`, so
/// `rect()` spans the full addressed extent and reads inside it always find a
/// stored cell, possibly the empty default. Writes outside the current extent
/// trigger a bulk-copy resize; for geometrically growing access patterns the
/// copy cost amortizes to O(1) per write.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseGrid {
    min: GridPos,
    height: u32,
    /// `columns[x][y]`, both indices local to `min`
    columns: Vec<Vec<Cell>>,
}

impl DenseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize so the extent covers `target`, bulk-copying existing columns
    /// into the new array. Callers never observe a partial resize: the new
    /// array is built completely before it replaces the old one.
    fn grow_to(&mut self, target: GridPos) {
        let old_min = self.min;
        let old_max = self.rect().max();
        let new_min = old_min.min(target);
        let new_max = old_max.max(GridPos::new(target.x + 1, target.y + 1));
        let new_width = (new_max.x - new_min.x) as usize;
        let new_height = (new_max.y - new_min.y) as usize;

        let mut columns = vec![vec![Cell::empty(); new_height]; new_width];
        let column_offset = (old_min.x - new_min.x) as usize;
        let row_offset = (old_min.y - new_min.y) as usize;
        for (old_x, old_column) in self.columns.drain(..).enumerate() {
            let rows = &mut columns[column_offset + old_x];
            rows.splice(row_offset..row_offset + old_column.len(), old_column);
        }

        self.columns = columns;
        self.min = new_min;
        self.height = new_height as u32;
    }
}

impl Grid for DenseGrid {
    fn rect(&self) -> GridRect {
        if self.columns.is_empty() {
            GridRect::EMPTY
        } else {
            GridRect::new(self.min, (self.columns.len() as u32, self.height))
        }
    }

    fn try_get(&self, pos: GridPos) -> Option<&Cell> {
        if !self.rect().contains(pos) {
            return None;
        }
        let cell = &self.columns[(pos.x - self.min.x) as usize][(pos.y - self.min.y) as usize];
        if cell.is_empty() {
            None
        } else {
            Some(cell)
        }
    }

    fn set(&mut self, pos: GridPos, cell: Cell) {
        if self.columns.is_empty() {
            self.min = pos;
            self.height = 1;
            self.columns = vec![vec![cell]];
            return;
        }
        if !self.rect().contains(pos) {
            self.grow_to(pos);
        }
        self.columns[(pos.x - self.min.x) as usize][(pos.y - self.min.y) as usize] = cell;
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (GridPos, &Cell)> + '_> {
        let min = self.min;
        Box::new((0..self.height as i32).flat_map(move |dy| {
            self.columns.iter().enumerate().filter_map(move |(dx, column)| {
                let cell = &column[dy as usize];
                if cell.is_empty() {
                    None
                } else {
                    Some((GridPos::new(min.x + dx as i32, min.y + dy), cell))
                }
            })
        }))
    }
}
