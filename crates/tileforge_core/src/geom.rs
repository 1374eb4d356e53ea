//! Integer grid geometry: positions and bounding rectangles

use serde::{Deserialize, Serialize};

/// A position on the tile grid. Coordinates may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum
    pub fn min(self, other: GridPos) -> GridPos {
        GridPos::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum
    pub fn max(self, other: GridPos) -> GridPos {
        GridPos::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        GridPos::new(x, y)
    }
}

/// An axis-aligned rectangle of grid positions, anchored at `min` with a
/// non-negative `size`. A zero-area rectangle contains no positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub min: GridPos,
    pub size: (u32, u32),
}

impl GridRect {
    /// The degenerate rectangle: zero size at the origin. Returned by grids
    /// and levels that hold no content.
    pub const EMPTY: GridRect = GridRect {
        min: GridPos::new(0, 0),
        size: (0, 0),
    };

    pub const fn new(min: GridPos, size: (u32, u32)) -> Self {
        Self { min, size }
    }

    /// Build a rectangle spanning two corner positions, both inclusive.
    pub fn spanning(a: GridPos, b: GridPos) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            min,
            size: (
                (max.x - min.x) as u32 + 1,
                (max.y - min.y) as u32 + 1,
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.0 == 0 || self.size.1 == 0
    }

    /// Exclusive upper corner
    pub fn max(&self) -> GridPos {
        GridPos::new(
            self.min.x + self.size.0 as i32,
            self.min.y + self.size.1 as i32,
        )
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        let max = self.max();
        pos.x >= self.min.x && pos.y >= self.min.y && pos.x < max.x && pos.y < max.y
    }

    /// Smallest rectangle covering both `self` and `other`. The degenerate
    /// rectangle is the identity element.
    pub fn union(&self, other: &GridRect) -> GridRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let min = self.min.min(other.min);
        let a = self.max();
        let b = other.max();
        let max = a.max(b);
        GridRect {
            min,
            size: ((max.x - min.x) as u32, (max.y - min.y) as u32),
        }
    }

    /// Grow to include `pos`, treating the degenerate rectangle as "nothing
    /// yet" rather than as a point at the origin.
    pub fn expanded_to(&self, pos: GridPos) -> GridRect {
        self.union(&GridRect::new(pos, (1, 1)))
    }

    /// Iterate every position inside the rectangle in row-major order:
    /// increasing x within each row, rows by increasing y.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let min = self.min;
        let (w, h) = self.size;
        (0..h).flat_map(move |dy| {
            (0..w).map(move |dx| GridPos::new(min.x + dx as i32, min.y + dy as i32))
        })
    }
}

impl Default for GridRect {
    fn default() -> Self {
        GridRect::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanning_is_inclusive() {
        let rect = GridRect::spanning(GridPos::new(-5, -5), GridPos::new(10, 10));
        assert_eq!(rect.min, GridPos::new(-5, -5));
        assert_eq!(rect.size, (16, 16));
        assert!(rect.contains(GridPos::new(-5, -5)));
        assert!(rect.contains(GridPos::new(10, 10)));
        assert!(!rect.contains(GridPos::new(11, 10)));
    }

    #[test]
    fn test_union_identity() {
        let rect = GridRect::spanning(GridPos::new(2, 3), GridPos::new(4, 4));
        assert_eq!(GridRect::EMPTY.union(&rect), rect);
        assert_eq!(rect.union(&GridRect::EMPTY), rect);
        assert!(GridRect::EMPTY.union(&GridRect::EMPTY).is_empty());
    }

    #[test]
    fn test_expanded_to_from_empty() {
        let rect = GridRect::EMPTY.expanded_to(GridPos::new(7, -2));
        assert_eq!(rect, GridRect::new(GridPos::new(7, -2), (1, 1)));
    }

    #[test]
    fn test_positions_row_major() {
        let rect = GridRect::new(GridPos::new(1, 1), (2, 2));
        let positions: Vec<GridPos> = rect.positions().collect();
        assert_eq!(
            positions,
            vec![
                GridPos::new(1, 1),
                GridPos::new(2, 1),
                GridPos::new(1, 2),
                GridPos::new(2, 2),
            ]
        );
    }
}
