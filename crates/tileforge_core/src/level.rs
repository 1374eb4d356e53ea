//! The level aggregate: an ordered stack of layers plus layer metadata

use crate::cell::Cell;
use crate::error::LevelError;
use crate::geom::{GridPos, GridRect};
use crate::grid::{Grid, GridStorage};
use crate::metadata::Metadata;

/// A complete level: an ordered list of layers (index = layer id), a parallel
/// metadata bag per layer, and a cached union of all layer rects.
///
/// The layer list only grows. Deleting a layer's content empties its grid but
/// keeps the slot, so layer ids stay stable for the lifetime of the level.
///
/// A level is created empty on editor load, mutated exclusively through the
/// projector, and replaced wholesale when a different save file is opened.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    layers: Vec<GridStorage>,
    layer_meta: Vec<Metadata>,
    bounds: GridRect,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Grow the layer list so `layer` is a valid index, returning it as
    /// `usize`. A negative id is rejected with no mutation.
    pub fn ensure_layer(&mut self, layer: i32) -> Result<usize, LevelError> {
        if layer < 0 {
            return Err(LevelError::InvalidLayer(layer));
        }
        let index = layer as usize;
        while self.layers.len() <= index {
            self.layers.push(GridStorage::sparse());
            self.layer_meta.push(Metadata::new());
        }
        Ok(index)
    }

    /// Store `cell` at `pos` on `layer`.
    ///
    /// Does not validate `layer` or refresh the cached bounds; this is the
    /// hot path for batch writes. Callers run [`Level::ensure_layer`] first
    /// and [`Level::recompute_bounds`] once per batch.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= layer_count()`.
    pub fn set_cell(&mut self, pos: GridPos, cell: Cell, layer: usize) {
        self.layers[layer].set(pos, cell);
    }

    /// The cell at `pos` on `layer` by value. A missing layer or an empty
    /// position both read as the empty cell.
    pub fn cell_at(&self, pos: GridPos, layer: usize) -> Cell {
        self.layers
            .get(layer)
            .map(|grid| grid.get(pos))
            .unwrap_or_default()
    }

    /// The live cell at `pos` on `layer`, if any.
    pub fn try_cell(&self, pos: GridPos, layer: usize) -> Option<&Cell> {
        self.layers.get(layer)?.try_get(pos)
    }

    /// Scan layers in increasing index order and return the first live cell
    /// at `pos`, with its layer index.
    pub fn query_topmost(&self, pos: GridPos) -> Option<(usize, &Cell)> {
        self.layers
            .iter()
            .enumerate()
            .find_map(|(index, grid)| grid.try_get(pos).map(|cell| (index, cell)))
    }

    pub fn layer(&self, layer: usize) -> Option<&GridStorage> {
        self.layers.get(layer)
    }

    /// Metadata bag of `layer`; `None` when the layer does not exist.
    pub fn metadata(&self, layer: usize) -> Option<&Metadata> {
        self.layer_meta.get(layer)
    }

    /// Mutable metadata bag of `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= layer_count()`; run [`Level::ensure_layer`] first.
    pub fn metadata_mut(&mut self, layer: usize) -> &mut Metadata {
        &mut self.layer_meta[layer]
    }

    /// Cached union of all layer rects, as of the last
    /// [`Level::recompute_bounds`].
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    /// Recompute the cached bounds from every layer. O(total live cells);
    /// call once after a batch of writes, not per write.
    pub fn recompute_bounds(&mut self) {
        self.bounds = self
            .layers
            .iter()
            .fold(GridRect::EMPTY, |rect, grid| rect.union(&grid.rect()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ContentRef;
    use crate::metadata::{MetadataEntry, MotionPath};
    use uuid::Uuid;

    fn tile() -> Cell {
        Cell::with_content(ContentRef(Uuid::new_v4()))
    }

    #[test]
    fn test_ensure_layer_grows_to_requested_id() {
        let mut level = Level::new();
        assert_eq!(level.ensure_layer(2), Ok(2));
        assert_eq!(level.layer_count(), 3);

        // Ensuring a lower id never shrinks the list.
        assert_eq!(level.ensure_layer(0), Ok(0));
        assert_eq!(level.layer_count(), 3);
    }

    #[test]
    fn test_negative_layer_is_rejected_without_mutation() {
        let mut level = Level::new();
        assert_eq!(level.ensure_layer(-1), Err(LevelError::InvalidLayer(-1)));
        assert_eq!(level.layer_count(), 0);
    }

    #[test]
    fn test_out_of_range_layer_reads_empty() {
        let level = Level::new();
        assert_eq!(level.cell_at(GridPos::new(0, 0), 7), Cell::empty());
        assert_eq!(level.try_cell(GridPos::new(0, 0), 7), None);
    }

    #[test]
    fn test_query_topmost_prefers_lowest_index() {
        let mut level = Level::new();
        level.ensure_layer(1).unwrap();
        let back = tile();
        let front = tile();
        level.set_cell(GridPos::new(3, 3), back.clone(), 0);
        level.set_cell(GridPos::new(3, 3), front.clone(), 1);

        assert_eq!(level.query_topmost(GridPos::new(3, 3)), Some((0, &back)));

        level.set_cell(GridPos::new(3, 3), Cell::empty(), 0);
        assert_eq!(level.query_topmost(GridPos::new(3, 3)), Some((1, &front)));
    }

    #[test]
    fn test_bounds_union_across_layers() {
        let mut level = Level::new();
        level.ensure_layer(1).unwrap();
        level.set_cell(GridPos::new(-4, 0), tile(), 0);
        level.set_cell(GridPos::new(9, 6), tile(), 1);

        assert_eq!(level.bounds(), GridRect::EMPTY, "bounds are not incremental");
        level.recompute_bounds();
        assert_eq!(
            level.bounds(),
            GridRect::spanning(GridPos::new(-4, 0), GridPos::new(9, 6))
        );
    }

    #[test]
    fn test_layer_metadata_storage() {
        let mut level = Level::new();
        level.ensure_layer(0).unwrap();
        level.metadata_mut(0).set(MetadataEntry::Path(MotionPath {
            points: vec![GridPos::new(0, 0), GridPos::new(5, 0)],
            speed: 1.0,
            looped: false,
        }));

        assert!(level.metadata(0).unwrap().path().is_some());
        assert!(level.metadata(1).is_none());
    }
}
