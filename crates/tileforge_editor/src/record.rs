//! Reversible change records
//!
//! Every edit to a level is described by one [`ChangeRecord`]: an immutable
//! value carrying enough data to apply the edit forward and, via
//! [`ChangeRecord::reverted`], to produce its exact inverse. Records hold
//! only coordinates and cell values, never references into the live level,
//! so replay is deterministic and history could be persisted as-is.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tileforge_core::{Cell, GridPos, MetadataEntry, Value};

/// One reversible edit. `apply(apply(S, r), r.reverted())` restores `S` for
/// every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeRecord {
    /// Batch of per-cell tile edits on one layer
    Tiles(TileChange),
    /// Add or remove one layer-scoped metadata entry
    LayerMeta(LayerMetadataChange),
    /// Edit of a single field inside a layer's motion path
    Field(FieldChange),
    /// Ordered group of records that undo/redo as one unit
    Bundle(Bundle),
}

impl ChangeRecord {
    /// Human-readable label shown in the edit history.
    pub fn description(&self) -> &str {
        match self {
            ChangeRecord::Tiles(change) => &change.description,
            ChangeRecord::LayerMeta(change) => &change.description,
            ChangeRecord::Field(change) => &change.description,
            ChangeRecord::Bundle(bundle) => &bundle.description,
        }
    }

    /// The inverse record: same variant, inverted payload.
    pub fn reverted(&self) -> ChangeRecord {
        match self {
            ChangeRecord::Tiles(change) => ChangeRecord::Tiles(TileChange {
                description: change.description.clone(),
                layer: change.layer,
                positions: change.positions.clone(),
                previous: change.next.clone(),
                next: change.previous.clone(),
            }),
            ChangeRecord::LayerMeta(change) => ChangeRecord::LayerMeta(LayerMetadataChange {
                description: change.description.clone(),
                layer: change.layer,
                entry: change.entry.clone(),
                op: change.op.flipped(),
            }),
            ChangeRecord::Field(change) => ChangeRecord::Field(FieldChange {
                description: change.description.clone(),
                layer: change.layer,
                field: change.field,
                previous: change.next.clone(),
                next: change.previous.clone(),
            }),
            ChangeRecord::Bundle(bundle) => ChangeRecord::Bundle(Bundle {
                description: bundle.description.clone(),
                items: bundle.items.iter().rev().map(ChangeRecord::reverted).collect(),
            }),
        }
    }
}

/// Batch tile edit: parallel position/cell arrays, matched 1:1 by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileChange {
    pub description: String,
    pub layer: i32,
    pub positions: Vec<GridPos>,
    /// Cell values before the edit, one per position
    pub previous: Vec<Cell>,
    /// Cell values after the edit, one per position
    pub next: Vec<Cell>,
}

impl TileChange {
    /// Create a batch tile change. The three arrays must be equal length.
    pub fn new(
        layer: i32,
        positions: Vec<GridPos>,
        previous: Vec<Cell>,
        next: Vec<Cell>,
        description: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(positions.len(), previous.len());
        debug_assert_eq!(positions.len(), next.len());
        Self {
            description: description.into(),
            layer,
            positions,
            previous,
            next,
        }
    }

    /// Build from before/after snapshots, keeping only cells that changed.
    pub fn from_diff(
        layer: i32,
        before: HashMap<GridPos, Cell>,
        after: HashMap<GridPos, Cell>,
        description: impl Into<String>,
    ) -> Self {
        let mut positions = Vec::new();
        let mut previous = Vec::new();
        let mut next = Vec::new();
        for (pos, old_cell) in before {
            let new_cell = after.get(&pos).cloned().unwrap_or_default();
            if old_cell != new_cell {
                positions.push(pos);
                previous.push(old_cell);
                next.push(new_cell);
            }
        }
        Self::new(layer, positions, previous, next, description)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Whether a metadata change adds or removes its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataOp {
    Add,
    Remove,
}

impl MetadataOp {
    pub fn flipped(self) -> MetadataOp {
        match self {
            MetadataOp::Add => MetadataOp::Remove,
            MetadataOp::Remove => MetadataOp::Add,
        }
    }
}

/// Add or remove one metadata entry on a layer. The full entry value is
/// carried either way, so the record reverts without consulting the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMetadataChange {
    pub description: String,
    pub layer: i32,
    pub entry: MetadataEntry,
    pub op: MetadataOp,
}

/// Which field of a layer's motion path a [`FieldChange`] edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathField {
    Speed,
    Looped,
    /// One point of the path, by index
    Point(usize),
}

/// Edit of a single field of a path object stored in layer metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub description: String,
    pub layer: i32,
    pub field: PathField,
    pub previous: Value,
    pub next: Value,
}

/// An ordered group of records applied and reverted atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub description: String,
    pub items: Vec<ChangeRecord>,
}
