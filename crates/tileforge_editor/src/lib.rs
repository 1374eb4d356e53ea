//! Editing model for tileforge levels
//!
//! Levels are mutated exclusively through reversible [`ChangeRecord`]s sent
//! through the [`Projector`], which applies each record, notifies observers,
//! and maintains the undo/redo [`ChangeLog`]. This gives every edit path
//! undo/redo, atomic multi-step bundles, and dirty-state tracking for free.

mod log;
mod projector;
mod record;

pub use log::{ChangeLog, LogState};
pub use projector::{point_to_value, EditObserver, Projector};
pub use record::{
    Bundle, ChangeRecord, FieldChange, LayerMetadataChange, MetadataOp, PathField, TileChange,
};
