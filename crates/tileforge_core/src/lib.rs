//! Core data structures for tileforge
//!
//! This crate provides the fundamental types for representing editable
//! tile-based levels:
//! - `Level` - An ordered stack of layers with per-layer metadata
//! - `Grid` / `DenseGrid` / `SparseGrid` - Cell storage backends
//! - `Cell` - A content reference plus metadata at one position
//! - `ContentTable` - Integer-id lookup for content descriptors
//! - `Metadata` - Closed-kind heterogeneous value store
//! - `LevelFile` - Persisted JSON schema with legacy support

mod cell;
mod content;
mod dense;
mod error;
mod file;
mod geom;
mod grid;
mod level;
mod metadata;
mod sparse;
mod value;

pub use cell::{Cell, ContentRef};
pub use content::{ContentDesc, ContentTable, EMPTY_CONTENT_ID};
pub use dense::DenseGrid;
pub use error::{LevelError, LevelFileError};
pub use file::{
    load_level_file, parse_level_file, save_level_file, LayerRecord, LegacyLevelFile, LevelFile,
};
pub use geom::{GridPos, GridRect};
pub use grid::{Grid, GridStorage};
pub use level::Level;
pub use metadata::{CollisionKind, Metadata, MetadataEntry, MetadataKind, MotionPath};
pub use sparse::SparseGrid;
pub use value::Value;
