//! Per-cell and per-layer metadata
//!
//! Metadata is a small bag holding at most one entry per kind. The set of
//! kinds is closed: every entry is one arm of [`MetadataEntry`], keyed by the
//! matching [`MetadataKind`] tag. This keeps serialization stable and lets
//! consumers match exhaustively instead of probing by runtime type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geom::GridPos;
use crate::value::Value;

/// Tag identifying one metadata kind. A bag holds at most one entry per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetadataKind {
    Collision,
    Note,
    Path,
    Custom,
}

/// Collision behaviour override for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionKind {
    #[default]
    Solid,
    OneWay,
    None,
}

/// A multi-point motion path attached to a layer, e.g. for a moving platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MotionPath {
    pub points: Vec<GridPos>,
    /// Traversal speed in tiles per second
    pub speed: f64,
    /// Whether the path wraps from the last point back to the first
    pub looped: bool,
}

/// One metadata value. The variant determines the kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataEntry {
    Collision(CollisionKind),
    Note(String),
    Path(MotionPath),
    Custom(Value),
}

impl MetadataEntry {
    /// The kind tag this entry is stored under.
    pub fn kind(&self) -> MetadataKind {
        match self {
            MetadataEntry::Collision(_) => MetadataKind::Collision,
            MetadataEntry::Note(_) => MetadataKind::Note,
            MetadataEntry::Path(_) => MetadataKind::Path,
            MetadataEntry::Custom(_) => MetadataKind::Custom,
        }
    }
}

/// A bag of metadata entries, at most one per kind.
///
/// Cloning yields a full value copy with no shared mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    entries: BTreeMap<MetadataKind, MetadataEntry>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing any existing entry of the same kind.
    pub fn set(&mut self, entry: MetadataEntry) {
        self.entries.insert(entry.kind(), entry);
    }

    /// Remove and return the entry of the given kind, if present.
    pub fn remove(&mut self, kind: MetadataKind) -> Option<MetadataEntry> {
        self.entries.remove(&kind)
    }

    pub fn get(&self, kind: MetadataKind) -> Option<&MetadataEntry> {
        self.entries.get(&kind)
    }

    pub fn get_mut(&mut self, kind: MetadataKind) -> Option<&mut MetadataEntry> {
        self.entries.get_mut(&kind)
    }

    /// Collision override, defaulting to [`CollisionKind::Solid`] when absent.
    pub fn collision(&self) -> CollisionKind {
        match self.entries.get(&MetadataKind::Collision) {
            Some(MetadataEntry::Collision(kind)) => *kind,
            _ => CollisionKind::default(),
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self.entries.get(&MetadataKind::Note) {
            Some(MetadataEntry::Note(text)) => Some(text),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&MotionPath> {
        match self.entries.get(&MetadataKind::Path) {
            Some(MetadataEntry::Path(path)) => Some(path),
            _ => None,
        }
    }

    pub fn path_mut(&mut self) -> Option<&mut MotionPath> {
        match self.entries.get_mut(&MetadataKind::Path) {
            Some(MetadataEntry::Path(path)) => Some(path),
            _ => None,
        }
    }

    pub fn custom(&self) -> Option<&Value> {
        match self.entries.get(&MetadataKind::Custom) {
            Some(MetadataEntry::Custom(value)) => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.values()
    }
}
