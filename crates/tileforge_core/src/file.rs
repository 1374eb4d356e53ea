//! Persisted level file schema: one level per JSON file
//!
//! The on-disk format stores each layer as a dense row-major block of integer
//! content ids plus a map of per-cell metadata keyed by `"x,y"` strings.
//! Legacy single-layer files carried a flat position/id pair instead; they
//! are accepted on load and rewritten in the current format on save.
//!
//! Metadata entries are persisted as raw JSON values and decoded leniently:
//! an entry that fails to decode, or a malformed position key, degrades to
//! empty metadata rather than failing the load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::cell::Cell;
use crate::content::{ContentTable, EMPTY_CONTENT_ID};
use crate::error::LevelFileError;
use crate::geom::{GridPos, GridRect};
use crate::grid::Grid;
use crate::level::Level;
use crate::metadata::{Metadata, MetadataEntry};

/// A persisted level.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LevelFile {
    /// Unix timestamp of the last save
    #[serde(default)]
    pub last_accessed: i64,
    pub layers: Vec<LayerRecord>,
}

/// One persisted layer: a dense row-major block of content ids anchored at
/// `min_position`, plus per-cell and layer-scoped metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayerRecord {
    /// Stable id of this layer within the file. Absent in legacy files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<Uuid>,
    pub grid_size: (i32, i32),
    pub min_position: (i32, i32),
    /// Row-major, length `grid_size.0 * grid_size.1`; `-1` is the empty cell
    pub content_ids: Vec<i32>,
    /// Per-cell metadata keyed by `"x,y"`; only non-empty entries are written
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Layer-scoped metadata entries (e.g. a motion path)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer_metadata: Vec<serde_json::Value>,
}

/// Legacy single-layer format: parallel position/id lists, implicit layer 0,
/// no per-tile metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyLevelFile {
    #[serde(default)]
    pub last_accessed: i64,
    pub positions: Vec<(i32, i32)>,
    pub content_ids: Vec<i32>,
}

/// Either accepted wire format.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LevelFileFormat {
    Current(LevelFile),
    Legacy(LegacyLevelFile),
}

impl LevelFile {
    /// Snapshot `level` into the persisted schema, resolving cell content to
    /// integer ids through `table`. Unregistered content saves as empty.
    pub fn from_level(level: &Level, table: &ContentTable) -> Self {
        let layers = (0..level.layer_count())
            .filter_map(|index| level.layer(index).map(|grid| (index, grid)))
            .map(|(index, grid)| {
                let rect = grid.rect();
                let mut content_ids =
                    vec![EMPTY_CONTENT_ID; rect.size.0 as usize * rect.size.1 as usize];
                let mut metadata = HashMap::new();
                for (pos, cell) in grid.cells() {
                    let row = (pos.y - rect.min.y) as usize;
                    let col = (pos.x - rect.min.x) as usize;
                    let id = cell
                        .content
                        .and_then(|content| table.id_of(content))
                        .unwrap_or(EMPTY_CONTENT_ID);
                    content_ids[row * rect.size.0 as usize + col] = id;
                    // The schema carries one metadata entry per cell.
                    if let Some(entry) = cell.metadata.iter().next() {
                        if let Ok(value) = serde_json::to_value(entry) {
                            metadata.insert(format!("{},{}", pos.x, pos.y), value);
                        }
                    }
                }
                let layer_metadata = level
                    .metadata(index)
                    .map(|meta| {
                        meta.iter()
                            .filter_map(|entry| serde_json::to_value(entry).ok())
                            .collect()
                    })
                    .unwrap_or_default();
                LayerRecord {
                    layer_id: Some(Uuid::new_v4()),
                    grid_size: (rect.size.0 as i32, rect.size.1 as i32),
                    min_position: (rect.min.x, rect.min.y),
                    content_ids,
                    metadata,
                    layer_metadata,
                }
            })
            .collect();

        LevelFile {
            last_accessed: unix_now(),
            layers,
        }
    }

    /// Rebuild a live level, resolving integer ids through `table`. Unknown
    /// ids and undecodable metadata load as empty.
    pub fn to_level(&self, table: &ContentTable) -> Level {
        let mut level = Level::new();
        for (index, record) in self.layers.iter().enumerate() {
            // Indices 0..len are always valid layer ids.
            let layer = match level.ensure_layer(index as i32) {
                Ok(layer) => layer,
                Err(_) => continue,
            };

            let min = GridPos::new(record.min_position.0, record.min_position.1);
            let width = record.grid_size.0.max(0) as usize;
            let height = record.grid_size.1.max(0) as usize;
            for row in 0..height {
                for col in 0..width {
                    let id = record
                        .content_ids
                        .get(row * width + col)
                        .copied()
                        .unwrap_or(EMPTY_CONTENT_ID);
                    let Some(content) = table.lookup(id) else {
                        continue;
                    };
                    let pos = GridPos::new(min.x + col as i32, min.y + row as i32);
                    let mut cell = Cell::with_content(content);
                    if let Some(meta) = decode_cell_metadata(&record.metadata, pos) {
                        cell.metadata = meta;
                    }
                    level.set_cell(pos, cell, layer);
                }
            }

            for value in &record.layer_metadata {
                if let Ok(entry) = serde_json::from_value::<MetadataEntry>(value.clone()) {
                    level.metadata_mut(layer).set(entry);
                }
            }
        }
        level.recompute_bounds();
        level
    }
}

impl From<LegacyLevelFile> for LevelFile {
    fn from(legacy: LegacyLevelFile) -> Self {
        let rect = legacy
            .positions
            .iter()
            .fold(GridRect::EMPTY, |rect, &(x, y)| {
                rect.expanded_to(GridPos::new(x, y))
            });
        let width = rect.size.0 as usize;
        let mut content_ids = vec![EMPTY_CONTENT_ID; width * rect.size.1 as usize];
        for (&(x, y), &id) in legacy.positions.iter().zip(&legacy.content_ids) {
            let row = (y - rect.min.y) as usize;
            let col = (x - rect.min.x) as usize;
            content_ids[row * width + col] = id;
        }
        LevelFile {
            last_accessed: legacy.last_accessed,
            layers: vec![LayerRecord {
                layer_id: None,
                grid_size: (rect.size.0 as i32, rect.size.1 as i32),
                min_position: (rect.min.x, rect.min.y),
                content_ids,
                metadata: HashMap::new(),
                layer_metadata: Vec::new(),
            }],
        }
    }
}

/// Parse a level file from JSON, accepting both the current and the legacy
/// format. Legacy files normalize to a single layer 0.
pub fn parse_level_file(json: &str) -> Result<LevelFile, LevelFileError> {
    let format: LevelFileFormat = serde_json::from_str(json)?;
    Ok(match format {
        LevelFileFormat::Current(file) => file,
        LevelFileFormat::Legacy(legacy) => legacy.into(),
    })
}

/// Load a level file from disk. A missing file is reported as
/// [`LevelFileError::NotFound`]; callers are expected to check first.
pub fn load_level_file(path: &Path) -> Result<LevelFile, LevelFileError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            LevelFileError::NotFound(path.to_path_buf())
        } else {
            LevelFileError::Io(e)
        }
    })?;
    parse_level_file(&json)
}

/// Save a level file to disk as pretty-printed JSON.
pub fn save_level_file(file: &LevelFile, path: &Path) -> Result<(), LevelFileError> {
    let json = serde_json::to_string_pretty(file)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn decode_cell_metadata(
    map: &HashMap<String, serde_json::Value>,
    pos: GridPos,
) -> Option<Metadata> {
    let value = map.get(&format!("{},{}", pos.x, pos.y))?;
    let entry = serde_json::from_value::<MetadataEntry>(value.clone()).ok()?;
    let mut metadata = Metadata::new();
    metadata.set(entry);
    Some(metadata)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
