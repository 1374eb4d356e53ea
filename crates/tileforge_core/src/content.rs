//! Content descriptors and the integer-id lookup table
//!
//! Cells reference content by [`ContentRef`]; the persisted file format
//! stores small integer ids instead. The [`ContentTable`] translates between
//! the two: `lookup(id)` resolves a persisted id to a reference, `id_of`
//! goes the other way. Id `-1` is reserved for the empty cell.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::cell::ContentRef;
use crate::value::Value;

/// Persisted integer id of the empty cell.
pub const EMPTY_CONTENT_ID: i32 = -1;

/// Describes one kind of placeable content (a tile type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDesc {
    pub id: Uuid,
    pub name: String,
    /// Whether this content blocks movement
    #[serde(default)]
    pub solid: bool,
    /// One-way platform: collides only from above
    #[serde(default)]
    pub one_way: bool,
    /// Custom user-defined properties
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom: HashMap<String, Value>,
}

impl ContentDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            solid: false,
            one_way: false,
            custom: HashMap::new(),
        }
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn with_one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    /// The by-value reference cells use to point at this descriptor.
    pub fn content_ref(&self) -> ContentRef {
        ContentRef(self.id)
    }
}

/// Lookup table mapping persisted integer ids to content descriptors.
///
/// Integer ids are table indices, assigned in registration order, so a saved
/// level only stays readable against a table registered in the same order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContentTable {
    entries: Vec<ContentDesc>,
    #[serde(skip)]
    index: HashMap<Uuid, usize>,
}

impl ContentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor and return its reference.
    pub fn register(&mut self, desc: ContentDesc) -> ContentRef {
        let content = desc.content_ref();
        self.index.insert(desc.id, self.entries.len());
        self.entries.push(desc);
        content
    }

    /// Rebuild the uuid index after deserialization.
    pub fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, desc)| (desc.id, i))
            .collect();
    }

    /// Resolve a persisted integer id. `EMPTY_CONTENT_ID` and unknown ids
    /// resolve to `None`.
    pub fn lookup(&self, id: i32) -> Option<ContentRef> {
        if id < 0 {
            return None;
        }
        self.entries.get(id as usize).map(ContentDesc::content_ref)
    }

    /// The persisted integer id for a reference; `None` for the null
    /// placeholder or an unregistered reference.
    pub fn id_of(&self, content: ContentRef) -> Option<i32> {
        if content.is_null() {
            return None;
        }
        self.index.get(&content.0).map(|&i| i as i32)
    }

    pub fn get(&self, content: ContentRef) -> Option<&ContentDesc> {
        self.index.get(&content.0).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentDesc> {
        self.entries.iter()
    }
}
