//! The cell value stored at one grid position

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::Metadata;

/// A by-value reference to a content descriptor in a [`ContentTable`].
///
/// `ContentRef::NULL` is the designated placeholder meaning "no content";
/// a cell holding it is empty, same as a cell holding no reference at all.
///
/// [`ContentTable`]: crate::content::ContentTable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef(pub Uuid);

impl ContentRef {
    /// The null placeholder content.
    pub const NULL: ContentRef = ContentRef(Uuid::nil());

    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

/// The value stored at one grid position: an optional content reference plus
/// a metadata bag.
///
/// Cells are plain values: compared and copied by value, never by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Cell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Cell {
    /// The empty cell: no content, no metadata.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_content(content: ContentRef) -> Self {
        Self {
            content: Some(content),
            metadata: Metadata::new(),
        }
    }

    /// A cell is empty when its content is absent or the null placeholder.
    pub fn is_empty(&self) -> bool {
        match self.content {
            None => true,
            Some(content) => content.is_null(),
        }
    }
}
