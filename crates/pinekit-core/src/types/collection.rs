//! Collection lifecycle types.

use serde::{Deserialize, Serialize};

/// Parameters for creating a collection from an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    /// Collection name.
    pub name: String,
    /// Name of the index to snapshot.
    pub source: String,
}

impl CreateCollectionRequest {
    /// Creates a request to snapshot `source` into a collection called `name`.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Size and status of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescription {
    pub name: String,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// e.g. `Initializing` or `Ready`.
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_count: Option<u64>,
    /// Index the collection was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
