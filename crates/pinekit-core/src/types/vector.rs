//! Vector records and data-plane request/response shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Filter, Metadata};

/// A vector record stored in an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Unique identifier within a namespace.
    pub id: String,
    /// The embedding.
    pub values: Vec<f32>,
    /// Optional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Vector {
    /// Creates a vector with an ID and embedding.
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: None,
        }
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value);
        self
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    /// Number of vectors written.
    #[serde(default)]
    pub upserted_count: u64,
}

/// Nearest-neighbour query against one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub namespace: String,
    pub top_k: u32,
    #[serde(default)]
    pub include_values: bool,
    #[serde(default)]
    pub include_metadata: bool,
    pub vector: Vec<f32>,
    /// Metadata filter; omitted from the request when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl QueryRequest {
    /// Creates a query for the `top_k` nearest neighbours of `vector`.
    pub fn new(vector: Vec<f32>, top_k: u32) -> Self {
        Self {
            namespace: String::new(),
            top_k,
            include_values: false,
            include_metadata: false,
            vector,
            filter: None,
        }
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Include vector values in matches.
    pub fn with_values(mut self, include: bool) -> Self {
        self.include_values = include;
        self
    }

    /// Include metadata in matches.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Sets the metadata filter.
    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }
}

/// A single query match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVector {
    pub id: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Matches ranked by score, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<ScoredVector>,
    #[serde(default)]
    pub namespace: String,
}

/// Vectors returned by a fetch, keyed by ID.
///
/// IDs that do not exist are absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub vectors: HashMap<String, Vector>,
    #[serde(default)]
    pub namespace: String,
}

/// Partial update of a single vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub id: String,
    /// Replacement values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
    /// Fields merged into the existing metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_metadata: Option<Metadata>,
    #[serde(default)]
    pub namespace: String,
}

impl UpdateRequest {
    /// Creates an update for the given vector ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: None,
            set_metadata: None,
            namespace: String::new(),
        }
    }

    /// Replaces the vector values.
    pub fn with_values(mut self, values: Vec<f32>) -> Self {
        self.values = Some(values);
        self
    }

    /// Merges the given fields into the metadata.
    pub fn with_set_metadata(mut self, metadata: Metadata) -> Self {
        self.set_metadata = Some(metadata);
        self
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_query_request_wire_format() {
        let request = QueryRequest::new(vec![0.1, 0.2], 3)
            .with_namespace("books")
            .with_metadata(true);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["includeValues"], false);
        assert_eq!(json["namespace"], "books");
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn test_query_request_forwards_filter() {
        let filter = json!({ "genre": { "$eq": "drama" } });
        let request = QueryRequest::new(vec![0.1], 1).with_filter(Some(filter.clone()));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["filter"], filter);
    }

    #[test]
    fn test_update_request_wire_format() {
        let mut patch = Metadata::new();
        patch.insert("genre".into(), json!("comedy"));
        let request = UpdateRequest::new("v1").with_set_metadata(patch);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["setMetadata"]["genre"], "comedy");
        assert!(json.get("values").is_none());
        assert_eq!(json["namespace"], "");
    }

    #[test]
    fn test_vector_with_field() {
        let vector = Vector::new("v1", vec![1.0])
            .with_field("year", json!(2020))
            .with_field("tags", json!(["a", "b"]));

        let metadata = vector.metadata.unwrap();
        assert_eq!(metadata["year"], 2020);
        assert_eq!(metadata["tags"][1], "b");
    }

    #[test]
    fn test_fetch_response_deserialize() {
        let response: FetchResponse = serde_json::from_value(json!({
            "vectors": {
                "v1": { "id": "v1", "values": [0.5, 0.25], "metadata": { "genre": "drama" } }
            },
            "namespace": "books"
        }))
        .unwrap();

        assert_eq!(response.vectors["v1"].values, vec![0.5, 0.25]);
        assert_eq!(response.namespace, "books");
    }

    #[test]
    fn test_query_response_deserialize() {
        let response: QueryResponse = serde_json::from_value(json!({
            "matches": [
                { "id": "a", "score": 0.9 },
                { "id": "b", "score": 0.5, "metadata": { "genre": "drama" } }
            ],
            "namespace": ""
        }))
        .unwrap();

        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[0].id, "a");
        assert!(response.matches[0].values.is_none());
        assert!(response.matches[1].metadata.is_some());
    }
}
