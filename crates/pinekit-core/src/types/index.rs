//! Index lifecycle types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Distance metric used by an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Metric {
    /// Cosine similarity.
    #[default]
    #[strum(to_string = "cosine")]
    Cosine,
    /// Euclidean distance.
    #[strum(to_string = "euclidean")]
    Euclidean,
    /// Dot product.
    #[strum(to_string = "dotproduct", serialize = "dot_product", serialize = "dot-product")]
    DotProduct,
}

/// Selective metadata indexing for pod-based indexes.
///
/// Only the listed fields are indexed for filtering; an index created without
/// a metadata config indexes every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Metadata fields to index.
    pub indexed: Vec<String>,
}

impl MetadataConfig {
    /// Creates a config that indexes the given fields.
    pub fn indexed(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            indexed: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parameters for creating an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexRequest {
    /// Index name.
    pub name: String,
    /// Vector dimension.
    pub dimension: u32,
    /// Distance metric.
    pub metric: Metric,
    /// Metadata fields to index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_config: Option<MetadataConfig>,
    /// Number of replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Number of shards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<u32>,
    /// Number of pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pods: Option<u32>,
    /// Pod type, e.g. `p1.x1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_type: Option<String>,
    /// Collection to seed the index from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_collection: Option<String>,
}

impl CreateIndexRequest {
    /// Creates a request with the required parameters.
    pub fn new(name: impl Into<String>, dimension: u32, metric: Metric) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            metadata_config: None,
            replicas: None,
            shards: None,
            pods: None,
            pod_type: None,
            source_collection: None,
        }
    }

    /// Sets the metadata indexing config.
    pub fn with_metadata_config(mut self, config: MetadataConfig) -> Self {
        self.metadata_config = Some(config);
        self
    }

    /// Sets the number of replicas.
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = Some(replicas);
        self
    }

    /// Sets the number of shards.
    pub fn with_shards(mut self, shards: u32) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Sets the number of pods.
    pub fn with_pods(mut self, pods: u32) -> Self {
        self.pods = Some(pods);
        self
    }

    /// Sets the pod type.
    pub fn with_pod_type(mut self, pod_type: impl Into<String>) -> Self {
        self.pod_type = Some(pod_type.into());
        self
    }

    /// Seeds the index from a collection.
    pub fn with_source_collection(mut self, collection: impl Into<String>) -> Self {
        self.source_collection = Some(collection.into());
        self
    }
}

/// Parameters for reconfiguring an existing index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureIndexRequest {
    /// New number of replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// New pod type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_type: Option<String>,
}

impl ConfigureIndexRequest {
    /// Creates a request that only changes the replica count.
    pub fn replicas(replicas: u32) -> Self {
        Self {
            replicas: Some(replicas),
            pod_type: None,
        }
    }
}

/// Provisioning status of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Whether the index accepts requests.
    #[serde(default)]
    pub ready: bool,
    /// Lifecycle state, e.g. `Initializing` or `Ready`.
    #[serde(default)]
    pub state: String,
    /// Data-plane host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Data-plane port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Configuration and status of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: u32,
    pub metric: Metric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pods: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_config: Option<MetadataConfig>,
    #[serde(default)]
    pub status: IndexStatus,
}

/// Vector count for one namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSummary {
    #[serde(default)]
    pub vector_count: u64,
}

/// Statistics about the contents of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Vector counts keyed by namespace.
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<u32>,
    /// Fraction of the pod capacity in use.
    #[serde(default)]
    pub index_fullness: f32,
    #[serde(default)]
    pub total_vector_count: u64,
}
