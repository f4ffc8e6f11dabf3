//! Subcommands for individual Pinecone operations.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pinekit_core::{
    ConfigureIndexRequest, CreateIndexRequest, Filter, Metadata, MetadataConfig, Metric,
    QueryRequest, UpdateRequest, Vector,
};
use serde::de::DeserializeOwned;

use crate::helper::ConsoleHelper;

/// Vector values passed as one JSON argument.
type Values = Vec<f32>;

/// Vector records passed as one JSON argument.
type Vectors = Vec<Vector>;

/// Parses a command-line argument as JSON.
fn parse_json<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_str(value).map_err(|err| format!("invalid JSON: {err}"))
}

/// Index management.
#[derive(Debug, Clone, Subcommand)]
pub enum IndexCommand {
    /// List index names.
    List,
    /// Create an index.
    Create {
        /// Index name.
        name: String,
        /// Vector dimension.
        #[arg(long)]
        dimension: u32,
        /// Distance metric.
        #[arg(long, default_value_t = Metric::Cosine)]
        metric: Metric,
        /// Metadata fields to index; all fields are indexed when omitted.
        #[arg(long, value_delimiter = ',')]
        indexed: Vec<String>,
        /// Number of replicas.
        #[arg(long)]
        replicas: Option<u32>,
        /// Pod type, e.g. `p1.x1`.
        #[arg(long)]
        pod_type: Option<String>,
        /// Collection to create the index from.
        #[arg(long)]
        source_collection: Option<String>,
    },
    /// Describe an index.
    Describe { name: String },
    /// Delete an index.
    Delete { name: String },
    /// Change the replica count of an index.
    Scale { name: String, replicas: u32 },
    /// Change the replica count or pod type of an index.
    Configure {
        name: String,
        #[arg(long)]
        replicas: Option<u32>,
        #[arg(long)]
        pod_type: Option<String>,
    },
    /// Show vector counts and fullness of an index.
    Stats {
        name: String,
        /// Metadata filter as JSON.
        #[arg(long, value_parser = parse_json::<Filter>)]
        filter: Option<Filter>,
    },
    /// Wait until an index reports ready.
    Wait {
        name: String,
        /// Seconds to wait before giving up.
        #[arg(long, default_value_t = 300)]
        max_wait_secs: u64,
    },
}

/// Vector operations within an index.
#[derive(Debug, Clone, Subcommand)]
pub enum VectorCommand {
    /// Insert or overwrite vectors.
    Upsert {
        index: String,
        /// Vectors as a JSON array of `{"id", "values", "metadata"}` objects.
        #[arg(long, value_parser = parse_json::<Vectors>)]
        vectors: Vectors,
        #[arg(long, default_value = "")]
        namespace: String,
    },
    /// Find the nearest neighbours of a vector.
    Query {
        index: String,
        /// Query vector as a JSON array of numbers.
        #[arg(long, value_parser = parse_json::<Values>)]
        vector: Values,
        #[arg(long, default_value_t = 10)]
        top_k: u32,
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(long)]
        include_values: bool,
        #[arg(long)]
        include_metadata: bool,
        /// Metadata filter as JSON.
        #[arg(long, value_parser = parse_json::<Filter>)]
        filter: Option<Filter>,
    },
    /// Fetch vectors by id.
    Fetch {
        index: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "")]
        namespace: String,
    },
    /// Replace the values of a vector or patch its metadata.
    Update {
        index: String,
        id: String,
        /// New values as a JSON array of numbers.
        #[arg(long, value_parser = parse_json::<Values>)]
        values: Option<Values>,
        /// Metadata fields to set, as a JSON object.
        #[arg(long, value_parser = parse_json::<Metadata>)]
        set_metadata: Option<Metadata>,
        #[arg(long, default_value = "")]
        namespace: String,
    },
    /// Delete vectors by id.
    Delete {
        index: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "")]
        namespace: String,
    },
}

/// Collection management.
#[derive(Debug, Clone, Subcommand)]
pub enum CollectionCommand {
    /// List collection names.
    List,
    /// Snapshot an index into a collection.
    Create {
        name: String,
        /// Index to snapshot.
        #[arg(long)]
        source: String,
    },
    /// Describe a collection.
    Describe { name: String },
    /// Delete a collection.
    Delete { name: String },
}

impl IndexCommand {
    pub async fn run<W: Write>(self, helper: &mut ConsoleHelper<W>) {
        match self {
            Self::List => {
                let indexes = helper.list_indexes().await;
                helper.print_json(indexes.as_ref());
            }
            Self::Create {
                name,
                dimension,
                metric,
                indexed,
                replicas,
                pod_type,
                source_collection,
            } => {
                let mut request = CreateIndexRequest::new(name, dimension, metric);
                if !indexed.is_empty() {
                    request = request.with_metadata_config(MetadataConfig::indexed(indexed));
                }
                if let Some(replicas) = replicas {
                    request = request.with_replicas(replicas);
                }
                if let Some(pod_type) = pod_type {
                    request = request.with_pod_type(pod_type);
                }
                if let Some(collection) = source_collection {
                    request = request.with_source_collection(collection);
                }
                helper.create_index(&request).await;
            }
            Self::Describe { name } => {
                let info = helper.describe_index(&name).await;
                helper.print_json(info.as_ref());
            }
            Self::Delete { name } => {
                helper.delete_index(&name).await;
            }
            Self::Scale { name, replicas } => {
                helper.scale_replicas(&name, replicas).await;
            }
            Self::Configure {
                name,
                replicas,
                pod_type,
            } => {
                let request = ConfigureIndexRequest { replicas, pod_type };
                helper.configure_index(&name, &request).await;
            }
            Self::Stats { name, filter } => {
                let stats = helper.describe_index_stats(&name, filter.as_ref()).await;
                helper.print_json(stats.as_ref());
            }
            Self::Wait {
                name,
                max_wait_secs,
            } => {
                let timeout = Duration::from_secs(max_wait_secs);
                let info = helper.wait_for_index_ready(&name, timeout).await;
                helper.print_json(info.as_ref());
            }
        }
    }
}

impl VectorCommand {
    pub async fn run<W: Write>(self, helper: &mut ConsoleHelper<W>) {
        match self {
            Self::Upsert {
                index,
                vectors,
                namespace,
            } => {
                let response = helper.upsert_vectors(&index, &vectors, &namespace).await;
                helper.print_json(response.as_ref());
            }
            Self::Query {
                index,
                vector,
                top_k,
                namespace,
                include_values,
                include_metadata,
                filter,
            } => {
                let request = QueryRequest::new(vector, top_k)
                    .with_namespace(namespace)
                    .with_values(include_values)
                    .with_metadata(include_metadata)
                    .with_filter(filter);
                let response = helper.query_index(&index, &request).await;
                helper.print_json(response.as_ref());
            }
            Self::Fetch {
                index,
                ids,
                namespace,
            } => {
                let response = helper.fetch_vectors(&index, &ids, &namespace).await;
                helper.print_json(response.as_ref());
            }
            Self::Update {
                index,
                id,
                values,
                set_metadata,
                namespace,
            } => {
                let mut request = UpdateRequest::new(id).with_namespace(namespace);
                if let Some(values) = values {
                    request = request.with_values(values);
                }
                if let Some(metadata) = set_metadata {
                    request = request.with_set_metadata(metadata);
                }
                helper.update_vector(&index, &request).await;
            }
            Self::Delete {
                index,
                ids,
                namespace,
            } => {
                helper.delete_vectors(&index, &ids, &namespace).await;
            }
        }
    }
}

impl CollectionCommand {
    pub async fn run<W: Write>(self, helper: &mut ConsoleHelper<W>) {
        match self {
            Self::List => {
                let collections = helper.list_collections().await;
                helper.print_json(collections.as_ref());
            }
            Self::Create { name, source } => {
                helper.create_collection(&name, &source).await;
            }
            Self::Describe { name } => {
                let info = helper.describe_collection(&name).await;
                helper.print_json(info.as_ref());
            }
            Self::Delete { name } => {
                helper.delete_collection(&name).await;
            }
        }
    }
}
