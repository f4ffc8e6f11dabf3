//! Request and response types of the Pinecone API.
//!
//! Controller (index and collection) types use snake_case field names on the
//! wire, data-plane (vector) types use camelCase. Fields the service may omit
//! are optional.

mod collection;
mod index;
mod vector;

pub use collection::{CollectionDescription, CreateCollectionRequest};
pub use index::{
    ConfigureIndexRequest, CreateIndexRequest, IndexDescription, IndexStats, IndexStatus,
    MetadataConfig, Metric, NamespaceSummary,
};
pub use vector::{
    FetchResponse, QueryRequest, QueryResponse, ScoredVector, UpdateRequest, UpsertResponse,
    Vector,
};

/// Vector metadata: string keys mapped to scalars or lists of strings.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata filter expression, forwarded to the service as-is.
pub type Filter = serde_json::Value;
