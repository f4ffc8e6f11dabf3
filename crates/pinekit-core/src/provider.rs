//! The seam between the service handle and the remote API.

use crate::Result;
use crate::types::{
    CollectionDescription, ConfigureIndexRequest, CreateCollectionRequest, CreateIndexRequest,
    FetchResponse, Filter, IndexDescription, IndexStats, QueryRequest, QueryResponse,
    UpdateRequest, UpsertResponse, Vector,
};

/// Remote operations exposed by the Pinecone API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    CreateIndex,
    ListIndexes,
    DescribeIndex,
    DeleteIndex,
    ConfigureIndex,
    DescribeIndexStats,
    Upsert,
    Query,
    Fetch,
    Update,
    DeleteVectors,
    CreateCollection,
    ListCollections,
    DescribeCollection,
    DeleteCollection,
}

/// Core trait for Pinecone API implementations.
///
/// Each method maps to exactly one remote call. Implementations forward their
/// arguments without renaming identifiers or filling in absent options.
#[async_trait::async_trait]
pub trait PineconeProvider: Send + Sync {
    /// Provisions a new index.
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<()>;

    /// Returns the names of all indexes in the project.
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Returns the configuration and status of an index.
    async fn describe_index(&self, name: &str) -> Result<IndexDescription>;

    /// Deprovisions an index.
    async fn delete_index(&self, name: &str) -> Result<()>;

    /// Changes the replica count or pod type of an index.
    async fn configure_index(&self, name: &str, request: &ConfigureIndexRequest) -> Result<()>;

    /// Returns vector counts per namespace and index fullness.
    async fn describe_index_stats(&self, name: &str, filter: Option<&Filter>)
    -> Result<IndexStats>;

    /// Inserts or overwrites vectors in a namespace.
    async fn upsert(&self, index: &str, vectors: &[Vector], namespace: &str)
    -> Result<UpsertResponse>;

    /// Runs a nearest-neighbour query.
    async fn query(&self, index: &str, request: &QueryRequest) -> Result<QueryResponse>;

    /// Fetches vectors by ID.
    async fn fetch(&self, index: &str, ids: &[String], namespace: &str) -> Result<FetchResponse>;

    /// Updates the values or metadata of a single vector.
    async fn update(&self, index: &str, request: &UpdateRequest) -> Result<()>;

    /// Deletes vectors by ID.
    async fn delete_vectors(&self, index: &str, ids: &[String], namespace: &str) -> Result<()>;

    /// Snapshots an index into a collection.
    async fn create_collection(&self, request: &CreateCollectionRequest) -> Result<()>;

    /// Returns the names of all collections in the project.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Returns the size and status of a collection.
    async fn describe_collection(&self, name: &str) -> Result<CollectionDescription>;

    /// Deletes a collection.
    async fn delete_collection(&self, name: &str) -> Result<()>;
}
