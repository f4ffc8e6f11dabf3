//! Pinecone service handle with argument checks and observability.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::provider::{Operation, PineconeProvider};
use crate::types::{
    CollectionDescription, ConfigureIndexRequest, CreateCollectionRequest, CreateIndexRequest,
    FetchResponse, Filter, IndexDescription, IndexStats, QueryRequest, QueryResponse,
    UpdateRequest, UpsertResponse, Vector,
};
use crate::{Error, Result, TRACING_TARGET_SERVICE};

/// Handle to the Pinecone API.
///
/// Every remote operation goes through this handle, which is returned by
/// client initialization and passed explicitly to callers. The inner provider
/// is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct PineconeService {
    inner: Arc<dyn PineconeProvider>,
}

impl fmt::Debug for PineconeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeService").finish_non_exhaustive()
    }
}

impl PineconeService {
    /// Creates a new service handle around a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: PineconeProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Creates an index.
    ///
    /// Provisioning is asynchronous on the service side; use
    /// [`wait_for_index_ready`](Self::wait_for_index_ready) to block until the
    /// index accepts requests.
    pub async fn create_index(&self, request: &CreateIndexRequest) -> Result<()> {
        ensure_positive("dimension", request.dimension)?;
        self.observe(
            Operation::CreateIndex,
            Some(request.name.as_str()),
            self.inner.create_index(request),
        )
        .await
    }

    /// Lists the names of all indexes.
    pub async fn list_indexes(&self) -> Result<Vec<String>> {
        self.observe(Operation::ListIndexes, None, self.inner.list_indexes())
            .await
    }

    /// Describes an index.
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        self.observe(
            Operation::DescribeIndex,
            Some(name),
            self.inner.describe_index(name),
        )
        .await
    }

    /// Deletes an index.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.observe(
            Operation::DeleteIndex,
            Some(name),
            self.inner.delete_index(name),
        )
        .await
    }

    /// Changes the number of replicas of an index.
    pub async fn scale_replicas(&self, name: &str, replicas: u32) -> Result<()> {
        ensure_positive("replicas", replicas)?;
        self.configure_index(name, &ConfigureIndexRequest::replicas(replicas))
            .await
    }

    /// Changes the replica count or pod type of an index.
    pub async fn configure_index(&self, name: &str, request: &ConfigureIndexRequest) -> Result<()> {
        if let Some(replicas) = request.replicas {
            ensure_positive("replicas", replicas)?;
        }
        self.observe(
            Operation::ConfigureIndex,
            Some(name),
            self.inner.configure_index(name, request),
        )
        .await
    }

    /// Returns statistics about an index, optionally restricted by a filter.
    pub async fn describe_index_stats(
        &self,
        name: &str,
        filter: Option<&Filter>,
    ) -> Result<IndexStats> {
        self.observe(
            Operation::DescribeIndexStats,
            Some(name),
            self.inner.describe_index_stats(name, filter),
        )
        .await
    }

    /// Inserts or overwrites vectors in a namespace.
    pub async fn upsert_vectors(
        &self,
        name: &str,
        vectors: &[Vector],
        namespace: &str,
    ) -> Result<UpsertResponse> {
        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            index = %name,
            namespace = %namespace,
            count = vectors.len(),
            "Upserting vectors"
        );
        self.observe(
            Operation::Upsert,
            Some(name),
            self.inner.upsert(name, vectors, namespace),
        )
        .await
    }

    /// Queries an index for the nearest neighbours of a vector.
    pub async fn query_index(&self, name: &str, request: &QueryRequest) -> Result<QueryResponse> {
        ensure_positive("top_k", request.top_k)?;
        self.observe(
            Operation::Query,
            Some(name),
            self.inner.query(name, request),
        )
        .await
    }

    /// Deletes vectors by ID.
    pub async fn delete_vectors(&self, name: &str, ids: &[String], namespace: &str) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            index = %name,
            namespace = %namespace,
            count = ids.len(),
            "Deleting vectors"
        );
        self.observe(
            Operation::DeleteVectors,
            Some(name),
            self.inner.delete_vectors(name, ids, namespace),
        )
        .await
    }

    /// Fetches vectors by ID.
    pub async fn fetch_vectors(
        &self,
        name: &str,
        ids: &[String],
        namespace: &str,
    ) -> Result<FetchResponse> {
        self.observe(
            Operation::Fetch,
            Some(name),
            self.inner.fetch(name, ids, namespace),
        )
        .await
    }

    /// Updates the values or metadata of a single vector.
    pub async fn update_vector(&self, name: &str, request: &UpdateRequest) -> Result<()> {
        self.observe(
            Operation::Update,
            Some(name),
            self.inner.update(name, request),
        )
        .await
    }

    /// Creates a collection from an existing index.
    pub async fn create_collection(&self, name: &str, source: &str) -> Result<()> {
        let request = CreateCollectionRequest::new(name, source);
        self.observe(
            Operation::CreateCollection,
            Some(name),
            self.inner.create_collection(&request),
        )
        .await
    }

    /// Lists the names of all collections.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        self.observe(Operation::ListCollections, None, self.inner.list_collections())
            .await
    }

    /// Describes a collection.
    pub async fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
        self.observe(
            Operation::DescribeCollection,
            Some(name),
            self.inner.describe_collection(name),
        )
        .await
    }

    /// Deletes a collection.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.observe(
            Operation::DeleteCollection,
            Some(name),
            self.inner.delete_collection(name),
        )
        .await
    }

    /// Polls an index until it reports ready.
    ///
    /// # Errors
    ///
    /// Returns the describe error if polling fails, or an
    /// [`ErrorKind::Unavailable`](crate::ErrorKind::Unavailable) error if the
    /// index is still not ready after `timeout`.
    pub async fn wait_for_index_ready(
        &self,
        name: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<IndexDescription> {
        let started_at = tokio::time::Instant::now();

        loop {
            let description = self.describe_index(name).await?;
            if description.status.ready {
                tracing::info!(
                    target: TRACING_TARGET_SERVICE,
                    index = %name,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Index is ready"
                );
                return Ok(description);
            }

            if started_at.elapsed() >= timeout {
                return Err(Error::unavailable().with_message(format!(
                    "index '{name}' not ready after {}s (state: {})",
                    timeout.as_secs(),
                    description.status.state
                )));
            }

            tracing::debug!(
                target: TRACING_TARGET_SERVICE,
                index = %name,
                state = %description.status.state,
                "Waiting for index"
            );
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn observe<T, F>(&self, operation: Operation, target: Option<&str>, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            operation = %operation,
            resource = ?target,
            "Calling Pinecone"
        );

        let result = call.await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET_SERVICE,
                    operation = %operation,
                    resource = ?target,
                    elapsed_ms = elapsed.as_millis(),
                    "Pinecone call succeeded"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVICE,
                    operation = %operation,
                    resource = ?target,
                    kind = %error.kind,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Pinecone call failed"
                );
            }
        }

        result
    }
}

fn ensure_positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::invalid_argument().with_message(format!("{field} must be positive")));
    }
    Ok(())
}
