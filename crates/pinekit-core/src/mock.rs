//! In-memory mock of the Pinecone API for testing.
//!
//! [`MockProvider`] keeps index and collection names and vector records in
//! memory, records every call it receives, and can be told to fail specific
//! operations. Query results are scripted with
//! [`set_query_matches`](MockProvider::set_query_matches); no similarity
//! search is performed.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! pinekit-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pinekit_core::{ErrorKind, MockProvider, Operation, PineconeService};
//!
//! let mock = MockProvider::new();
//! mock.fail(Operation::CreateIndex, ErrorKind::Conflict);
//!
//! let service = PineconeService::new(mock.clone());
//! assert!(service.create_index(&request).await.is_err());
//! assert_eq!(mock.calls_for(Operation::CreateIndex), 1);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::provider::{Operation, PineconeProvider};
use crate::types::{
    CollectionDescription, ConfigureIndexRequest, CreateCollectionRequest, CreateIndexRequest,
    FetchResponse, Filter, IndexDescription, IndexStats, IndexStatus, Metric, NamespaceSummary,
    QueryRequest, QueryResponse, ScoredVector, UpdateRequest, UpsertResponse, Vector,
};
use crate::{Error, ErrorKind, Result};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// The operation that was invoked.
    pub operation: Operation,
    /// Index or collection name the call targeted, if any.
    pub target: Option<String>,
}

impl MockCall {
    /// Creates a call record.
    pub fn new(operation: Operation, target: Option<&str>) -> Self {
        Self {
            operation,
            target: target.map(str::to_owned),
        }
    }
}

type Namespaces = HashMap<String, BTreeMap<String, Vector>>;

#[derive(Debug, Default)]
struct MockState {
    indexes: BTreeMap<String, IndexDescription>,
    collections: BTreeMap<String, CollectionDescription>,
    vectors: HashMap<String, Namespaces>,
    query_matches: Vec<ScoredVector>,
    failures: HashMap<Operation, ErrorKind>,
    calls: Vec<MockCall>,
    queries: Vec<QueryRequest>,
}

impl MockState {
    fn index(&self, name: &str) -> Result<&IndexDescription> {
        self.indexes.get(name).ok_or_else(|| index_not_found(name))
    }

    fn index_mut(&mut self, name: &str) -> Result<&mut IndexDescription> {
        self.indexes.get_mut(name).ok_or_else(|| index_not_found(name))
    }

    fn namespace_mut(
        &mut self,
        index: &str,
        namespace: &str,
    ) -> Result<&mut BTreeMap<String, Vector>> {
        self.index(index)?;
        Ok(self
            .vectors
            .entry(index.to_owned())
            .or_default()
            .entry(namespace.to_owned())
            .or_default())
    }

    fn vector_count(&self, index: &str) -> u64 {
        self.vectors
            .get(index)
            .map(|namespaces| namespaces.values().map(|v| v.len() as u64).sum())
            .unwrap_or_default()
    }
}

/// In-memory Pinecone provider for tests.
///
/// Clones share state, so a test can keep one handle for assertions while
/// another is moved into a [`PineconeService`](crate::PineconeService).
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Creates an empty mock with no indexes or collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a ready index without recording a call.
    pub fn add_index(&self, name: &str, dimension: u32, metric: Metric) {
        let request = CreateIndexRequest::new(name, dimension, metric);
        self.state()
            .indexes
            .insert(name.to_owned(), describe_new_index(&request));
    }

    /// Overrides the readiness reported for an index.
    pub fn set_index_ready(&self, name: &str, ready: bool) {
        if let Some(index) = self.state().indexes.get_mut(name) {
            index.status.ready = ready;
            index.status.state = if ready { "Ready" } else { "Initializing" }.to_owned();
        }
    }

    /// Sets the matches returned by every subsequent query.
    pub fn set_query_matches(&self, matches: Vec<ScoredVector>) {
        self.state().query_matches = matches;
    }

    /// Makes every subsequent call to `operation` fail with `kind`.
    pub fn fail(&self, operation: Operation, kind: ErrorKind) {
        self.state().failures.insert(operation, kind);
    }

    /// Stops failing `operation`.
    pub fn recover(&self, operation: Operation) {
        self.state().failures.remove(&operation);
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Returns how many times `operation` was called.
    pub fn calls_for(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    /// Returns every query request received so far, in order.
    pub fn queries(&self) -> Vec<QueryRequest> {
        self.state().queries.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the call and returns the state, or the configured failure.
    fn enter(
        &self,
        operation: Operation,
        target: Option<&str>,
    ) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.calls.push(MockCall::new(operation, target));

        if let Some(kind) = state.failures.get(&operation) {
            return Err(Error::new(*kind).with_message(format!("mock failure for {operation}")));
        }

        Ok(state)
    }
}

fn index_not_found(name: &str) -> Error {
    Error::not_found().with_message(format!("index '{name}' not found"))
}

fn collection_not_found(name: &str) -> Error {
    Error::not_found().with_message(format!("collection '{name}' not found"))
}

fn describe_new_index(request: &CreateIndexRequest) -> IndexDescription {
    IndexDescription {
        name: request.name.clone(),
        dimension: request.dimension,
        metric: request.metric,
        replicas: Some(request.replicas.unwrap_or(1)),
        shards: Some(request.shards.unwrap_or(1)),
        pods: Some(request.pods.unwrap_or(1)),
        pod_type: Some(request.pod_type.clone().unwrap_or_else(|| "p1.x1".to_owned())),
        metadata_config: request.metadata_config.clone(),
        status: IndexStatus {
            ready: true,
            state: "Ready".to_owned(),
            host: Some(format!("{}.mock.pinecone.io", request.name)),
            port: Some(443),
        },
    }
}

#[async_trait::async_trait]
impl PineconeProvider for MockProvider {
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<()> {
        let mut state = self.enter(Operation::CreateIndex, Some(&request.name))?;
        if state.indexes.contains_key(&request.name) {
            return Err(Error::conflict()
                .with_message(format!("index '{}' already exists", request.name)));
        }

        state
            .indexes
            .insert(request.name.clone(), describe_new_index(request));
        Ok(())
    }

    async fn list_indexes(&self) -> Result<Vec<String>> {
        let state = self.enter(Operation::ListIndexes, None)?;
        Ok(state.indexes.keys().cloned().collect())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let state = self.enter(Operation::DescribeIndex, Some(name))?;
        state.index(name).cloned()
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let mut state = self.enter(Operation::DeleteIndex, Some(name))?;
        state.indexes.remove(name).ok_or_else(|| index_not_found(name))?;
        state.vectors.remove(name);
        Ok(())
    }

    async fn configure_index(&self, name: &str, request: &ConfigureIndexRequest) -> Result<()> {
        let mut state = self.enter(Operation::ConfigureIndex, Some(name))?;
        let index = state.index_mut(name)?;

        if let Some(replicas) = request.replicas {
            index.replicas = Some(replicas);
        }
        if let Some(pod_type) = &request.pod_type {
            index.pod_type = Some(pod_type.clone());
        }
        Ok(())
    }

    async fn describe_index_stats(
        &self,
        name: &str,
        _filter: Option<&Filter>,
    ) -> Result<IndexStats> {
        let state = self.enter(Operation::DescribeIndexStats, Some(name))?;
        let dimension = state.index(name)?.dimension;

        let namespaces: HashMap<String, NamespaceSummary> = state
            .vectors
            .get(name)
            .map(|namespaces| {
                namespaces
                    .iter()
                    .filter(|(_, vectors)| !vectors.is_empty())
                    .map(|(namespace, vectors)| {
                        let summary = NamespaceSummary {
                            vector_count: vectors.len() as u64,
                        };
                        (namespace.clone(), summary)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(IndexStats {
            namespaces,
            dimension: Some(dimension),
            index_fullness: 0.0,
            total_vector_count: state.vector_count(name),
        })
    }

    async fn upsert(
        &self,
        index: &str,
        vectors: &[Vector],
        namespace: &str,
    ) -> Result<UpsertResponse> {
        let mut state = self.enter(Operation::Upsert, Some(index))?;
        let records = state.namespace_mut(index, namespace)?;

        for vector in vectors {
            records.insert(vector.id.clone(), vector.clone());
        }

        Ok(UpsertResponse {
            upserted_count: vectors.len() as u64,
        })
    }

    async fn query(&self, index: &str, request: &QueryRequest) -> Result<QueryResponse> {
        let mut state = self.enter(Operation::Query, Some(index))?;
        state.index(index)?;
        state.queries.push(request.clone());

        let matches = state
            .query_matches
            .iter()
            .take(request.top_k as usize)
            .cloned()
            .map(|mut scored| {
                if !request.include_values {
                    scored.values = None;
                }
                if !request.include_metadata {
                    scored.metadata = None;
                }
                scored
            })
            .collect();

        Ok(QueryResponse {
            matches,
            namespace: request.namespace.clone(),
        })
    }

    async fn fetch(&self, index: &str, ids: &[String], namespace: &str) -> Result<FetchResponse> {
        let mut state = self.enter(Operation::Fetch, Some(index))?;
        let records = state.namespace_mut(index, namespace)?;

        let vectors = ids
            .iter()
            .filter_map(|id| records.get(id).map(|v| (id.clone(), v.clone())))
            .collect();

        Ok(FetchResponse {
            vectors,
            namespace: namespace.to_owned(),
        })
    }

    async fn update(&self, index: &str, request: &UpdateRequest) -> Result<()> {
        let mut state = self.enter(Operation::Update, Some(index))?;
        let records = state.namespace_mut(index, &request.namespace)?;
        let vector = records.get_mut(&request.id).ok_or_else(|| {
            Error::not_found().with_message(format!("vector '{}' not found", request.id))
        })?;

        if let Some(values) = &request.values {
            vector.values = values.clone();
        }
        if let Some(patch) = &request.set_metadata {
            let metadata = vector.metadata.get_or_insert_with(Default::default);
            for (key, value) in patch {
                metadata.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete_vectors(&self, index: &str, ids: &[String], namespace: &str) -> Result<()> {
        let mut state = self.enter(Operation::DeleteVectors, Some(index))?;
        let records = state.namespace_mut(index, namespace)?;

        for id in ids {
            records.remove(id);
        }
        Ok(())
    }

    async fn create_collection(&self, request: &CreateCollectionRequest) -> Result<()> {
        let mut state = self.enter(Operation::CreateCollection, Some(&request.name))?;
        if state.collections.contains_key(&request.name) {
            return Err(Error::conflict()
                .with_message(format!("collection '{}' already exists", request.name)));
        }

        let dimension = state.index(&request.source)?.dimension;
        let description = CollectionDescription {
            name: request.name.clone(),
            size: Some(0),
            status: "Ready".to_owned(),
            dimension: Some(dimension),
            vector_count: Some(state.vector_count(&request.source)),
            source: Some(request.source.clone()),
        };

        state.collections.insert(request.name.clone(), description);
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let state = self.enter(Operation::ListCollections, None)?;
        Ok(state.collections.keys().cloned().collect())
    }

    async fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
        let state = self.enter(Operation::DescribeCollection, Some(name))?;
        state
            .collections
            .get(name)
            .cloned()
            .ok_or_else(|| collection_not_found(name))
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut state = self.enter(Operation::DeleteCollection, Some(name))?;
        state
            .collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| collection_not_found(name))
    }
}
