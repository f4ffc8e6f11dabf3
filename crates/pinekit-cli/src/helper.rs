//! Console adapter over [`PineconeService`].
//!
//! Every method prints progress for mutating operations, turns failures into a
//! single `An error occurred while ...` line and returns `None` so a sequence
//! of calls keeps going.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use pinekit_core::{
    CollectionDescription, ConfigureIndexRequest, CreateIndexRequest, FetchResponse, Filter,
    IndexDescription, IndexStats, PineconeService, QueryRequest, QueryResponse, Result,
    UpdateRequest, UpsertResponse, Vector,
};
use serde::Serialize;

use crate::TRACING_TARGET_OUTPUT;

/// Interval between readiness polls.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Prints status lines and failures for Pinecone operations.
pub struct ConsoleHelper<W> {
    service: PineconeService,
    out: W,
}

impl ConsoleHelper<std::io::Stdout> {
    /// Creates a helper that writes to standard output.
    pub fn stdout(service: PineconeService) -> Self {
        Self::new(service, std::io::stdout())
    }
}

impl<W: Write> ConsoleHelper<W> {
    /// Creates a helper writing to `out`.
    pub fn new(service: PineconeService, out: W) -> Self {
        Self { service, out }
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.out
    }

    /// Creates an index and prints its progress.
    pub async fn create_index(&mut self, request: &CreateIndexRequest) -> Option<()> {
        let name = &request.name;
        self.line(format_args!("Creating index named {name}..."));
        let result = self.service.create_index(request).await;
        self.finish(result, format_args!("creating the index {name}"))?;
        self.line(format_args!("Index {name} created."));
        Some(())
    }

    /// Lists the index names.
    pub async fn list_indexes(&mut self) -> Option<Vec<String>> {
        let result = self.service.list_indexes().await;
        self.finish(result, format_args!("listing indexes"))
    }

    /// Describes an index.
    pub async fn describe_index(&mut self, name: &str) -> Option<IndexDescription> {
        let result = self.service.describe_index(name).await;
        self.finish(result, format_args!("describing the index {name}"))
    }

    /// Deletes an index and prints its progress.
    pub async fn delete_index(&mut self, name: &str) -> Option<()> {
        self.line(format_args!("Deleting {name} index..."));
        let result = self.service.delete_index(name).await;
        self.finish(result, format_args!("deleting {name}"))?;
        self.line(format_args!("{name} deleted"));
        Some(())
    }

    /// Sets the replica count of an index.
    pub async fn scale_replicas(&mut self, name: &str, replicas: u32) -> Option<()> {
        let result = self.service.scale_replicas(name, replicas).await;
        self.finish(result, format_args!("scaling replicas for {name}"))
    }

    /// Changes the replicas or pod type of an index.
    pub async fn configure_index(
        &mut self,
        name: &str,
        request: &ConfigureIndexRequest,
    ) -> Option<()> {
        let result = self.service.configure_index(name, request).await;
        self.finish(result, format_args!("configuring the index {name}"))
    }

    /// Polls until the index is ready or `timeout` elapses.
    pub async fn wait_for_index_ready(
        &mut self,
        name: &str,
        timeout: Duration,
    ) -> Option<IndexDescription> {
        self.line(format_args!("Waiting for index {name} to be ready..."));
        let result = self
            .service
            .wait_for_index_ready(name, READY_POLL_INTERVAL, timeout)
            .await;
        self.finish(result, format_args!("waiting for the index {name}"))
    }

    /// Returns index statistics, optionally restricted by `filter`.
    pub async fn describe_index_stats(
        &mut self,
        name: &str,
        filter: Option<&Filter>,
    ) -> Option<IndexStats> {
        let result = self.service.describe_index_stats(name, filter).await;
        self.finish(
            result,
            format_args!("getting statistics for the index {name}"),
        )
    }

    /// Inserts or overwrites vectors in `namespace`.
    pub async fn upsert_vectors(
        &mut self,
        name: &str,
        vectors: &[Vector],
        namespace: &str,
    ) -> Option<UpsertResponse> {
        self.line(format_args!("Upserting vectors..."));
        let result = self.service.upsert_vectors(name, vectors, namespace).await;
        self.finish(result, format_args!("upserting vectors to {name}"))
    }

    /// Runs a similarity query.
    pub async fn query_index(
        &mut self,
        name: &str,
        request: &QueryRequest,
    ) -> Option<QueryResponse> {
        let result = self.service.query_index(name, request).await;
        self.finish(result, format_args!("querying the index {name}"))
    }

    /// Deletes vectors by id from `namespace`.
    pub async fn delete_vectors(
        &mut self,
        name: &str,
        ids: &[String],
        namespace: &str,
    ) -> Option<()> {
        self.line(format_args!("Deleting vectors..."));
        let result = self.service.delete_vectors(name, ids, namespace).await;
        self.finish(result, format_args!("deleting vectors from {name}"))
    }

    /// Fetches vectors by id from `namespace`.
    pub async fn fetch_vectors(
        &mut self,
        name: &str,
        ids: &[String],
        namespace: &str,
    ) -> Option<FetchResponse> {
        let result = self.service.fetch_vectors(name, ids, namespace).await;
        self.finish(result, format_args!("fetching vectors from {name}"))
    }

    /// Updates the values or metadata of one vector.
    pub async fn update_vector(&mut self, name: &str, request: &UpdateRequest) -> Option<()> {
        self.line(format_args!("Updating Vectors..."));
        let result = self.service.update_vector(name, request).await;
        self.finish(result, format_args!("updating vectors in {name}"))
    }

    /// Creates a collection from the `source` index.
    pub async fn create_collection(&mut self, name: &str, source: &str) -> Option<()> {
        self.line(format_args!("Creating {name} collection..."));
        let result = self.service.create_collection(name, source).await;
        self.finish(
            result,
            format_args!("creating collection {name} from {source}"),
        )?;
        self.line(format_args!("Collection created."));
        Some(())
    }

    /// Lists the collection names.
    pub async fn list_collections(&mut self) -> Option<Vec<String>> {
        let result = self.service.list_collections().await;
        self.finish(result, format_args!("listing collections"))
    }

    /// Describes a collection.
    pub async fn describe_collection(&mut self, name: &str) -> Option<CollectionDescription> {
        let result = self.service.describe_collection(name).await;
        self.finish(result, format_args!("describing the collection {name}"))
    }

    /// Deletes a collection and prints its progress.
    pub async fn delete_collection(&mut self, name: &str) -> Option<()> {
        self.line(format_args!("Deleting collection {name}..."));
        let result = self.service.delete_collection(name).await;
        self.finish(result, format_args!("deleting the collection {name}"))?;
        self.line(format_args!("Collection deleted."));
        Some(())
    }

    /// Prints a value with its `Debug` representation, or `None`.
    pub fn print_debug<T: fmt::Debug>(&mut self, value: Option<&T>) {
        match value {
            Some(value) => self.line(format_args!("{value:?}")),
            None => self.line(format_args!("None")),
        }
    }

    /// Prints a value as pretty JSON, or `None`.
    pub fn print_json<T: Serialize>(&mut self, value: Option<&T>) {
        let Some(value) = value else {
            self.line(format_args!("None"));
            return;
        };

        match serde_json::to_string_pretty(value) {
            Ok(json) => self.line(format_args!("{json}")),
            Err(err) => {
                self.line(format_args!("An error occurred while printing the result: {err}"))
            }
        }
    }

    fn finish<T>(&mut self, result: Result<T>, action: fmt::Arguments<'_>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.line(format_args!("An error occurred while {action}: {err}"));
                None
            }
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{args}") {
            tracing::warn!(
                target: TRACING_TARGET_OUTPUT,
                error = %err,
                "Failed to write to console"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pinekit_core::{ErrorKind, Metric, MockProvider, Operation, ScoredVector};
    use serde_json::json;

    use super::*;

    fn helper() -> (MockProvider, ConsoleHelper<Vec<u8>>) {
        let mock = MockProvider::new();
        let service = PineconeService::new(mock.clone());
        (mock, ConsoleHelper::new(service, Vec::new()))
    }

    fn output(helper: &ConsoleHelper<Vec<u8>>) -> Vec<String> {
        String::from_utf8_lossy(helper.writer())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn test_create_index_prints_status() {
        let (mock, mut helper) = helper();

        let request = CreateIndexRequest::new("test", 8, Metric::Cosine);
        assert_eq!(helper.create_index(&request).await, Some(()));

        assert_eq!(
            output(&helper),
            ["Creating index named test...", "Index test created."]
        );
        assert_eq!(mock.calls_for(Operation::CreateIndex), 1);
    }

    #[tokio::test]
    async fn test_create_index_failure_prints_one_line() {
        let (mock, mut helper) = helper();
        mock.fail(Operation::CreateIndex, ErrorKind::Unauthorized);

        let request = CreateIndexRequest::new("test", 8, Metric::Cosine);
        assert_eq!(helper.create_index(&request).await, None);

        let lines = output(&helper);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Creating index named test...");
        assert!(lines[1].starts_with("An error occurred while creating the index test: "));
    }

    #[tokio::test]
    async fn test_lookup_failures_print_exactly_one_line_with_target() {
        let (mock, mut helper) = helper();
        mock.fail(Operation::DescribeIndex, ErrorKind::Unavailable);
        mock.fail(Operation::DescribeIndexStats, ErrorKind::Unavailable);
        mock.fail(Operation::Fetch, ErrorKind::Unavailable);
        mock.fail(Operation::Query, ErrorKind::Unavailable);
        mock.fail(Operation::ConfigureIndex, ErrorKind::Unavailable);
        mock.fail(Operation::DescribeCollection, ErrorKind::Unavailable);

        assert!(helper.describe_index("Books").await.is_none());
        assert!(helper.describe_index_stats("Books", None).await.is_none());
        assert!(helper.fetch_vectors("Books", &["a".to_owned()], "").await.is_none());
        let query = QueryRequest::new(vec![0.1, 0.2], 3);
        assert!(helper.query_index("Books", &query).await.is_none());
        assert!(helper.scale_replicas("Books", 2).await.is_none());
        assert!(helper.describe_collection("Snapshot").await.is_none());

        let lines = output(&helper);
        assert_eq!(lines.len(), 6);
        for line in &lines[..5] {
            assert!(line.starts_with("An error occurred while "));
            assert!(line.contains("Books"));
        }
        assert!(lines[5].contains("Snapshot"));
    }

    #[tokio::test]
    async fn test_mutation_failures_print_status_then_one_error() {
        let (mock, mut helper) = helper();
        mock.add_index("books", 2, Metric::Cosine);
        for operation in [
            Operation::Upsert,
            Operation::Update,
            Operation::DeleteVectors,
            Operation::ConfigureIndex,
            Operation::DeleteCollection,
        ] {
            mock.fail(operation, ErrorKind::Unavailable);
        }

        let vectors = [Vector::new("a", vec![0.1, 0.2])];
        assert_eq!(helper.upsert_vectors("books", &vectors, "ns").await, None);
        let update = UpdateRequest::new("a").with_values(vec![0.3, 0.4]);
        assert_eq!(helper.update_vector("books", &update).await, None);
        let ids = ["a".to_owned()];
        assert_eq!(helper.delete_vectors("books", &ids, "ns").await, None);
        let configure = ConfigureIndexRequest::replicas(2);
        assert_eq!(helper.configure_index("books", &configure).await, None);
        assert_eq!(helper.delete_collection("snap").await, None);

        assert_eq!(
            output(&helper),
            [
                "Upserting vectors...",
                "An error occurred while upserting vectors to books: \
                 Unavailable: mock failure for upsert",
                "Updating Vectors...",
                "An error occurred while updating vectors in books: \
                 Unavailable: mock failure for update",
                "Deleting vectors...",
                "An error occurred while deleting vectors from books: \
                 Unavailable: mock failure for delete_vectors",
                "An error occurred while configuring the index books: \
                 Unavailable: mock failure for configure_index",
                "Deleting collection snap...",
                "An error occurred while deleting the collection snap: \
                 Unavailable: mock failure for delete_collection",
            ]
        );
        assert_eq!(mock.calls_for(Operation::Upsert), 1);
        assert_eq!(mock.calls_for(Operation::DeleteCollection), 1);
    }

    #[tokio::test]
    async fn test_list_failure_returns_none() {
        let (mock, mut helper) = helper();
        mock.fail(Operation::ListIndexes, ErrorKind::RateLimited);
        mock.fail(Operation::ListCollections, ErrorKind::RateLimited);

        assert_eq!(helper.list_indexes().await, None);
        assert_eq!(helper.list_collections().await, None);
        assert_eq!(
            output(&helper),
            [
                "An error occurred while listing indexes: \
                 RateLimited: mock failure for list_indexes",
                "An error occurred while listing collections: \
                 RateLimited: mock failure for list_collections",
            ]
        );
    }

    #[tokio::test]
    async fn test_vector_operations() {
        let (mock, mut helper) = helper();
        mock.add_index("books", 2, Metric::Cosine);
        mock.set_query_matches(vec![ScoredVector {
            id: "a".into(),
            score: 0.9,
            values: None,
            metadata: None,
        }]);

        let vectors = [Vector::new("a", vec![0.1, 0.2]).with_field("genre", json!("drama"))];
        let upserted = helper.upsert_vectors("books", &vectors, "ns").await.unwrap();
        assert_eq!(upserted.upserted_count, 1);

        let fetched = helper.fetch_vectors("books", &["a".to_owned()], "ns").await.unwrap();
        assert!(fetched.vectors.contains_key("a"));

        let update = UpdateRequest::new("a")
            .with_values(vec![0.3, 0.4])
            .with_namespace("ns");
        assert_eq!(helper.update_vector("books", &update).await, Some(()));

        let query = QueryRequest::new(vec![0.1, 0.2], 1).with_namespace("ns");
        let response = helper.query_index("books", &query).await.unwrap();
        assert_eq!(response.matches.len(), 1);

        assert_eq!(
            helper.delete_vectors("books", &["a".to_owned()], "ns").await,
            Some(())
        );

        assert_eq!(
            output(&helper),
            ["Upserting vectors...", "Updating Vectors...", "Deleting vectors..."]
        );
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let (mock, mut helper) = helper();
        mock.add_index("books", 2, Metric::Cosine);

        assert_eq!(helper.create_collection("snap", "books").await, Some(()));
        assert_eq!(helper.list_collections().await, Some(vec!["snap".to_owned()]));
        assert_eq!(helper.delete_collection("snap").await, Some(()));

        assert_eq!(
            output(&helper),
            [
                "Creating snap collection...",
                "Collection created.",
                "Deleting collection snap...",
                "Collection deleted.",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_collection_failure_names_source() {
        let (mock, mut helper) = helper();
        mock.fail(Operation::CreateCollection, ErrorKind::Conflict);

        assert_eq!(helper.create_collection("snap", "books").await, None);
        let lines = output(&helper);
        assert_eq!(lines.len(), 2);
        let expected = "An error occurred while creating collection snap from books: ";
        assert!(lines[1].starts_with(expected));
    }

    #[tokio::test]
    async fn test_local_validation_is_reported() {
        let (mock, mut helper) = helper();

        assert_eq!(helper.scale_replicas("books", 0).await, None);
        assert!(output(&helper)[0].contains("scaling replicas for books"));
        assert_eq!(mock.calls_for(Operation::ConfigureIndex), 0);
    }

    #[test]
    fn test_print_none() {
        let (_, mut helper) = helper();
        helper.print_debug::<Vec<String>>(None);
        helper.print_json::<Vec<String>>(None);
        assert_eq!(output(&helper), ["None", "None"]);
    }

    #[test]
    fn test_print_debug_matches_list_format() {
        let (_, mut helper) = helper();
        helper.print_debug(Some(&Vec::<String>::new()));
        helper.print_debug(Some(&vec!["test".to_owned()]));
        assert_eq!(output(&helper), ["[]", "[\"test\"]"]);
    }
}
