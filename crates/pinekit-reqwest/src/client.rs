//! Reqwest-based client for the Pinecone REST API.

use std::sync::Arc;

use pinekit_core::{
    CollectionDescription, ConfigureIndexRequest, CreateCollectionRequest, CreateIndexRequest,
    FetchResponse, Filter, IndexDescription, IndexStats, PineconeProvider, PineconeService,
    QueryRequest, QueryResponse, UpdateRequest, UpsertResponse, Vector,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::PineconeConfig;
use crate::error::{Error, Result};
use crate::wire::{DeleteBody, DescribeIndexBody, StatsBody, UpsertBody, WhoAmI};
use crate::{TRACING_TARGET_CLIENT, TRACING_TARGET_HTTP};

/// Inner client that holds the HTTP client and configuration.
struct PineconeClientInner {
    http: Client,
    config: PineconeConfig,
    controller: Url,
    project: OnceCell<String>,
}

/// Client for the Pinecone REST API.
///
/// Implements [`PineconeProvider`] by issuing one HTTP request per operation.
/// Cloning is cheap and clones share the connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use pinekit_reqwest::{PineconeClient, PineconeConfig};
///
/// let config = PineconeConfig::builder()
///     .with_api_key("...")
///     .with_environment("us-west1-gcp")
///     .build()?;
///
/// let service = PineconeClient::new(config)?.into_service();
/// let indexes = service.list_indexes().await?;
/// ```
#[derive(Clone)]
pub struct PineconeClient {
    inner: Arc<PineconeClientInner>,
}

impl std::fmt::Debug for PineconeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl PineconeClient {
    /// Creates a new client with the given configuration.
    ///
    /// No request is made until the first operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: PineconeConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            environment = %config.environment,
            timeout_ms = config.timeout.as_millis(),
            "Creating Pinecone client"
        );

        let controller = config.controller_base()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let inner = PineconeClientInner {
            http,
            config,
            controller,
            project: OnceCell::new(),
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            controller = %inner.controller,
            "Pinecone client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &PineconeConfig {
        &self.inner.config
    }

    /// Converts this client into a [`PineconeService`] handle.
    pub fn into_service(self) -> PineconeService {
        PineconeService::new(self)
    }

    /// Returns the project name, asking the controller on first use.
    async fn project_name(&self) -> pinekit_core::Result<&str> {
        let project = self
            .inner
            .project
            .get_or_try_init(|| async {
                let url = self.controller_url(&["actions", "whoami"])?;
                let whoami: WhoAmI = self.send(self.request(Method::GET, url)).await?;

                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    project = %whoami.project_name,
                    "Resolved Pinecone project"
                );
                Ok::<_, pinekit_core::Error>(whoami.project_name)
            })
            .await?;

        Ok(project.as_str())
    }

    fn controller_url(&self, segments: &[&str]) -> Result<Url> {
        with_segments(&self.inner.controller, segments)
    }

    async fn data_plane_url(&self, index: &str, segments: &[&str]) -> pinekit_core::Result<Url> {
        let base = match &self.inner.config.data_plane_url {
            Some(url) => url.clone(),
            None => {
                let project = self.project_name().await?;
                self.inner.config.data_plane_base(index, project)?
            }
        };
        Ok(with_segments(&base, segments)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(
            target: TRACING_TARGET_HTTP,
            method = %method,
            url = %url,
            "Sending request"
        );

        self.inner
            .http
            .request(method, url)
            .header("Api-Key", &self.inner.config.api_key)
            .header("Accept", "application/json")
    }

    /// Sends a request and maps non-2xx responses to errors.
    async fn execute(&self, request: RequestBuilder) -> pinekit_core::Result<Response> {
        let response = request.send().await.map_err(Error::from)?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(
                target: TRACING_TARGET_HTTP,
                status = status.as_u16(),
                "Request succeeded"
            );
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            target: TRACING_TARGET_HTTP,
            status = status.as_u16(),
            body = %body,
            "Request failed"
        );

        Err(pinekit_core::Error::from_status(status.as_u16(), body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> pinekit_core::Result<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(Error::from)?;
        let value = serde_json::from_slice(&bytes).map_err(Error::from)?;
        Ok(value)
    }

    async fn send_empty(&self, request: RequestBuilder) -> pinekit_core::Result<()> {
        self.execute(request).await?;
        Ok(())
    }
}

/// Appends percent-encoded path segments to a base URL.
fn with_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("URL '{base}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait::async_trait]
impl PineconeProvider for PineconeClient {
    async fn create_index(&self, request: &CreateIndexRequest) -> pinekit_core::Result<()> {
        let url = self.controller_url(&["databases"])?;
        self.send_empty(self.request(Method::POST, url).json(request)).await
    }

    async fn list_indexes(&self) -> pinekit_core::Result<Vec<String>> {
        let url = self.controller_url(&["databases"])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn describe_index(&self, name: &str) -> pinekit_core::Result<IndexDescription> {
        let url = self.controller_url(&["databases", name])?;
        let body: DescribeIndexBody = self.send(self.request(Method::GET, url)).await?;
        Ok(body.into())
    }

    async fn delete_index(&self, name: &str) -> pinekit_core::Result<()> {
        let url = self.controller_url(&["databases", name])?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }

    async fn configure_index(
        &self,
        name: &str,
        request: &ConfigureIndexRequest,
    ) -> pinekit_core::Result<()> {
        let url = self.controller_url(&["databases", name])?;
        self.send_empty(self.request(Method::PATCH, url).json(request)).await
    }

    async fn describe_index_stats(
        &self,
        name: &str,
        filter: Option<&Filter>,
    ) -> pinekit_core::Result<IndexStats> {
        let url = self.data_plane_url(name, &["describe_index_stats"]).await?;
        let body = StatsBody { filter };
        self.send(self.request(Method::POST, url).json(&body)).await
    }

    async fn upsert(
        &self,
        index: &str,
        vectors: &[Vector],
        namespace: &str,
    ) -> pinekit_core::Result<UpsertResponse> {
        let url = self.data_plane_url(index, &["vectors", "upsert"]).await?;
        let body = UpsertBody { vectors, namespace };
        self.send(self.request(Method::POST, url).json(&body)).await
    }

    async fn query(
        &self,
        index: &str,
        request: &QueryRequest,
    ) -> pinekit_core::Result<QueryResponse> {
        let url = self.data_plane_url(index, &["query"]).await?;
        self.send(self.request(Method::POST, url).json(request)).await
    }

    async fn fetch(
        &self,
        index: &str,
        ids: &[String],
        namespace: &str,
    ) -> pinekit_core::Result<FetchResponse> {
        let mut url = self.data_plane_url(index, &["vectors", "fetch"]).await?;
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("ids", id);
            }
            query.append_pair("namespace", namespace);
        }
        self.send(self.request(Method::GET, url)).await
    }

    async fn update(&self, index: &str, request: &UpdateRequest) -> pinekit_core::Result<()> {
        let url = self.data_plane_url(index, &["vectors", "update"]).await?;
        self.send_empty(self.request(Method::POST, url).json(request)).await
    }

    async fn delete_vectors(
        &self,
        index: &str,
        ids: &[String],
        namespace: &str,
    ) -> pinekit_core::Result<()> {
        let url = self.data_plane_url(index, &["vectors", "delete"]).await?;
        let body = DeleteBody { ids, namespace };
        self.send_empty(self.request(Method::POST, url).json(&body)).await
    }

    async fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> pinekit_core::Result<()> {
        let url = self.controller_url(&["collections"])?;
        self.send_empty(self.request(Method::POST, url).json(request)).await
    }

    async fn list_collections(&self) -> pinekit_core::Result<Vec<String>> {
        let url = self.controller_url(&["collections"])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn describe_collection(&self, name: &str) -> pinekit_core::Result<CollectionDescription> {
        let url = self.controller_url(&["collections", name])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn delete_collection(&self, name: &str) -> pinekit_core::Result<()> {
        let url = self.controller_url(&["collections", name])?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PineconeClient {
        let config = PineconeConfig::builder()
            .with_api_key("secret")
            .with_environment("us-west1-gcp")
            .build()
            .expect("Valid config");
        PineconeClient::new(config).expect("Valid client")
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.config().environment, "us-west1-gcp");
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_controller_routes() {
        let client = client();
        assert_eq!(
            client.controller_url(&["databases"]).unwrap().as_str(),
            "https://controller.us-west1-gcp.pinecone.io/databases"
        );
        assert_eq!(
            client.controller_url(&["collections", "snap"]).unwrap().as_str(),
            "https://controller.us-west1-gcp.pinecone.io/collections/snap"
        );
    }

    #[test]
    fn test_identifiers_are_percent_encoded() {
        let client = client();
        assert_eq!(
            client.controller_url(&["databases", "a/b c"]).unwrap().as_str(),
            "https://controller.us-west1-gcp.pinecone.io/databases/a%2Fb%20c"
        );
    }

    #[test]
    fn test_segments_keep_base_path() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        assert_eq!(
            with_segments(&base, &["databases", "test"]).unwrap().as_str(),
            "http://localhost:8080/api/databases/test"
        );
    }

    #[test]
    fn test_segments_reject_opaque_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(with_segments(&base, &["databases"]).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_controller_is_unavailable() {
        let config = PineconeConfig::builder()
            .with_api_key("secret")
            .with_environment("local")
            .with_controller_url(Url::parse("http://127.0.0.1:9/").unwrap())
            .build()
            .unwrap();
        let client = PineconeClient::new(config).unwrap();

        let error = client.list_indexes().await.unwrap_err();
        assert_eq!(error.kind, pinekit_core::ErrorKind::Unavailable);
    }

    /// Request as seen by [`stub_server`].
    #[derive(Debug, Clone)]
    struct Recorded {
        method: String,
        target: String,
        api_key: Option<String>,
        body: String,
    }

    type Requests = Arc<std::sync::Mutex<Vec<Recorded>>>;

    /// Serves one scripted response per connection, in order, and records
    /// every request it receives.
    async fn stub_server(responses: Vec<(u16, &'static str)>) -> (Url, Requests) {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let requests = Requests::default();

        let log = requests.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        (url, requests)
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> Recorded {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_len = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break buf.len();
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        let mut lines = head.lines();
        let mut request_line = lines.next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_owned();
        let target = request_line.next().unwrap_or_default().to_owned();

        let mut api_key = None;
        let mut content_length = 0;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "api-key" => api_key = Some(value.trim().to_owned()),
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                _ => {}
            }
        }

        while buf.len() < head_len + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        Recorded {
            method,
            target,
            api_key,
            body: String::from_utf8_lossy(&buf[head_len..]).into_owned(),
        }
    }

    fn stub_client(controller: Url, data_plane: Option<Url>) -> PineconeClient {
        let mut builder = PineconeConfig::builder()
            .with_api_key("k3y")
            .with_environment("local")
            .with_controller_url(controller);
        if let Some(url) = data_plane {
            builder = builder.with_data_plane_url(url);
        }
        PineconeClient::new(builder.build().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_controller_requests_and_status_mapping() {
        let (url, requests) = stub_server(vec![
            (200, r#"["a","B"]"#),
            (409, "index already exists"),
            (201, ""),
            (404, ""),
        ])
        .await;
        let client = stub_client(url, None);

        assert_eq!(client.list_indexes().await.unwrap(), vec!["a", "B"]);

        let request = CreateIndexRequest::new("books", 8, pinekit_core::Metric::Cosine);
        let error = client.create_index(&request).await.unwrap_err();
        assert_eq!(error.kind, pinekit_core::ErrorKind::Conflict);
        assert_eq!(error.status, Some(409));
        assert_eq!(error.to_string(), "Conflict: HTTP 409: index already exists");

        client.create_index(&request).await.unwrap();

        let error = client.describe_index("Mixed Case").await.unwrap_err();
        assert_eq!(error.kind, pinekit_core::ErrorKind::NotFound);
        assert_eq!(error.to_string(), "NotFound: HTTP 404");

        let requests = requests.lock().unwrap().clone();
        let routes: Vec<_> = requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.target))
            .collect();
        assert_eq!(
            routes,
            [
                "GET /databases",
                "POST /databases",
                "POST /databases",
                "GET /databases/Mixed%20Case",
            ]
        );
        assert!(requests.iter().all(|r| r.api_key.as_deref() == Some("k3y")));

        let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "books", "dimension": 8, "metric": "cosine" })
        );
    }

    #[tokio::test]
    async fn test_describe_index_decodes_envelope() {
        let (url, _) = stub_server(vec![(
            200,
            r#"{"database":{"name":"books","dimension":8,"metric":"euclidean","replicas":2},
                "status":{"ready":false,"state":"Initializing"}}"#,
        )])
        .await;
        let client = stub_client(url, None);

        let description = client.describe_index("books").await.unwrap();
        assert_eq!(description.name, "books");
        assert_eq!(description.metric, pinekit_core::Metric::Euclidean);
        assert_eq!(description.replicas, Some(2));
        assert!(!description.status.ready);
        assert_eq!(description.status.state, "Initializing");
    }

    #[tokio::test]
    async fn test_fetch_sends_ids_and_namespace_to_data_plane() {
        let (url, requests) = stub_server(vec![(
            200,
            r#"{"vectors":{"a":{"id":"a","values":[0.5]}},"namespace":"ns"}"#,
        )])
        .await;
        let controller = Url::parse("http://127.0.0.1:9/").unwrap();
        let client = stub_client(controller, Some(url));

        let ids = ["a".to_owned(), "b c".to_owned()];
        let response = client.fetch("books", &ids, "ns").await.unwrap();
        assert_eq!(response.vectors["a"].values, vec![0.5]);

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].target, "/vectors/fetch?ids=a&ids=b+c&namespace=ns");
        assert_eq!(requests[0].api_key.as_deref(), Some("k3y"));
    }

    #[tokio::test]
    async fn test_project_lookup_is_memoised() {
        let (url, requests) = stub_server(vec![(200, r#"{"project_name":"abc123"}"#)]).await;
        let client = stub_client(url, None);

        let first = client.data_plane_url("books", &["query"]).await.unwrap();
        let second = client.data_plane_url("books", &["vectors", "upsert"]).await.unwrap();
        assert_eq!(first.as_str(), "https://books-abc123.svc.local.pinecone.io/query");
        assert_eq!(
            second.as_str(),
            "https://books-abc123.svc.local.pinecone.io/vectors/upsert"
        );

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, "/actions/whoami");
    }

    #[tokio::test]
    async fn test_data_plane_override_skips_project_lookup() {
        let (url, requests) = stub_server(vec![(200, r#"{"upsertedCount":1}"#)]).await;
        let controller = Url::parse("http://127.0.0.1:9/").unwrap();
        let client = stub_client(controller, Some(url));

        let vectors = [Vector::new("a", vec![0.5])];
        let response = client.upsert("books", &vectors, "ns").await.unwrap();
        assert_eq!(response.upserted_count, 1);

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, "/vectors/upsert");
    }
}
