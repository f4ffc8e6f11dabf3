#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for service-level operations.
///
/// Use this target for logging remote calls made through [`PineconeService`],
/// their outcome and latency.
pub const TRACING_TARGET_SERVICE: &str = "pinekit_core::service";

mod error;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
#[doc(hidden)]
pub mod prelude;
mod provider;
mod service;
pub mod types;

pub use error::{BoxedError, Error, ErrorKind, Result};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockCall, MockProvider};
pub use provider::{Operation, PineconeProvider};
pub use service::PineconeService;
pub use types::{
    CollectionDescription, ConfigureIndexRequest, CreateCollectionRequest, CreateIndexRequest,
    FetchResponse, Filter, IndexDescription, IndexStats, IndexStatus, Metadata, MetadataConfig,
    Metric, NamespaceSummary, QueryRequest, QueryResponse, ScoredVector, UpdateRequest,
    UpsertResponse, Vector,
};
