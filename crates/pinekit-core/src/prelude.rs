//! Commonly used items from pinekit-core.
//!
//! ```rust,ignore
//! use pinekit_core::prelude::*;
//! ```

#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::mock::{MockCall, MockProvider};
pub use crate::types::{
    CollectionDescription, CreateIndexRequest, FetchResponse, IndexDescription, IndexStats,
    Metric, QueryRequest, QueryResponse, UpdateRequest, UpsertResponse, Vector,
};
pub use crate::{Error, ErrorKind, Operation, PineconeProvider, PineconeService, Result};
