#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "pinekit_reqwest::client";

/// Tracing target for individual HTTP requests and responses.
pub const TRACING_TARGET_HTTP: &str = "pinekit_reqwest::http";

mod client;
mod config;
mod error;
mod wire;

pub use crate::client::PineconeClient;
pub use crate::config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT, PineconeBuilder, PineconeBuilderError,
    PineconeConfig,
};
pub use crate::error::{Error, Result};
