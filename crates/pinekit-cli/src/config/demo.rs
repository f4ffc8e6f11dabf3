//! Demo index configuration.

use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use pinekit_core::Metric;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Settings for the index created by `pinekit demo`.
///
/// # Environment Variables
///
/// - `INDEX_DIMENSION` - Vector dimension of the demo index (required by the demo)
/// - `INDEX_METRIC` - Distance metric: `cosine`, `euclidean` or `dotproduct` (default: cosine)
/// - `INDEX_NAME` - Name of the demo index (default: test)
/// - `READY_TIMEOUT_SECS` - Seconds to wait for the index to become ready (default: 0, disabled)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct DemoConfig {
    /// Vector dimension of the demo index.
    #[arg(long, env = "INDEX_DIMENSION")]
    pub index_dimension: Option<u32>,

    /// Distance metric of the demo index.
    #[arg(long, env = "INDEX_METRIC", default_value_t = Metric::Cosine)]
    #[serde(default)]
    pub index_metric: Metric,

    /// Name of the demo index.
    #[arg(long, env = "INDEX_NAME", default_value = "test")]
    pub index_name: String,

    /// Seconds to wait for the demo index to report ready after creation.
    ///
    /// Zero skips the wait.
    #[arg(long, env = "READY_TIMEOUT_SECS", default_value_t = 0)]
    #[serde(default)]
    pub ready_timeout_secs: u64,
}

impl DemoConfig {
    /// Returns the configured dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `INDEX_DIMENSION` is not set.
    pub fn dimension(&self) -> AnyhowResult<u32> {
        self.index_dimension
            .ok_or_else(|| anyhow!("INDEX_DIMENSION is not set"))
    }

    /// Returns the ready-wait timeout, or `None` when disabled.
    pub fn ready_timeout(&self) -> Option<Duration> {
        (self.ready_timeout_secs > 0).then(|| Duration::from_secs(self.ready_timeout_secs))
    }

    /// Logs the demo configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            index_name = %self.index_name,
            index_dimension = ?self.index_dimension,
            index_metric = %self.index_metric,
            ready_timeout_secs = self.ready_timeout_secs,
            "Demo configuration"
        );
    }
}
