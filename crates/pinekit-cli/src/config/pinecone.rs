//! Pinecone connection configuration.

use std::time::Duration;

use anyhow::{Context, Result as AnyhowResult, anyhow};
use clap::Args;
use pinekit_core::PineconeService;
use pinekit_reqwest::{PineconeClient, PineconeConfig};
use url::Url;

use crate::TRACING_TARGET_CONFIG;

/// Pinecone connection configuration.
///
/// # Environment Variables
///
/// - `PINECONE_API_KEY` - API key sent with every request
/// - `PINECONE_ENVIRONMENT` - Deployment environment, e.g. `us-west1-gcp`
/// - `PINECONE_CONTROLLER_URL` - Overrides the controller base URL
/// - `PINECONE_DATA_PLANE_URL` - Overrides the data-plane base URL of every index
/// - `PINECONE_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
///
/// # Examples
///
/// ```bash
/// PINECONE_API_KEY=... PINECONE_ENVIRONMENT=us-west1-gcp pinekit index list
/// ```
#[derive(Clone, Args)]
pub struct PineconeArgs {
    /// API key used to authenticate with Pinecone.
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pinecone deployment environment.
    #[arg(long, env = "PINECONE_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Controller base URL, for proxies and local emulators.
    #[arg(long, env = "PINECONE_CONTROLLER_URL")]
    pub controller_url: Option<Url>,

    /// Data-plane base URL used for every index instead of the derived host.
    #[arg(long, env = "PINECONE_DATA_PLANE_URL")]
    pub data_plane_url: Option<Url>,

    /// Maximum time in seconds to wait for a single request.
    #[arg(long, env = "PINECONE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for PineconeArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeArgs")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("environment", &self.environment)
            .field("controller_url", &self.controller_url)
            .field("data_plane_url", &self.data_plane_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl PineconeArgs {
    /// Builds the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or environment is missing, or if the
    /// resulting configuration fails validation.
    pub fn to_config(&self) -> AnyhowResult<PineconeConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("PINECONE_API_KEY is not set"))?;
        let environment = self
            .environment
            .clone()
            .ok_or_else(|| anyhow!("PINECONE_ENVIRONMENT is not set"))?;

        let mut builder = PineconeConfig::builder()
            .with_api_key(api_key)
            .with_environment(environment)
            .with_timeout(Duration::from_secs(self.timeout_secs));

        if let Some(url) = &self.controller_url {
            builder = builder.with_controller_url(url.clone());
        }
        if let Some(url) = &self.data_plane_url {
            builder = builder.with_data_plane_url(url.clone());
        }

        builder.build().context("invalid Pinecone configuration")
    }

    /// Creates the Pinecone service backed by the REST client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn create_service(&self) -> AnyhowResult<PineconeService> {
        let config = self.to_config()?;
        let client = PineconeClient::new(config).context("failed to create Pinecone client")?;
        Ok(client.into_service())
    }

    /// Logs the connection configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            environment = ?self.environment,
            controller_url = ?self.controller_url.as_ref().map(Url::as_str),
            data_plane_url = ?self.data_plane_url.as_ref().map(Url::as_str),
            timeout_secs = self.timeout_secs,
            api_key_set = self.api_key.is_some(),
            "Pinecone configuration"
        );
    }
}
