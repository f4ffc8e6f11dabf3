//! Pinecone client configuration.

use std::fmt;
use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing connections: 10 seconds.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Pinecone client.
///
/// The API key and environment are required; everything else has a default.
#[derive(Clone, Builder)]
#[builder(
    name = "PineconeBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct PineconeConfig {
    /// API key sent in the `Api-Key` header.
    pub api_key: String,
    /// Deployment environment, e.g. `us-west1-gcp`.
    pub environment: String,
    /// Overrides the controller base URL derived from the environment.
    #[builder(default)]
    pub controller_url: Option<Url>,
    /// Overrides the data-plane base URL of every index, e.g. for a local
    /// emulator. The project lookup is skipped when set.
    #[builder(default)]
    pub data_plane_url: Option<Url>,
    /// Request timeout duration.
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout: Duration,
    /// Connection timeout duration.
    #[builder(default = "DEFAULT_CONNECT_TIMEOUT")]
    pub connect_timeout: Duration,
    /// User agent string for requests.
    #[builder(default = "PineconeConfig::default_user_agent()")]
    pub user_agent: String,
}

impl fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("controller_url", &self.controller_url)
            .field("data_plane_url", &self.data_plane_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl PineconeConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PineconeBuilder {
        PineconeBuilder::default()
    }

    fn default_user_agent() -> String {
        format!("pinekit/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the controller base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment does not form a valid host name.
    pub fn controller_base(&self) -> Result<Url> {
        match &self.controller_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(&format!(
                "https://controller.{}.pinecone.io",
                self.environment
            ))?),
        }
    }

    /// Returns the data-plane base URL of an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index, project or environment do not form a
    /// valid host name.
    pub fn data_plane_base(&self, index: &str, project: &str) -> Result<Url> {
        let url = Url::parse(&format!(
            "https://{index}-{project}.svc.{}.pinecone.io",
            self.environment
        ))?;
        Ok(url)
    }
}

impl PineconeBuilder {
    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(api_key) = &self.api_key
            && api_key.trim().is_empty()
        {
            return Err("API key must not be empty".to_string());
        }

        if let Some(environment) = &self.environment
            && environment.trim().is_empty()
        {
            return Err("Environment must not be empty".to_string());
        }

        if let Some(timeout) = &self.timeout
            && timeout.is_zero()
        {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some(connect_timeout) = &self.connect_timeout
            && connect_timeout.is_zero()
        {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl From<PineconeBuilderError> for Error {
    fn from(err: PineconeBuilderError) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PineconeBuilder {
        PineconeConfig::builder()
            .with_api_key("secret")
            .with_environment("us-west1-gcp")
    }

    #[test]
    fn test_config_defaults() {
        let config = builder().build().expect("Valid config");

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent.starts_with("pinekit/"));
        assert!(config.controller_url.is_none());
        assert!(config.data_plane_url.is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let result = PineconeConfig::builder()
            .with_environment("us-west1-gcp")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_environment() {
        let result = builder().with_environment("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = builder().with_timeout(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_controller_base_from_environment() {
        let config = builder().build().unwrap();
        assert_eq!(
            config.controller_base().unwrap().as_str(),
            "https://controller.us-west1-gcp.pinecone.io/"
        );
    }

    #[test]
    fn test_controller_base_override() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        let config = builder().with_controller_url(url.clone()).build().unwrap();
        assert_eq!(config.controller_base().unwrap(), url);
    }

    #[test]
    fn test_data_plane_base() {
        let config = builder().build().unwrap();
        assert_eq!(
            config.data_plane_base("test", "abc123").unwrap().as_str(),
            "https://test-abc123.svc.us-west1-gcp.pinecone.io/"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = builder().build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
