//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── pinecone: PineconeArgs   # API key, environment, timeouts
//! ├── demo: DemoConfig         # Demo index name, dimension, metric
//! └── command: Option<Command> # Defaults to `demo`
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Run the demo sequence
//! PINECONE_API_KEY=... PINECONE_ENVIRONMENT=us-west1-gcp INDEX_DIMENSION=8 pinekit
//!
//! # Or a single operation
//! pinekit --api-key ... --environment us-west1-gcp index describe books
//! ```

mod demo;
mod pinecone;

use std::process;

use clap::{Parser, Subcommand};
pub use demo::DemoConfig;
pub use pinecone::PineconeArgs;

use crate::TRACING_TARGET_STARTUP;
use crate::command::{CollectionCommand, IndexCommand, VectorCommand};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "pinekit")]
#[command(about = "Manage Pinecone indexes, vectors and collections")]
#[command(version)]
pub struct Cli {
    /// Pinecone connection configuration.
    #[clap(flatten)]
    pub pinecone: PineconeArgs,

    /// Demo index configuration.
    #[clap(flatten)]
    pub demo: DemoConfig,

    /// Operation to run; the demo sequence when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List, create, describe and delete a demo index.
    Demo,
    /// Index management.
    #[command(subcommand)]
    Index(IndexCommand),
    /// Vector operations.
    #[command(subcommand)]
    Vector(VectorCommand),
    /// Collection management.
    #[command(subcommand)]
    Collection(CollectionCommand),
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read first so clap's `env` lookups see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Returns the command to run.
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.pinecone.log();
        if matches!(self.selected_command(), Command::Demo) {
            self.demo.log();
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pinekit_core::Metric;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let base = ["pinekit", "--api-key", "secret", "--environment", "us-west1-gcp"];
        Cli::try_parse_from(base.iter().chain(args)).expect("Valid arguments")
    }

    #[test]
    fn test_defaults_to_demo() {
        let cli = parse(&["--index-dimension", "8"]);
        assert!(matches!(cli.selected_command(), Command::Demo));
        assert_eq!(cli.demo.index_dimension, Some(8));
        assert_eq!(cli.demo.index_name, "test");
    }

    #[test]
    fn test_metric_parsing() {
        let cli = parse(&["--index-metric", "dotproduct"]);
        assert_eq!(cli.demo.index_metric, Metric::DotProduct);

        let cli = parse(&["--index-metric", "Euclidean"]);
        assert_eq!(cli.demo.index_metric, Metric::Euclidean);

        let result = Cli::try_parse_from(["pinekit", "--index-metric", "manhattan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_index_subcommand() {
        let cli = parse(&["index", "scale", "books", "3"]);
        let Some(Command::Index(IndexCommand::Scale { name, replicas })) = cli.command else {
            panic!("expected index scale");
        };
        assert_eq!(name, "books");
        assert_eq!(replicas, 3);
    }

    #[test]
    fn test_vector_subcommand_parses_json() {
        let cli = parse(&[
            "vector",
            "upsert",
            "books",
            "--vectors",
            r#"[{"id": "a", "values": [0.1, 0.2]}]"#,
            "--namespace",
            "ns",
        ]);
        let Some(Command::Vector(VectorCommand::Upsert {
            index,
            vectors,
            namespace,
        })) = cli.command
        else {
            panic!("expected vector upsert");
        };
        assert_eq!(index, "books");
        assert_eq!(vectors.len(), 1);
        assert_eq!(namespace, "ns");
    }

    #[test]
    fn test_vector_subcommand_rejects_bad_json() {
        let result = Cli::try_parse_from([
            "pinekit", "vector", "query", "books", "--vector", "not-json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
