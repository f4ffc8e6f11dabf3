#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod demo;
mod helper;
mod telemetry;

use std::process;

use anyhow::Context;
use pinekit_core::CreateIndexRequest;

use crate::config::{Cli, Command};
use crate::helper::ConsoleHelper;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "pinekit_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "pinekit_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "pinekit_cli::config";
pub const TRACING_TARGET_DEMO: &str = "pinekit_cli::demo";
pub const TRACING_TARGET_OUTPUT: &str = "pinekit_cli::output";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "pinekit finished successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "pinekit terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
///
/// Only configuration and client construction errors are returned; failed
/// remote operations are printed by the [`ConsoleHelper`] and do not abort.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let service = cli.pinecone.create_service()?;
    let mut helper = ConsoleHelper::stdout(service);

    match cli.selected_command() {
        Command::Demo => {
            let dimension = cli.demo.dimension().context("invalid demo configuration")?;
            let index_name = cli.demo.index_name.clone();
            let request = CreateIndexRequest::new(index_name, dimension, cli.demo.index_metric);
            demo::run(&mut helper, &request, cli.demo.ready_timeout()).await;
        }
        Command::Index(command) => command.run(&mut helper).await,
        Command::Vector(command) => command.run(&mut helper).await,
        Command::Collection(command) => command.run(&mut helper).await,
    }

    Ok(())
}
