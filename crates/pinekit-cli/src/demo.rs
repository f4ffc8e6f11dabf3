//! Demonstration sequence run by `pinekit demo`.

use std::io::Write;
use std::time::Duration;

use pinekit_core::CreateIndexRequest;

use crate::TRACING_TARGET_DEMO;
use crate::helper::ConsoleHelper;

/// Lists indexes, creates the demo index, lists again, describes it and
/// deletes it.
///
/// Every step runs even if an earlier one failed. When `ready_timeout` is set
/// the index is polled until ready between the create and the second list.
pub async fn run<W: Write>(
    helper: &mut ConsoleHelper<W>,
    request: &CreateIndexRequest,
    ready_timeout: Option<Duration>,
) {
    let name = request.name.as_str();
    tracing::info!(
        target: TRACING_TARGET_DEMO,
        index = %name,
        dimension = request.dimension,
        metric = %request.metric,
        "Running demo"
    );

    let indexes = helper.list_indexes().await;
    helper.print_debug(indexes.as_ref());

    let created = helper.create_index(request).await.is_some();

    if created && let Some(timeout) = ready_timeout {
        helper.wait_for_index_ready(name, timeout).await;
    }

    let indexes = helper.list_indexes().await;
    helper.print_debug(indexes.as_ref());

    let info = helper.describe_index(name).await;
    helper.print_debug(info.as_ref());

    helper.delete_index(name).await;

    tracing::info!(target: TRACING_TARGET_DEMO, index = %name, "Demo finished");
}
