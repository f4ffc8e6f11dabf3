//! Request and response bodies that differ from the pinekit-core types.

use pinekit_core::{Filter, IndexDescription, IndexStatus, MetadataConfig, Metric, Vector};
use serde::{Deserialize, Serialize};

/// Response of `GET /actions/whoami`.
#[derive(Debug, Deserialize)]
pub(crate) struct WhoAmI {
    pub project_name: String,
}

/// Response of `GET /databases/{name}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DescribeIndexBody {
    pub database: DatabaseBody,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseBody {
    pub name: String,
    pub dimension: u32,
    pub metric: Metric,
    #[serde(default)]
    pub replicas: Option<u32>,
    #[serde(default)]
    pub shards: Option<u32>,
    #[serde(default)]
    pub pods: Option<u32>,
    #[serde(default)]
    pub pod_type: Option<String>,
    #[serde(default)]
    pub metadata_config: Option<MetadataConfig>,
}

impl From<DescribeIndexBody> for IndexDescription {
    fn from(body: DescribeIndexBody) -> Self {
        let database = body.database;
        Self {
            name: database.name,
            dimension: database.dimension,
            metric: database.metric,
            replicas: database.replicas,
            shards: database.shards,
            pods: database.pods,
            pod_type: database.pod_type,
            metadata_config: database.metadata_config,
            status: body.status,
        }
    }
}

/// Body of `POST /vectors/upsert`.
#[derive(Debug, Serialize)]
pub(crate) struct UpsertBody<'a> {
    pub vectors: &'a [Vector],
    pub namespace: &'a str,
}

/// Body of `POST /vectors/delete`.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    pub ids: &'a [String],
    pub namespace: &'a str,
}

/// Body of `POST /describe_index_stats`.
#[derive(Debug, Serialize)]
pub(crate) struct StatsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Filter>,
}
