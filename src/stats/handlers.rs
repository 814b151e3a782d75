use super::aggregator::ClusterStatsAggregator;
use super::error::StatsError;
use super::node::NodeStatsExecutor;
use super::protocol::*;
use super::request::StatsRequest;
use super::resolver::IndexResolver;
use crate::membership::service::Membership;
use crate::tasks::registry::LocalTaskRegistry;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

/// Internal endpoint: runs the node-local part of a follow stats query.
pub async fn handle_node_stats(
    Extension(executor): Extension<Arc<NodeStatsExecutor>>,
    Json(req): Json<NodeStatsRequest>,
) -> Response {
    match executor.execute_blocking(req).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => {
            tracing::warn!("Node-level follow stats failed: {}", error);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NodeErrorBody {
                    node_id: executor.node_id().clone(),
                    error,
                }),
            )
                .into_response()
        }
    }
}

/// Public endpoint: cluster-wide follow stats.
///
/// Index patterns are resolved here, once, on the coordinating node. An
/// unknown index or a malformed pattern is answered directly and never
/// reaches the aggregator.
pub async fn handle_follow_stats(
    Extension(aggregator): Extension<Arc<ClusterStatsAggregator>>,
    Extension(resolver): Extension<Arc<dyn IndexResolver>>,
    Query(params): Query<FollowStatsParams>,
) -> Response {
    let request = match params.index.as_deref() {
        Some(csv) => StatsRequest::from_csv(csv),
        None => StatsRequest::all(),
    };

    let indices = match resolver.resolve(&request) {
        Ok(indices) => indices,
        Err(e) => {
            tracing::warn!("Follow stats request not resolvable: {}", e);
            return error_response(e);
        }
    };

    match aggregator.execute(&indices).await {
        Ok(responses) => (StatusCode::OK, Json(FollowStatsView::from(responses))).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: StatsError) -> Response {
    let status = match error {
        StatsError::Compliance { .. } => StatusCode::FORBIDDEN,
        StatsError::IndexNotFound(_) => StatusCode::NOT_FOUND,
        StatsError::InvalidPattern { .. } => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn handle_health(
    Extension(membership): Extension<Arc<Membership>>,
    Extension(registry): Extension<Arc<LocalTaskRegistry>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        node_id: membership.local_node.id.clone(),
        members: membership.member_count(),
        running_tasks: registry.len(),
    })
}
