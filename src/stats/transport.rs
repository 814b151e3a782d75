//! Node Transport
//!
//! Delivers a `NodeStatsRequest` to one node and brings back its response or
//! the reason there is none. The local node is served in-process; every
//! other node is called over its internal HTTP endpoint.

use super::error::NodeError;
use super::node::NodeStatsExecutor;
use super::protocol::{ENDPOINT_NODE_STATS, NodeErrorBody, NodeStatsRequest, NodeStatsResponse};
use crate::membership::types::Node;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait NodeTransport: Send + Sync {
    async fn node_stats(
        &self,
        node: &Node,
        request: &NodeStatsRequest,
    ) -> Result<NodeStatsResponse, NodeError>;
}

pub struct HttpTransport {
    local: Arc<NodeStatsExecutor>,
    http_client: reqwest::Client,
    timeout: Duration,
    /// Send attempts per node call; 1 disables retries.
    attempts: usize,
}

impl HttpTransport {
    pub fn new(local: Arc<NodeStatsExecutor>, timeout: Duration, attempts: usize) -> Self {
        Self {
            local,
            http_client: reqwest::Client::new(),
            timeout,
            attempts: attempts.max(1),
        }
    }

    async fn post_with_retry<T: serde::Serialize>(
        &self,
        url: String,
        payload: &T,
    ) -> Result<reqwest::Response, NodeError> {
        let mut delay_ms = 150u64;

        for attempt in 0..self.attempts {
            let response = self
                .http_client
                .post(url.clone())
                .json(payload)
                .timeout(self.timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    // Only a refused or failed connection is worth another attempt.
                    if !e.is_connect() || attempt + 1 == self.attempts {
                        return Err(self.classify(e));
                    }
                    tracing::debug!("Attempt {} to {} failed: {}", attempt + 1, url, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(NodeError::Unreachable("retry attempts exhausted".to_string()))
    }

    fn classify(&self, error: reqwest::Error) -> NodeError {
        if error.is_timeout() {
            NodeError::Timeout(self.timeout.as_millis() as u64)
        } else {
            NodeError::Unreachable(error.to_string())
        }
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn node_stats(
        &self,
        node: &Node,
        request: &NodeStatsRequest,
    ) -> Result<NodeStatsResponse, NodeError> {
        if &node.id == self.local.node_id() {
            tracing::trace!("Serving follow stats for local node {}", node.id);
            return self.local.execute_blocking(request.clone()).await;
        }

        let url = format!("{}{}", node.base_url(), ENDPOINT_NODE_STATS);
        let response = self.post_with_retry(url, request).await?;
        let status = response.status();

        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<NodeErrorBody>(&body) {
                Ok(rejection) => rejection.error,
                Err(_) => NodeError::Remote {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let node_response: NodeStatsResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.classify(e)
                } else {
                    NodeError::Decode(e.to_string())
                }
            })?;

        if node_response.node_id != node.id {
            return Err(NodeError::Decode(format!(
                "expected answer from {}, got {}",
                node.id, node_response.node_id
            )));
        }

        Ok(node_response)
    }
}
