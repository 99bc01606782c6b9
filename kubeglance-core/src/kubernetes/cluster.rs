//! Cluster facade
//!
//! Read-only view of the cluster a [`Connection`] points at. Version and node
//! queries propagate failures; identity queries degrade to [`NOT_AVAILABLE`].

use k8s_openapi::api::core::v1::Node;
use kube::api::ListParams;
use kubeglance_common::{ClusterMeta, NodeInfo, NOT_AVAILABLE};
use std::sync::Arc;
use tracing::Dispatch;

use super::connection::{ApiClient, ConfigAccess, Connection};
use super::error::{K8sError, K8sResult};
use super::nodes::node_to_info;

/// Kubernetes cluster seen through a connection
///
/// Holds no state of its own: every accessor issues exactly one call through
/// the connection. Diagnostics go to the injected `logger`, never to the
/// global subscriber.
pub struct Cluster<C> {
    connection: Arc<C>,
    logger: Dispatch,
}

impl<C: Connection> Cluster<C> {
    pub fn new(connection: Arc<C>, logger: Dispatch) -> Self {
        Self { connection, logger }
    }

    /// Underlying connection
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// API server git version
    pub async fn version(&self) -> K8sResult<String> {
        match self.connection.dial().server_version().await {
            Ok(info) => Ok(info.git_version),
            Err(e) => {
                self.warn(&e);
                Err(e)
            }
        }
    }

    /// Active context name, or `N/A`
    pub fn context_name(&self) -> String {
        self.or_not_available(self.connection.config().current_context_name())
    }

    /// Active cluster name, or `N/A`
    pub fn cluster_name(&self) -> String {
        self.or_not_available(self.connection.config().current_cluster_name())
    }

    /// Active user name, or `N/A`
    pub fn user_name(&self) -> String {
        self.or_not_available(self.connection.config().current_user_name())
    }

    /// All nodes, in server order.
    ///
    /// Issues a single unfiltered list request; no continuation tokens are
    /// followed, so the server's default page bound applies.
    pub async fn fetch_nodes(&self) -> K8sResult<Vec<Node>> {
        self.connection
            .dial()
            .list_nodes(&ListParams::default())
            .await
    }

    /// Display summaries of [`fetch_nodes`](Self::fetch_nodes)
    pub async fn node_summaries(&self) -> K8sResult<Vec<NodeInfo>> {
        let nodes = self.fetch_nodes().await?;
        Ok(nodes.iter().map(node_to_info).collect())
    }

    /// Identity and version in one record; a failed version shows as `N/A`
    pub async fn meta(&self) -> ClusterMeta {
        ClusterMeta {
            context: self.context_name(),
            cluster: self.cluster_name(),
            user: self.user_name(),
            version: self
                .version()
                .await
                .unwrap_or_else(|_| NOT_AVAILABLE.to_string()),
        }
    }

    fn or_not_available(&self, resolved: K8sResult<String>) -> String {
        resolved.unwrap_or_else(|e| {
            self.warn(&e);
            NOT_AVAILABLE.to_string()
        })
    }

    fn warn(&self, err: &K8sError) {
        tracing::dispatcher::with_default(&self.logger, || {
            tracing::warn!("{}", err);
        });
    }
}

impl<C> Clone for Cluster<C> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            logger: self.logger.clone(),
        }
    }
}
