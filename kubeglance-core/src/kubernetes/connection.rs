//! Connection capability
//!
//! Everything [`Cluster`](super::cluster::Cluster) needs from the outside world:
//! a dialed API client and read access to the active kubeconfig selection.
//! [`KubeConnection`](super::client::KubeConnection) is the production
//! implementation; tests substitute in-memory doubles.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::ListParams;

use super::error::K8sResult;

/// Source of a dialed client and the active configuration
pub trait Connection: Send + Sync {
    type Client: ApiClient;
    type Config: ConfigAccess;

    /// Ready API client.
    ///
    /// Dialing happens when the connection is built, so a value of this
    /// type always holds a usable client.
    fn dial(&self) -> &Self::Client;

    /// Active configuration selection
    fn config(&self) -> &Self::Config;
}

/// Remote calls issued against the API server
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Server version reported by the discovery endpoint
    async fn server_version(&self) -> K8sResult<Info>;

    /// Nodes matching `params`, in the order returned by the server
    async fn list_nodes(&self, params: &ListParams) -> K8sResult<Vec<Node>>;
}

/// Resolvers over the active kubeconfig selection
pub trait ConfigAccess: Send + Sync {
    fn current_context_name(&self) -> K8sResult<String>;
    fn current_cluster_name(&self) -> K8sResult<String>;
    fn current_user_name(&self) -> K8sResult<String>;
}
