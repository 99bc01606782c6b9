//! Common types shared between kubeglance-core and its consumers

use serde::{Deserialize, Serialize};

/// Placeholder shown when a cluster attribute cannot be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Identity and version of the cluster the active configuration points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMeta {
    /// Active kubeconfig context
    pub context: String,
    /// Cluster referenced by the active context
    pub cluster: String,
    /// User referenced by the active context
    pub user: String,
    /// API server git version (e.g., "v1.28.2")
    pub version: String,
}

impl ClusterMeta {
    /// Record with every field set to [`NOT_AVAILABLE`]
    pub fn unavailable() -> Self {
        Self {
            context: NOT_AVAILABLE.to_string(),
            cluster: NOT_AVAILABLE.to_string(),
            user: NOT_AVAILABLE.to_string(),
            version: NOT_AVAILABLE.to_string(),
        }
    }
}

impl Default for ClusterMeta {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// Simplified node information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub status: NodeStatus,
    pub roles: Vec<String>,
    pub internal_ip: Option<String>,
    pub external_ip: Option<String>,
    pub os_image: String,
    pub kernel_version: String,
    pub container_runtime: String,
    pub kubelet_version: String,
    pub allocatable_cpu: String,
    pub allocatable_memory: String,
    pub conditions: Vec<NodeCondition>,
    pub created_at: Option<String>,
}

/// Node readiness as reported by the `Ready` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Ready,
    NotReady,
    Unknown,
}

impl Default for NodeStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::NotReady => write!(f, "NotReady"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Node condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCondition {
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}
