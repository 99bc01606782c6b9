//! Kubeglance core library
//!
//! Read-only facade over a Kubernetes control plane: cluster identity,
//! server version and node inventory.

pub mod kubernetes;
pub mod logging;

pub use kubeglance_common::{ClusterMeta, NodeCondition, NodeInfo, NodeStatus, NOT_AVAILABLE};
