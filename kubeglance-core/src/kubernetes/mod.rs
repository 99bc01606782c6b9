//! Kubernetes integration for Kubeglance
//!
//! Provides a read-only view of a live cluster:
//! - Connection via kubeconfig (path, `KUBECONFIG` or `~/.kube/config`)
//! - Active context, cluster and user resolution
//! - Server version and node inventory

pub mod client;
pub mod cluster;
pub mod config;
pub mod connection;
pub mod error;
pub mod nodes;

pub use client::{KubeApiClient, KubeConnection};
pub use cluster::Cluster;
pub use config::{ConnectionFlags, KubeConfigAccess};
pub use connection::{ApiClient, ConfigAccess, Connection};
pub use error::{K8sError, K8sResult};
