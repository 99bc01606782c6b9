//! Node summaries
//!
//! Flattens raw node objects into [`NodeInfo`] display records.

use k8s_openapi::api::core::v1::Node;
use kubeglance_common::{NodeCondition, NodeInfo, NodeStatus};

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

/// Summarize a node for display
pub fn node_to_info(node: &Node) -> NodeInfo {
    let metadata = &node.metadata;
    let status = node.status.clone().unwrap_or_default();

    let conditions = status.conditions.unwrap_or_default();
    let node_status = match conditions.iter().find(|c| c.type_ == "Ready") {
        Some(c) if c.status == "True" => NodeStatus::Ready,
        Some(c) if c.status == "False" => NodeStatus::NotReady,
        _ => NodeStatus::Unknown,
    };

    // Roles come from label keys; the label values are conventionally empty
    let roles: Vec<String> = metadata
        .labels
        .iter()
        .flat_map(|labels| labels.keys())
        .filter_map(|k| k.strip_prefix(ROLE_LABEL_PREFIX))
        .filter(|role| !role.is_empty())
        .map(String::from)
        .collect();

    let addresses = status.addresses.unwrap_or_default();
    let address_of = |kind: &str| {
        addresses
            .iter()
            .find(|a| a.type_ == kind)
            .map(|a| a.address.clone())
    };

    let node_info = status.node_info.unwrap_or_default();

    let allocatable = status.allocatable.unwrap_or_default();
    let quantity = |name: &str| {
        allocatable
            .get(name)
            .map(|q| q.0.clone())
            .unwrap_or_default()
    };

    NodeInfo {
        name: metadata.name.clone().unwrap_or_default(),
        status: node_status,
        roles,
        internal_ip: address_of("InternalIP"),
        external_ip: address_of("ExternalIP"),
        os_image: node_info.os_image,
        kernel_version: node_info.kernel_version,
        container_runtime: node_info.container_runtime_version,
        kubelet_version: node_info.kubelet_version,
        allocatable_cpu: quantity("cpu"),
        allocatable_memory: quantity("memory"),
        conditions: conditions
            .into_iter()
            .map(|c| NodeCondition {
                condition_type: c.type_,
                status: c.status,
                reason: c.reason,
                message: c.message,
            })
            .collect(),
        created_at: metadata.creation_timestamp.as_ref().map(|t| t.0.to_rfc3339()),
    }
}
