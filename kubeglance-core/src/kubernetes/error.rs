//! Kubernetes error types
//!
//! Errors raised while loading kubeconfig data or talking to the API server.

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Kubeconfig could not be read from disk or environment
    #[error("Failed to read kubeconfig: {0}")]
    KubeconfigRead(String),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// No context override and no current-context in kubeconfig
    #[error("No current context set")]
    NoCurrentContext,

    /// Named context is absent from kubeconfig
    #[error("Context not found: {0}")]
    ContextNotFound(String),

    /// Connection flags could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl K8sError {
    /// Create an invalid kubeconfig error with the given message
    pub fn invalid_kubeconfig(msg: impl Into<String>) -> Self {
        Self::InvalidKubeconfig(msg.into())
    }

    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for Kubernetes operations
pub type K8sResult<T> = Result<T, K8sError>;
