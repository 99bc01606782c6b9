//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client and the loaded kubeconfig behind the
//! [`Connection`] capability. The kube client is built on first use, so the
//! kubeconfig selection stays readable even when no client can be built from it.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tokio::sync::OnceCell;

use super::config::{ConnectionFlags, KubeConfigAccess};
use super::connection::{ApiClient, Connection};
use super::error::{K8sError, K8sResult};

struct Dialed {
    client: Client,
    api_server: String,
}

/// API client backed by kube-rs, dialed lazily
pub struct KubeApiClient {
    kubeconfig: Kubeconfig,
    options: KubeConfigOptions,
    dialed: OnceCell<Dialed>,
}

impl KubeApiClient {
    pub fn new(kubeconfig: Kubeconfig, options: KubeConfigOptions) -> Self {
        Self {
            kubeconfig,
            options,
            dialed: OnceCell::new(),
        }
    }

    /// Build the kube-rs Client on first call; a failed attempt is retried next time
    async fn dialed(&self) -> K8sResult<&Dialed> {
        self.dialed
            .get_or_try_init(|| async {
                let config = Config::from_custom_kubeconfig(self.kubeconfig.clone(), &self.options)
                    .await
                    .map_err(|e| {
                        K8sError::invalid_kubeconfig(format!("Failed to create config: {}", e))
                    })?;

                let api_server = config.cluster_url.to_string();

                let client = Client::try_from(config).map_err(|e| {
                    K8sError::invalid_kubeconfig(format!("Failed to create client: {}", e))
                })?;

                tracing::debug!("Dialed Kubernetes API server at {}", api_server);

                Ok::<_, K8sError>(Dialed { client, api_server })
            })
            .await
    }

    /// Get the inner kube-rs Client
    pub async fn inner(&self) -> K8sResult<&Client> {
        Ok(&self.dialed().await?.client)
    }

    /// Get API server URL
    pub async fn api_server(&self) -> K8sResult<&str> {
        Ok(&self.dialed().await?.api_server)
    }
}

#[async_trait]
impl ApiClient for KubeApiClient {
    async fn server_version(&self) -> K8sResult<Info> {
        Ok(self.inner().await?.apiserver_version().await?)
    }

    async fn list_nodes(&self, params: &ListParams) -> K8sResult<Vec<Node>> {
        let nodes: Api<Node> = Api::all(self.inner().await?.clone());
        let list = nodes.list(params).await?;

        Ok(list.items)
    }
}

impl std::fmt::Debug for KubeApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApiClient")
            .field("context", &self.options.context)
            .field(
                "api_server",
                &self.dialed.get().map(|d| d.api_server.as_str()),
            )
            .finish()
    }
}

/// Connection to the cluster selected by a kubeconfig
#[derive(Debug)]
pub struct KubeConnection {
    client: KubeApiClient,
    config: KubeConfigAccess,
}

impl KubeConnection {
    /// Load the kubeconfig the flags point at
    pub fn connect(flags: &ConnectionFlags) -> K8sResult<Self> {
        let kubeconfig = flags.load_kubeconfig()?;
        Ok(Self::from_kubeconfig(kubeconfig, flags))
    }

    /// Use an in-memory kubeconfig
    pub fn from_yaml(kubeconfig_yaml: &str, flags: &ConnectionFlags) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::invalid_kubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;
        Ok(Self::from_kubeconfig(kubeconfig, flags))
    }

    /// Use an already loaded kubeconfig
    pub fn from_kubeconfig(kubeconfig: Kubeconfig, flags: &ConnectionFlags) -> Self {
        Self {
            client: KubeApiClient::new(kubeconfig.clone(), flags.kube_config_options()),
            config: KubeConfigAccess::new(kubeconfig, flags),
        }
    }
}

impl Connection for KubeConnection {
    type Client = KubeApiClient;
    type Config = KubeConfigAccess;

    fn dial(&self) -> &KubeApiClient {
        &self.client
    }

    fn config(&self) -> &KubeConfigAccess {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::connection::ConfigAccess;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: kind-dev
clusters:
- name: kind-dev
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
- name: kind-prod
  cluster:
    server: https://127.0.0.1:7443
    insecure-skip-tls-verify: true
contexts:
- name: kind-dev
  context:
    cluster: kind-dev
    user: kind-dev
- name: kind-prod
  context:
    cluster: kind-prod
    user: kind-prod
users:
- name: kind-dev
  user:
    token: dev-token
- name: kind-prod
  user:
    token: prod-token
"#;

    #[tokio::test]
    async fn test_connect_from_yaml() {
        let connection = KubeConnection::from_yaml(KUBECONFIG, &ConnectionFlags::default()).unwrap();

        let api_server = connection.dial().api_server().await.unwrap();
        assert!(api_server.starts_with("https://127.0.0.1:6443"));
        assert_eq!(connection.config().current_context_name().unwrap(), "kind-dev");
        assert_eq!(connection.config().current_user_name().unwrap(), "kind-dev");
    }

    #[tokio::test]
    async fn test_connect_with_context_override() {
        let flags = ConnectionFlags::default().with_context("kind-prod");
        let connection = KubeConnection::from_yaml(KUBECONFIG, &flags).unwrap();

        let api_server = connection.dial().api_server().await.unwrap();
        assert!(api_server.starts_with("https://127.0.0.1:7443"));
        assert_eq!(connection.config().current_cluster_name().unwrap(), "kind-prod");
    }

    #[tokio::test]
    async fn test_unknown_context_fails_on_dial() {
        let flags = ConnectionFlags::default().with_context("missing");
        let connection = KubeConnection::from_yaml(KUBECONFIG, &flags).unwrap();

        assert_eq!(connection.config().current_context_name().unwrap(), "missing");
        assert!(matches!(
            connection.dial().api_server().await,
            Err(K8sError::InvalidKubeconfig(_))
        ));
        assert!(matches!(
            connection.dial().server_version().await,
            Err(K8sError::InvalidKubeconfig(_))
        ));
    }

    #[tokio::test]
    async fn test_dial_is_reused() {
        let connection = KubeConnection::from_yaml(KUBECONFIG, &ConnectionFlags::default()).unwrap();

        let first = connection.dial().inner().await.unwrap() as *const Client;
        let second = connection.dial().inner().await.unwrap() as *const Client;
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let result = KubeConnection::from_yaml("clusters: [", &ConnectionFlags::default());

        assert!(matches!(result, Err(K8sError::InvalidKubeconfig(_))));
    }
}
