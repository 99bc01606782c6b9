//! Kubeconfig selection
//!
//! Connection flags (kubeconfig path and context/cluster/user overrides) and
//! the resolvers that answer "which context, cluster and user are active".

use kube::config::{KubeConfigOptions, Kubeconfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::connection::ConfigAccess;
use super::error::{K8sError, K8sResult};

/// Kubeconfig location and selection overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionFlags {
    /// Explicit kubeconfig path; falls back to `KUBECONFIG` / `~/.kube/config`
    pub kubeconfig: Option<PathBuf>,
    /// Context to use instead of `current-context`
    pub context: Option<String>,
    /// Cluster to use instead of the context's cluster
    pub cluster: Option<String>,
    /// User to use instead of the context's user
    pub user: Option<String>,
}

impl ConnectionFlags {
    /// Parse flags from TOML
    pub fn from_toml_str(contents: &str) -> K8sResult<Self> {
        toml::from_str(contents)
            .map_err(|e| K8sError::config(format!("Failed to parse connection flags: {}", e)))
    }

    /// Load flags from a TOML file, returning defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> K8sResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            K8sError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Build flags from `KUBEGLANCE_*` environment variables
    pub fn from_env() -> Self {
        Self {
            kubeconfig: env_value("KUBEGLANCE_KUBECONFIG").map(PathBuf::from),
            context: env_value("KUBEGLANCE_CONTEXT"),
            cluster: env_value("KUBEGLANCE_CLUSTER"),
            user: env_value("KUBEGLANCE_USER"),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Read the kubeconfig these flags point at
    pub fn load_kubeconfig(&self) -> K8sResult<Kubeconfig> {
        match &self.kubeconfig {
            Some(path) => Kubeconfig::read_from(path).map_err(|e| {
                K8sError::KubeconfigRead(format!("{}: {}", path.display(), e))
            }),
            None => Kubeconfig::read().map_err(|e| K8sError::KubeconfigRead(e.to_string())),
        }
    }

    /// Overrides in the form kube-rs expects when building a client config
    pub fn kube_config_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: non_empty(&self.context).map(String::from),
            cluster: non_empty(&self.cluster).map(String::from),
            user: non_empty(&self.user).map(String::from),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Cluster and user references of a kubeconfig context
#[derive(Debug, Deserialize)]
struct ContextRef {
    #[serde(default)]
    cluster: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

/// Resolves the active context, cluster and user from a loaded kubeconfig
#[derive(Debug, Clone)]
pub struct KubeConfigAccess {
    kubeconfig: Kubeconfig,
    context: Option<String>,
    cluster: Option<String>,
    user: Option<String>,
}

impl KubeConfigAccess {
    pub fn new(kubeconfig: Kubeconfig, flags: &ConnectionFlags) -> Self {
        Self {
            kubeconfig,
            context: non_empty(&flags.context).map(String::from),
            cluster: non_empty(&flags.cluster).map(String::from),
            user: non_empty(&flags.user).map(String::from),
        }
    }

    /// Underlying kubeconfig
    pub fn kubeconfig(&self) -> &Kubeconfig {
        &self.kubeconfig
    }

    fn current_context(&self) -> K8sResult<(String, ContextRef)> {
        let name = self.current_context_name()?;

        let named = self
            .kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| K8sError::ContextNotFound(name.clone()))?;

        let body = named.context.as_ref().ok_or_else(|| {
            K8sError::invalid_kubeconfig(format!("Context '{}' has no definition", name))
        })?;

        let value = serde_json::to_value(body)
            .map_err(|e| K8sError::invalid_kubeconfig(format!("Context '{}': {}", name, e)))?;
        let context = serde_json::from_value(value)
            .map_err(|e| K8sError::invalid_kubeconfig(format!("Context '{}': {}", name, e)))?;

        Ok((name, context))
    }
}

impl ConfigAccess for KubeConfigAccess {
    fn current_context_name(&self) -> K8sResult<String> {
        if let Some(context) = &self.context {
            return Ok(context.clone());
        }

        self.kubeconfig
            .current_context
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or(K8sError::NoCurrentContext)
    }

    fn current_cluster_name(&self) -> K8sResult<String> {
        if let Some(cluster) = &self.cluster {
            return Ok(cluster.clone());
        }

        let (name, context) = self.current_context()?;
        context.cluster.filter(|c| !c.is_empty()).ok_or_else(|| {
            K8sError::invalid_kubeconfig(format!("Context '{}' has no cluster reference", name))
        })
    }

    fn current_user_name(&self) -> K8sResult<String> {
        if let Some(user) = &self.user {
            return Ok(user.clone());
        }

        let (name, context) = self.current_context()?;
        context.user.filter(|u| !u.is_empty()).ok_or_else(|| {
            K8sError::invalid_kubeconfig(format!("Context '{}' has no user reference", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: dev-cluster
  cluster:
    server: https://127.0.0.1:6443
- name: prod-cluster
  cluster:
    server: https://10.0.0.1:6443
contexts:
- name: dev
  context:
    cluster: dev-cluster
    user: dev-admin
- name: prod
  context:
    cluster: prod-cluster
    user: prod-admin
- name: broken
users:
- name: dev-admin
  user:
    token: dev-token
- name: prod-admin
  user:
    token: prod-token
"#;

    fn access(flags: &ConnectionFlags) -> KubeConfigAccess {
        KubeConfigAccess::new(Kubeconfig::from_yaml(KUBECONFIG).unwrap(), flags)
    }

    #[test]
    fn test_resolves_current_context() {
        let access = access(&ConnectionFlags::default());

        assert_eq!(access.current_context_name().unwrap(), "dev");
        assert_eq!(access.current_cluster_name().unwrap(), "dev-cluster");
        assert_eq!(access.current_user_name().unwrap(), "dev-admin");
    }

    #[test]
    fn test_context_override_selects_other_context() {
        let access = access(&ConnectionFlags::default().with_context("prod"));

        assert_eq!(access.current_context_name().unwrap(), "prod");
        assert_eq!(access.current_cluster_name().unwrap(), "prod-cluster");
        assert_eq!(access.current_user_name().unwrap(), "prod-admin");
    }

    #[test]
    fn test_cluster_and_user_overrides() {
        let flags = ConnectionFlags::default()
            .with_cluster("other-cluster")
            .with_user("other-user");
        let access = access(&flags);

        assert_eq!(access.current_context_name().unwrap(), "dev");
        assert_eq!(access.current_cluster_name().unwrap(), "other-cluster");
        assert_eq!(access.current_user_name().unwrap(), "other-user");
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let access = access(&ConnectionFlags::default().with_context(""));

        assert_eq!(access.current_context_name().unwrap(), "dev");
    }

    #[test]
    fn test_unknown_context() {
        let access = access(&ConnectionFlags::default().with_context("staging"));

        assert_eq!(access.current_context_name().unwrap(), "staging");
        assert!(matches!(
            access.current_cluster_name(),
            Err(K8sError::ContextNotFound(name)) if name == "staging"
        ));
        assert!(matches!(
            access.current_user_name(),
            Err(K8sError::ContextNotFound(_))
        ));
    }

    #[test]
    fn test_context_without_definition() {
        let access = access(&ConnectionFlags::default().with_context("broken"));

        assert!(matches!(
            access.current_cluster_name(),
            Err(K8sError::InvalidKubeconfig(_))
        ));
    }

    #[test]
    fn test_missing_current_context() {
        let yaml = KUBECONFIG.replace("current-context: dev\n", "");
        let access = KubeConfigAccess::new(
            Kubeconfig::from_yaml(&yaml).unwrap(),
            &ConnectionFlags::default(),
        );

        assert!(matches!(
            access.current_context_name(),
            Err(K8sError::NoCurrentContext)
        ));
        assert!(matches!(
            access.current_user_name(),
            Err(K8sError::NoCurrentContext)
        ));
    }

    #[test]
    fn test_flags_from_toml() {
        let flags = ConnectionFlags::from_toml_str(
            r#"
kubeconfig = "/etc/kubeglance/kubeconfig"
context = "prod"
"#,
        )
        .unwrap();

        assert_eq!(
            flags.kubeconfig,
            Some(PathBuf::from("/etc/kubeglance/kubeconfig"))
        );
        assert_eq!(flags.context.as_deref(), Some("prod"));
        assert_eq!(flags.cluster, None);
        assert_eq!(flags.user, None);
    }

    #[test]
    fn test_flags_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let flags = ConnectionFlags::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(flags, ConnectionFlags::default());
    }

    #[test]
    fn test_flags_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "context = [").unwrap();

        assert!(matches!(
            ConnectionFlags::load(file.path()),
            Err(K8sError::Config(_))
        ));
    }

    #[test]
    fn test_load_kubeconfig_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KUBECONFIG.as_bytes()).unwrap();

        let flags = ConnectionFlags {
            kubeconfig: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let kubeconfig = flags.load_kubeconfig().unwrap();

        assert_eq!(kubeconfig.current_context.as_deref(), Some("dev"));
        assert_eq!(kubeconfig.contexts.len(), 3);
    }

    #[test]
    fn test_load_kubeconfig_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let flags = ConnectionFlags {
            kubeconfig: Some(dir.path().join("missing")),
            ..Default::default()
        };

        assert!(matches!(
            flags.load_kubeconfig(),
            Err(K8sError::KubeconfigRead(_))
        ));
    }

    #[test]
    fn test_kube_config_options() {
        let options = ConnectionFlags::default()
            .with_context("prod")
            .with_user("")
            .kube_config_options();

        assert_eq!(options.context.as_deref(), Some("prod"));
        assert_eq!(options.cluster, None);
        assert_eq!(options.user, None);
    }
}
