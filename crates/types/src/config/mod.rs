// Path: crates/types/src/config/mod.rs

//! Runtime configuration for lifecycle orchestration (`lifecycle.toml`).

use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables shared by every lifecycle operation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    /// The name of the lifecycle system chaincode requests are addressed to.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Per-call budget in milliseconds applied when a caller passes no timeout.
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
    /// Endorsement plugin assumed by commit-readiness checks when none is given.
    #[serde(default = "default_endorsement_plugin")]
    pub default_endorsement_plugin: String,
    /// Validation plugin assumed by commit-readiness checks when none is given.
    #[serde(default = "default_validation_plugin")]
    pub default_validation_plugin: String,
    /// Environment variable consulted for the Go path when packaging golang chaincode.
    #[serde(default = "default_go_path_env")]
    pub go_path_env: String,
}

fn default_namespace() -> String {
    "_lifecycle".to_string()
}
fn default_endorsement_plugin() -> String {
    "escc".to_string()
}
fn default_validation_plugin() -> String {
    "vscc".to_string()
}
fn default_go_path_env() -> String {
    "GOPATH".to_string()
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            default_timeout_ms: None,
            default_endorsement_plugin: default_endorsement_plugin(),
            default_validation_plugin: default_validation_plugin(),
            go_path_env: default_go_path_env(),
        }
    }
}

impl LifecycleConfig {
    /// Parses a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, LifecycleError> {
        toml::from_str(s).map_err(|e| LifecycleError::Config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// The timeout to hand to the transport: the caller's, else the configured default.
    pub fn effective_timeout(&self, explicit: Option<Duration>) -> Option<Duration> {
        explicit.or_else(|| self.default_timeout_ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = LifecycleConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, LifecycleConfig::default());
        assert_eq!(cfg.namespace, "_lifecycle");
        assert_eq!(cfg.default_endorsement_plugin, "escc");
        assert_eq!(cfg.default_validation_plugin, "vscc");
        assert_eq!(cfg.go_path_env, "GOPATH");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = LifecycleConfig::from_toml_str(
            r#"
            default_timeout_ms = 45000
            go_path_env = "CUSTOM_GOPATH"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.default_timeout_ms, Some(45_000));
        assert_eq!(cfg.go_path_env, "CUSTOM_GOPATH");
        assert_eq!(
            cfg.effective_timeout(None),
            Some(Duration::from_millis(45_000))
        );
        assert_eq!(
            cfg.effective_timeout(Some(Duration::from_secs(1))),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = LifecycleConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, LifecycleError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "namespace = \"_lifecycle_test\"").unwrap();
        let cfg = LifecycleConfig::load(file.path()).unwrap();
        assert_eq!(cfg.namespace, "_lifecycle_test");
        assert_eq!(cfg.effective_timeout(None), None);
    }
}
