//! Configuration.
//!
//! Sources are merged in this order (later wins):
//! 1. `UserbusConfig::default()`
//! 2. a TOML file, when one is given (it must exist)
//! 3. environment variables prefixed `USERBUS_` (e.g. `USERBUS_LOG_FILTER`)

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::app::SubscriberKind;

pub const ENV_PREFIX: &str = "USERBUS_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Figment(#[from] figment::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserbusConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,

    /// Subscribers attached at startup, in this order.
    pub subscribers: Vec<SubscriberKind>,

    /// When true, attaching a tag that is already attached is a no-op.
    pub dedup_attach: bool,
}

impl Default for UserbusConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            subscribers: SubscriberKind::ALL.to_vec(),
            dedup_attach: true,
        }
    }
}

impl UserbusConfig {
    /// Defaults, then `path`, then the environment.
    ///
    /// A `path` that does not exist is an error rather than a silent fallback
    /// to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Self::extract(figment)
    }

    /// Defaults overlaid with an inline TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_attach_every_kind() {
        let config = UserbusConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.subscribers, SubscriberKind::ALL.to_vec());
        assert!(config.dedup_attach);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = UserbusConfig::from_toml_str(
            r#"
            log_filter = "userbus_core=debug"
            subscribers = ["slack", "email"]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "userbus_core=debug");
        assert_eq!(
            config.subscribers,
            vec![SubscriberKind::Slack, SubscriberKind::Email]
        );
        assert!(config.dedup_attach);
    }

    #[test]
    fn unknown_subscriber_tag_keeps_the_figment_error() {
        let err = UserbusConfig::from_toml_str(r#"subscribers = ["pager"]"#).unwrap_err();

        let ConfigError::Figment(inner) = &err else {
            panic!("expected a figment error, got {err:?}");
        };
        assert_eq!(inner.path.first().map(String::as_str), Some("subscribers"));
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/userbus.toml");

        let err = UserbusConfig::load(Some(path)).unwrap_err();

        assert!(matches!(&err, ConfigError::NotFound(p) if p == path));
        assert_eq!(
            err.to_string(),
            "configuration file not found: /nonexistent/userbus.toml"
        );
    }

    #[test]
    fn existing_file_is_merged() {
        let path = std::env::temp_dir().join(format!("userbus-{}.toml", std::process::id()));
        std::fs::write(&path, "dedup_attach = false\nsubscribers = [\"analytics\"]\n").unwrap();

        let config = UserbusConfig::load(Some(&path));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert!(!config.dedup_attach);
        assert_eq!(config.subscribers, vec![SubscriberKind::Analytics]);
    }
}
