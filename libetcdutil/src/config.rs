use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2379";
pub const MIN_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for an etcd cluster.
///
/// Call [`EtcdConfig::rebuild`] before handing the config to
/// [`EtcdClient::new`](crate::EtcdClient::new); an empty endpoint list cannot connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<String>,
    #[serde(rename = "timeout", default, with = "duration_secs")]
    pub dial_timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl EtcdConfig {
    pub fn new<E, S>(endpoints: E) -> Self
    where
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Fill the gaps: default endpoint when none is set, and a dial timeout of at
    /// least [`MIN_DIAL_TIMEOUT`]. Never rejects input.
    pub fn rebuild(&mut self) {
        if self.endpoints.is_empty() {
            self.endpoints.push(DEFAULT_ENDPOINT.to_string());
        }
        if self.dial_timeout <= MIN_DIAL_TIMEOUT {
            self.dial_timeout = MIN_DIAL_TIMEOUT;
        }
    }

    pub fn rebuilt(mut self) -> Self {
        self.rebuild();
        self
    }

    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Read an [`EtcdConfig`] from a YAML file. The result is not normalized.
pub fn load_config(path: &str) -> Result<EtcdConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read config from {path}"))?;
    let cfg: EtcdConfig =
        serde_yaml::from_str(&content).context("Failed to parse etcd YAML config")?;
    Ok(cfg)
}

// dial timeout travels as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
