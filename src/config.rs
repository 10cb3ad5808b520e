use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Server configuration.
///
/// Loaded from an optional YAML file named by `HTTPLET_CONFIG`; the `LISTEN`
/// environment variable overrides the listen address.
///
/// ```yaml
/// listen_addr: "127.0.0.1:8080"
/// recv_buffer_size: 4096
/// max_head_size: 16384
/// server_name: "example"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub listen_addr: String,
    /// Bytes requested from the socket per read
    pub recv_buffer_size: usize,
    /// Largest request head accepted before answering 413
    pub max_head_size: usize,
    /// Value of the `Server` header set by the echo handler
    pub server_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            recv_buffer_size: 2048,
            max_head_size: 8192,
            server_name: "httplet".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("HTTPLET_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.listen_addr = addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.recv_buffer_size == 0 {
            anyhow::bail!("recv_buffer_size must be greater than zero");
        }
        if self.max_head_size == 0 {
            anyhow::bail!("max_head_size must be greater than zero");
        }
        Ok(())
    }
}
