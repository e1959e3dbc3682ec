use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::plan::{Action, PlanFilter};
use crate::traits::FileSystem;

const CONFIG_DIR: &str = ".tfsummary";
const CONFIG_FILE: &str = "config.yaml";

/// User configuration, read from `~/.tfsummary/config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub view: ViewConfig,
    pub http: HttpConfig,
}

/// Review UI server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,

    /// Largest accepted plan upload, in megabytes
    pub body_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            body_limit_mb: 64,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}

/// Defaults for how plans are displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Actions shown when no `--action` flag is given
    pub actions: Vec<Action>,
    pub show_unchanged: bool,
    pub show_sensitive: bool,
    pub max_value_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            actions: Action::FILTERABLE.to_vec(),
            show_unchanged: false,
            show_sensitive: false,
            max_value_width: 60,
        }
    }
}

impl ViewConfig {
    /// The filter used when the command line does not name any actions
    pub fn default_filter(&self) -> PlanFilter {
        PlanFilter::new().with_actions(self.actions.iter().copied())
    }
}

/// Outbound HTTP settings for fetching plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Loads [`Config`] through the injected filesystem
pub struct ConfigLoader<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Get path to the default config file
    pub fn default_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;

        Ok(home_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration
    ///
    /// An explicitly named file must exist. The default file is optional and
    /// falls back to built-in defaults when absent.
    pub fn load(&self, explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => {
                if !self.fs.exists(path) {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Ok(path) if self.fs.exists(&path) => path,
                _ => {
                    tracing::debug!("No config file, using defaults");
                    return Ok(Config::default());
                }
            },
        };

        self.load_from(&path)
    }

    fn load_from(&self, path: &Path) -> Result<Config> {
        let content = self.fs.read_to_string(path)?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.server.body_limit_bytes(), 64 * 1024 * 1024);
        assert_eq!(config.view.actions.len(), 5);
        assert!(config.view.default_filter().is_default());
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_explicit_file() {
        let fs = MockFileSystem::new().with_file(
            "/etc/tfsummary.yaml",
            r#"
server:
  port: 9000
view:
  actions: [create, delete]
  show_unchanged: true
"#,
        );
        let config = ConfigLoader::new(&fs)
            .load(Some(Path::new("/etc/tfsummary.yaml")))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.body_limit_mb, 64);
        assert_eq!(config.view.actions, vec![Action::Create, Action::Delete]);
        assert!(config.view.show_unchanged);
        assert_eq!(config.view.max_value_width, 60);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let fs = MockFileSystem::new();
        let result = ConfigLoader::new(&fs).load(Some(Path::new("/nope.yaml")));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let fs = MockFileSystem::new();
        let config = ConfigLoader::new(&fs).load(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let fs = MockFileSystem::new().with_file("/empty.yaml", "  \n");
        let config = ConfigLoader::new(&fs)
            .load(Some(Path::new("/empty.yaml")))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let fs = MockFileSystem::new().with_file("/bad.yaml", "server:\n  port: not-a-number\n");
        let result = ConfigLoader::new(&fs).load(Some(Path::new("/bad.yaml")));
        assert!(result.is_err());
    }
}
