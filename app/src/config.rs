//! Demo configuration loading.
//!
//! Lookup order: `$HOTCLICK_CONFIG`, then `<config dir>/hotclick/demo.yaml`,
//! then the copy embedded at compile time. A file that fails to load is
//! skipped with a warning.

use anyhow::Context;
use hotclick_core::DemoConfig;
use include_dir::{include_dir, Dir};
use std::path::{Path, PathBuf};

// Embed the entire configs directory at compile time
static CONFIGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/configs");

pub const CONFIG_ENV: &str = "HOTCLICK_CONFIG";

pub mod paths {
    use std::path::PathBuf;

    /// Platform configuration directory for hotclick.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hotclick")
    }

    pub fn user_config_path() -> PathBuf {
        config_dir().join("demo.yaml")
    }

    pub fn log_dir() -> PathBuf {
        config_dir().join("logs")
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Env(PathBuf),
    User(PathBuf),
    Embedded,
    Defaults,
}

/// Loaded config plus anything worth warning about once logging is up.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: DemoConfig,
    pub source: ConfigSource,
    pub warnings: Vec<String>,
}

/// Load a YAML configuration file from disk
pub fn load_yaml(path: impl AsRef<Path>) -> anyhow::Result<DemoConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = DemoConfig::from_yaml(&content)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(config)
}

/// Load the embedded default configuration.
pub fn load_embedded() -> anyhow::Result<DemoConfig> {
    let file = CONFIGS_DIR
        .get_file("demo.yaml")
        .context("embedded demo.yaml not found")?;
    let content = file
        .contents_utf8()
        .context("embedded demo.yaml is not valid UTF-8")?;
    Ok(DemoConfig::from_yaml(content)?)
}

/// Resolve configuration from the environment and the user config dir.
pub fn load() -> LoadedConfig {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    resolve(env_path, &paths::user_config_path())
}

pub fn resolve(env_path: Option<PathBuf>, user_path: &Path) -> LoadedConfig {
    let mut warnings = Vec::new();

    if let Some(path) = env_path {
        match load_yaml(&path) {
            Ok(config) => {
                return LoadedConfig {
                    config,
                    source: ConfigSource::Env(path),
                    warnings,
                }
            }
            Err(e) => warnings.push(format!("{:#}, ignoring {}", e, CONFIG_ENV)),
        }
    }

    if user_path.exists() {
        match load_yaml(user_path) {
            Ok(config) => {
                return LoadedConfig {
                    config,
                    source: ConfigSource::User(user_path.to_path_buf()),
                    warnings,
                }
            }
            Err(e) => warnings.push(format!("{:#}, using defaults", e)),
        }
    }

    match load_embedded() {
        Ok(config) => LoadedConfig {
            config,
            source: ConfigSource::Embedded,
            warnings,
        },
        Err(e) => {
            warnings.push(format!("{:#}", e));
            LoadedConfig {
                config: DemoConfig::default(),
                source: ConfigSource::Defaults,
                warnings,
            }
        }
    }
}
