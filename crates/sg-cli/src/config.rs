//! `smart-groups.toml` configuration.
//!
//! The file is looked up from `--config`, then the `SMART_GROUPS_CONFIG`
//! environment variable, then `./smart-groups.toml`. Without a file every
//! setting takes its default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub const CONFIG_FILENAME: &str = "smart-groups.toml";
pub const CONFIG_ENV: &str = "SMART_GROUPS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the CSV tables and JSON files of a dataset.
    pub data_dir: PathBuf,
    pub default_locale: String,
    /// Rule modules to enable. Core rules are always enabled.
    pub modules: Vec<String>,
    /// Directory with extra `<locale>.toml` template files.
    pub locales_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            default_locale: sg_locale::DEFAULT_LOCALE.to_string(),
            modules: vec!["core".to_string(), "verification".to_string()],
            locales_dir: None,
        }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("parse configuration")
    }

    /// Read `path`. Relative directories in the file are resolved against
    /// the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let mut config =
            Self::from_toml(&source).with_context(|| format!("in {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.data_dir = base.join(&config.data_dir);
            config.locales_dir = config.locales_dir.map(|dir| base.join(dir));
        }
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load the first configuration file found, or the defaults.
    pub fn discover(explicit: Option<&Path>, env: Option<PathBuf>, cwd: &Path) -> Result<Self> {
        match resolve_config_path(explicit, env, cwd) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Where the configuration comes from. An explicit path or the environment
/// variable is returned even if it does not exist, so a typo is an error
/// rather than a silent fallback to defaults.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: Option<PathBuf>,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env.filter(|path| !path.as_os_str().is_empty()) {
        return Some(path);
    }
    let local = cwd.join(CONFIG_FILENAME);
    local.is_file().then_some(local)
}
