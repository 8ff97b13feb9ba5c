use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_NAME: &str = "ForkLift";
const DEFAULT_BUNDLE_ID: &str = "net.deanishe.alfred.forklift";
const DEFAULT_UPDATE_REPO: &str = "deanishe/alfred-forklift";
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 86_400;
const MIN_UPDATE_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub name: String,
    pub version: String,
    pub bundle_id: String,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub favourites_path: PathBuf,
    pub ignore_local: bool,
    pub update_repo: String,
    pub update_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let bundle_id = DEFAULT_BUNDLE_ID.to_string();
        Self {
            name: DEFAULT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: default_data_dir(&bundle_id),
            cache_dir: default_cache_dir(&bundle_id),
            bundle_id,
            favourites_path: crate::favourites::default_path(),
            ignore_local: false,
            update_repo: DEFAULT_UPDATE_REPO.to_string(),
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    favourites_path: Option<PathBuf>,
    ignore_local: Option<bool>,
    update_repo: Option<String>,
    update_interval_secs: Option<u64>,
}

/// Builds the configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Builds the configuration from the host's workflow variables, the optional
/// `config.toml` in the data directory, then the user overrides.
pub fn load_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let mut cfg = Config::default();

    if let Some(bundle_id) = var("alfred_workflow_bundleid") {
        cfg.data_dir = default_data_dir(&bundle_id);
        cfg.cache_dir = default_cache_dir(&bundle_id);
        cfg.bundle_id = bundle_id;
    }
    if let Some(name) = var("alfred_workflow_name") {
        cfg.name = name;
    }
    if let Some(version) = var("alfred_workflow_version") {
        cfg.version = version;
    }
    if let Some(dir) = var("alfred_workflow_data") {
        cfg.data_dir = PathBuf::from(dir);
    }
    if let Some(dir) = var("alfred_workflow_cache") {
        cfg.cache_dir = PathBuf::from(dir);
    }

    let file_path = cfg.data_dir.join(CONFIG_FILE_NAME);
    if file_path.exists() {
        apply_file(&mut cfg, read_file(&file_path)?);
    }

    if let Some(path) = var("FORKLIFT_FAVOURITES") {
        cfg.favourites_path = PathBuf::from(path);
    }
    if let Some(value) = var("IGNORE_LOCAL") {
        cfg.ignore_local = parse_bool(&value);
    }

    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.favourites_path.as_os_str().is_empty() {
        return Err("favourites_path is required".into());
    }

    if cfg.update_repo.trim().is_empty() || !cfg.update_repo.contains('/') {
        return Err("update_repo must look like owner/name".into());
    }

    if cfg.update_interval_secs < MIN_UPDATE_INTERVAL_SECS {
        return Err("update_interval_secs out of range".into());
    }

    Ok(())
}

pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
}

fn apply_file(cfg: &mut Config, file: FileConfig) {
    if let Some(path) = file.favourites_path {
        cfg.favourites_path = path;
    }
    if let Some(ignore_local) = file.ignore_local {
        cfg.ignore_local = ignore_local;
    }
    if let Some(repo) = file.update_repo {
        cfg.update_repo = repo.trim().to_string();
    }
    if let Some(interval) = file.update_interval_secs {
        cfg.update_interval_secs = interval;
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

fn default_data_dir(bundle_id: &str) -> PathBuf {
    home_dir()
        .join("Library/Application Support/Alfred/Workflow Data")
        .join(bundle_id)
}

fn default_cache_dir(bundle_id: &str) -> PathBuf {
    home_dir()
        .join("Library/Caches/com.runningwithcrayons.Alfred/Workflow Data")
        .join(bundle_id)
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn parses_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_bool(value), "{value} should be true");
        }
        for value in ["0", "false", "", "nope"] {
            assert!(!parse_bool(value), "{value} should be false");
        }
    }
}
