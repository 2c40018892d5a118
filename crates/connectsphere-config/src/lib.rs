use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use connectsphere_core::domain::{normalize_tag_label, DEFAULT_TAG_PALETTE};
use connectsphere_core::filter::{SortDirection, SortField};
use connectsphere_core::remote::DEFAULT_PAGE_LIMIT;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "connectsphere";
const CONFIG_FILENAME: &str = "config.toml";

pub const MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub page_size: usize,
    pub sort: SortConfig,
    pub tag_palette: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_LIMIT,
            sort: SortConfig::default(),
            tag_palette: DEFAULT_TAG_PALETTE.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid page_size value: {0}")]
    InvalidPageSize(i64),
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
    #[error("invalid palette tag: {0:?}")]
    InvalidPaletteTag(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    page_size: Option<i64>,
    sort: Option<SortFile>,
    tags: Option<TagsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SortFile {
    field: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagsFile {
    palette: Option<Vec<String>>,
}

/// Loads the config file. An explicit path must exist; the default location
/// falls back to defaults when absent.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(page_size) = parsed.page_size {
        if page_size <= 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        config.page_size = page_size as usize;
    }

    if let Some(sort) = parsed.sort {
        if let Some(field) = sort.field {
            config.sort.field = field
                .parse()
                .map_err(|_| ConfigError::InvalidSortField(field.clone()))?;
        }
        if let Some(direction) = sort.direction {
            config.sort.direction = direction
                .parse()
                .map_err(|_| ConfigError::InvalidSortDirection(direction.clone()))?;
        }
    }

    if let Some(palette) = parsed.tags.and_then(|tags| tags.palette) {
        let mut labels: Vec<String> = Vec::with_capacity(palette.len());
        for raw in palette {
            let label =
                normalize_tag_label(&raw).map_err(|_| ConfigError::InvalidPaletteTag(raw.clone()))?;
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        config.tag_palette = labels;
    }

    Ok(config)
}
