//! Config file and credential resolution.
//!
//! Settings live in `~/.config/poster-fetch/config.toml`. The OMDb API key can
//! also come from `OMDB_API_KEY` or a command-line flag, which take priority.

use std::path::{Path, PathBuf};

use crate::error::ScrapeError;

/// Environment variable holding the OMDb API key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Image used when no real poster can be found.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/200x300?text=No+Image";

pub const DEFAULT_SORT_CSV: &str = "data/movies_list.csv";
pub const DEFAULT_SAVE_DIR: &str = "assets/posters";
pub const DEFAULT_SYNC_CSV: &str = "data/movies.csv";
pub const DEFAULT_IMAGES_DIR: &str = "assets/images";

/// TOML config file format.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb: Option<OmdbConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<ImdbConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct OmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ImdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn api_key(&self) -> Option<&str> {
        self.omdb.as_ref()?.api_key.as_deref()
    }

    pub fn placeholder_url(&self) -> &str {
        self.omdb
            .as_ref()
            .and_then(|o| o.placeholder_url.as_deref())
            .unwrap_or(DEFAULT_PLACEHOLDER_URL)
    }

    pub fn omdb_base_url(&self) -> Option<&str> {
        self.omdb.as_ref()?.base_url.as_deref()
    }

    pub fn imdb_base_url(&self) -> Option<&str> {
        self.imdb.as_ref()?.base_url.as_deref()
    }

    pub fn sort_csv(&self) -> PathBuf {
        self.path_or(|p| p.sort_csv.as_ref(), DEFAULT_SORT_CSV)
    }

    pub fn save_dir(&self) -> PathBuf {
        self.path_or(|p| p.save_dir.as_ref(), DEFAULT_SAVE_DIR)
    }

    pub fn sync_csv(&self) -> PathBuf {
        self.path_or(|p| p.sync_csv.as_ref(), DEFAULT_SYNC_CSV)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.path_or(|p| p.images_dir.as_ref(), DEFAULT_IMAGES_DIR)
    }

    fn path_or(&self, get: impl Fn(&PathsConfig) -> Option<&PathBuf>, default: &str) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(get)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(default))
    }
}

/// Where the API key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed on the command line.
    Flag,
    /// Loaded from an environment variable (or `.env`).
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--api-key"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// A resolved API key and its provenance.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub value: String,
    pub source: CredentialSource,
}

/// Resolve the OMDb API key.
///
/// Priority: flag > `OMDB_API_KEY` > config file. Empty values count as unset.
pub fn resolve_api_key(flag: Option<String>, config: &ConfigFile) -> Result<ApiKey, ScrapeError> {
    resolve_api_key_from(flag, std::env::var(API_KEY_ENV).ok(), config)
}

fn resolve_api_key_from(
    flag: Option<String>,
    env: Option<String>,
    config: &ConfigFile,
) -> Result<ApiKey, ScrapeError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    if let Some(value) = non_empty(flag) {
        return Ok(ApiKey {
            value,
            source: CredentialSource::Flag,
        });
    }
    if let Some(value) = non_empty(env) {
        return Ok(ApiKey {
            value,
            source: CredentialSource::EnvVar(API_KEY_ENV),
        });
    }
    if let Some(value) = non_empty(config.api_key().map(str::to_string)) {
        return Ok(ApiKey {
            value,
            source: CredentialSource::ConfigFile,
        });
    }
    Err(ScrapeError::Config(format!(
        "Missing OMDb API key. Set {API_KEY_ENV} (environment or .env), pass --api-key, \
         or run 'poster-fetch config setup'"
    )))
}

/// Determine where the API key would come from, without failing.
pub fn api_key_source(flag: Option<&str>, config: &ConfigFile) -> CredentialSource {
    resolve_api_key_from(
        flag.map(str::to_string),
        std::env::var(API_KEY_ENV).ok(),
        config,
    )
    .map(|k| k.source)
    .unwrap_or(CredentialSource::Missing)
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("poster-fetch").join("config.toml"))
}

/// Load the config file, or defaults if it does not exist.
///
/// A file that exists but cannot be parsed is an error rather than being
/// silently ignored.
pub fn load_config() -> Result<ConfigFile, ScrapeError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(ConfigFile::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile, ScrapeError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content)
        .map_err(|e| ScrapeError::Config(format!("Failed to parse {}: {e}", path.display())))
}

/// Save the config file, creating parent directories as needed.
///
/// Returns the path the file was written to.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ScrapeError> {
    let path = config_path()
        .ok_or_else(|| ScrapeError::Config("Could not determine config directory".to_string()))?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ScrapeError::Config(format!("Failed to serialize config: {}", e)))?;

    // Write atomically
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, toml_str)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
