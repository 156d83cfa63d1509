use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub limits: Option<LimitsConfig>,
    pub server: Option<ServerConfig>,
}

/// Knobs of the structure extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_heading_len: Option<usize>,
    pub min_reference_len: Option<usize>,
    pub fallback_prefix_chars: Option<usize>,
    /// Replaces the built-in canonical section names.
    pub canonical_sections: Option<Vec<String>>,
    /// Appended to the canonical section names (built-in or replaced).
    pub extra_canonical_sections: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_file_size_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: Option<String>,
    pub max_concurrent_decodes: Option<usize>,
    pub decode_timeout_secs: Option<u64>,
}

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Platform config directory path: `<config_dir>/papersite/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papersite").join("config.toml"))
}

/// Load config by cascading CWD `.papersite.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".papersite.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

fn pick<S, T>(
    overlay: &Option<S>,
    base: &Option<S>,
    field: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (be, oe) = (&base.extraction, &overlay.extraction);
    let (bl, ol) = (&base.limits, &overlay.limits);
    let (bs, os) = (&base.server, &overlay.server);

    ConfigFile {
        extraction: Some(ExtractionConfig {
            max_heading_len: pick(oe, be, |e| e.max_heading_len),
            min_reference_len: pick(oe, be, |e| e.min_reference_len),
            fallback_prefix_chars: pick(oe, be, |e| e.fallback_prefix_chars),
            canonical_sections: pick(oe, be, |e| e.canonical_sections.clone()),
            extra_canonical_sections: pick(oe, be, |e| e.extra_canonical_sections.clone()),
        }),
        limits: Some(LimitsConfig {
            max_file_size_mb: pick(ol, bl, |l| l.max_file_size_mb),
        }),
        server: Some(ServerConfig {
            addr: pick(os, bs, |s| s.addr.clone()),
            max_concurrent_decodes: pick(os, bs, |s| s.max_concurrent_decodes),
            decode_timeout_secs: pick(os, bs, |s| s.decode_timeout_secs),
        }),
    }
}

/// Overrides the server bind address.
pub const ENV_ADDR: &str = "PAPERSITE_ADDR";
/// Overrides the upload size limit, in megabytes.
pub const ENV_MAX_FILE_SIZE_MB: &str = "PAPERSITE_MAX_FILE_SIZE_MB";

/// Layer `PAPERSITE_*` environment variables over `config`.
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(config: ConfigFile) -> ConfigFile {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides(config: ConfigFile, lookup: impl Fn(&str) -> Option<String>) -> ConfigFile {
    let overlay = ConfigFile {
        extraction: None,
        limits: lookup(ENV_MAX_FILE_SIZE_MB)
            .and_then(|v| v.trim().parse().ok())
            .map(|mb| LimitsConfig {
                max_file_size_mb: Some(mb),
            }),
        server: lookup(ENV_ADDR).map(|addr| ServerConfig {
            addr: Some(addr),
            ..Default::default()
        }),
    };
    merge(config, overlay)
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ConfigFileError> {
    let path = config_path().ok_or(ConfigFileError::NoConfigDir)?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write `config` as pretty TOML, creating parent directories as needed.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
