//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.skycast/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::route::Route;
use crate::core::search::DEFAULT_DEBOUNCE;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SkycastConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Absolute, or relative to `~/.skycast/`.
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_route: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_FILE: &str = "session.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub debounce: Duration,
    /// None when no home directory could be found; the session is then memory-only.
    pub session_file: Option<PathBuf>,
    pub start_route: Route,
}

/// Values from CLI flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub route: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.skycast/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".skycast"))
}

/// Returns the path to `~/.skycast/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.skycast/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SkycastConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SkycastConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SkycastConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SkycastConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SkycastConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SkycastConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Skycast Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8080"   # Or set SKYCAST_BASE_URL

# [search]
# debounce_ms = 1000                   # Or set SKYCAST_DEBOUNCE_MS

# [session]
# file = "session.json"                # Relative to ~/.skycast/, or SKYCAST_SESSION_FILE

# [general]
# start_route = "/home"                # /home, /login, /register, /favoriteLocations, /weather/<city>
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SkycastConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("SKYCAST_BASE_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Debounce: CLI → env → config → default
    let debounce = cli
        .debounce_ms
        .or_else(|| {
            std::env::var("SKYCAST_DEBOUNCE_MS")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(ms) => Some(ms),
                    Err(_) => {
                        warn!("Ignoring invalid SKYCAST_DEBOUNCE_MS={:?}", v);
                        None
                    }
                })
        })
        .or(config.search.debounce_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DEBOUNCE);

    // Session file: env → config → default, relative paths under ~/.skycast/
    let session_file = std::env::var("SKYCAST_SESSION_FILE")
        .ok()
        .or_else(|| config.session.file.clone())
        .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
    let session_file = resolve_session_path(&session_file, config_dir().as_deref());

    let start_route = cli
        .route
        .as_deref()
        .or(config.general.start_route.as_deref())
        .map(Route::parse)
        .unwrap_or_default();

    ResolvedConfig {
        base_url,
        debounce,
        session_file,
        start_route,
    }
}

fn resolve_session_path(file: &str, base: Option<&Path>) -> Option<PathBuf> {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return Some(path);
    }
    base.map(|b| b.join(path))
}
