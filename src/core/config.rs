//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.outlet/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::routing::path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutletConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub initial_path: Option<String>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// When set, route loaders fetch from this API instead of the built-in fixtures.
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Artificial fixture latency, handy for watching pending states.
    pub latency_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_INITIAL_PATH: &str = "/";
pub const DEFAULT_LOG_FILE: &str = "outlet.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LATENCY_MS: u64 = 0;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub initial_path: String,
    pub log_file: String,
    pub log_level: String,
    pub api_url: Option<String>,
    pub loader_timeout: Duration,
    pub fixture_latency: Duration,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub path: Option<String>,
    pub api_url: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.outlet/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".outlet").join("config.toml"))
}

/// Where the loaded config came from. Loading runs before the logger is
/// up, so the caller logs this once logging is initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    NoHomeDir,
    Loaded(PathBuf),
    Generated(PathBuf),
    GenerateFailed { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::NoHomeDir => {
                f.write_str("could not determine home directory, using default config")
            }
            ConfigSource::Loaded(path) => write!(f, "loaded config from {}", path.display()),
            ConfigSource::Generated(path) => {
                write!(f, "no config file found, generated default at {}", path.display())
            }
            ConfigSource::GenerateFailed { path, reason } => write!(
                f,
                "no config file found, failed to write default at {}: {}",
                path.display(),
                reason
            ),
        }
    }
}

/// Load config from `~/.outlet/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `OutletConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<(OutletConfig, ConfigSource), ConfigError> {
    let Some(path) = config_path() else {
        return Ok((OutletConfig::default(), ConfigSource::NoHomeDir));
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<(OutletConfig, ConfigSource), ConfigError> {
    if !path.exists() {
        let source = match generate_default_config(path) {
            Ok(()) => ConfigSource::Generated(path.to_path_buf()),
            Err(e) => ConfigSource::GenerateFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        };
        return Ok((OutletConfig::default(), source));
    }

    let contents = fs::read_to_string(path)?;
    let config: OutletConfig = toml::from_str(&contents)?;
    Ok((config, ConfigSource::Loaded(path.to_path_buf())))
}

fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Outlet Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# initial_path = "/users/kody"     # Or set OUTLET_PATH, or pass --path
# log_file = "outlet.log"
# log_level = "debug"              # "error", "warn", "info", "debug", "trace"

# [loader]
# api_url = "http://localhost:3000/api"   # Or set OUTLET_API_URL; unset = built-in fixtures
# timeout_ms = 10000
# latency_ms = 0                   # Fixture latency, to watch pending states
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &OutletConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Initial path: CLI → env → config → default
    let initial_path = cli
        .path
        .clone()
        .or_else(|| std::env::var("OUTLET_PATH").ok())
        .or_else(|| config.general.initial_path.clone())
        .unwrap_or_else(|| DEFAULT_INITIAL_PATH.to_string());

    // API URL: CLI → env → config → none (fixtures)
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| std::env::var("OUTLET_API_URL").ok())
        .or_else(|| config.loader.api_url.clone())
        .filter(|url| !url.trim().is_empty());

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    ResolvedConfig {
        initial_path: path::normalize(&initial_path),
        log_file: config
            .general
            .log_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        log_level,
        api_url,
        loader_timeout: Duration::from_millis(
            config.loader.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        ),
        fixture_latency: Duration::from_millis(
            config.loader.latency_ms.unwrap_or(DEFAULT_LATENCY_MS),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = OutletConfig::default();
        assert!(config.general.initial_path.is_none());
        assert!(config.loader.api_url.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&OutletConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.log_file, DEFAULT_LOG_FILE);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(resolved.loader_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(resolved.fixture_latency, Duration::ZERO);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = OutletConfig {
            general: GeneralConfig {
                initial_path: Some("users/kody/".to_string()),
                log_file: Some("/tmp/outlet.log".to_string()),
                log_level: Some("info".to_string()),
            },
            loader: LoaderConfig {
                api_url: None,
                timeout_ms: Some(500),
                latency_ms: Some(250),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.log_file, "/tmp/outlet.log");
        assert_eq!(resolved.log_level, "info");
        assert_eq!(resolved.loader_timeout, Duration::from_millis(500));
        assert_eq!(resolved.fixture_latency, Duration::from_millis(250));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = OutletConfig {
            general: GeneralConfig {
                initial_path: Some("/users".to_string()),
                log_level: Some("info".to_string()),
                ..Default::default()
            },
            loader: LoaderConfig {
                api_url: Some("http://config.example".to_string()),
                ..Default::default()
            },
        };
        let cli = CliOverrides {
            path: Some("/users/jake/".to_string()),
            api_url: Some("http://cli.example".to_string()),
            log_level: Some("trace".to_string()),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.initial_path, "/users/jake");
        assert_eq!(resolved.api_url.as_deref(), Some("http://cli.example"));
        assert_eq!(resolved.log_level, "trace");
    }

    #[test]
    fn test_blank_api_url_means_fixtures() {
        let cli = CliOverrides {
            api_url: Some("  ".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&OutletConfig::default(), &cli);
        assert_eq!(resolved.api_url, None);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[loader]
latency_ms = 400
"#;
        let config: OutletConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.loader.latency_ms, Some(400));
        assert!(config.loader.timeout_ms.is_none());
        assert!(config.general.initial_path.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
initial_path = "/users/kody"
log_file = "nav.log"
log_level = "warn"

[loader]
api_url = "http://localhost:3000/api"
timeout_ms = 2000
"#;
        let config: OutletConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.initial_path.as_deref(), Some("/users/kody"));
        assert_eq!(config.general.log_level.as_deref(), Some("warn"));
        assert_eq!(config.loader.api_url.as_deref(), Some("http://localhost:3000/api"));
        assert_eq!(config.loader.timeout_ms, Some(2000));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("outlet-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\ninitial_path = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("outlet-default-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let (config, source) = load_config_from(&path).unwrap();
        assert!(config.general.initial_path.is_none());
        assert_eq!(source, ConfigSource::Generated(path.clone()));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Outlet Configuration"));
        // The generated file is all comments, so it parses back to defaults.
        let (config, source) = load_config_from(&path).unwrap();
        assert!(config.loader.api_url.is_none());
        assert_eq!(source, ConfigSource::Loaded(path.clone()));
        assert!(source.to_string().starts_with("loaded config from"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
