//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hermit/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HermitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub nickname: Option<String>,
    pub history_length: Option<usize>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub entry_height: Option<u16>,
    pub continuation_indent: Option<String>,
    pub busy_fill: Option<char>,
    pub idle_fill: Option<char>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NICKNAME: &str = "Me";
pub const DEFAULT_HISTORY_LENGTH: usize = crate::core::content::DEFAULT_HISTORY_LENGTH;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_ENTRY_HEIGHT: u16 = 3;
pub const DEFAULT_CONTINUATION_INDENT: &str = "  ";
pub const DEFAULT_BUSY_FILL: char = '*';
pub const DEFAULT_IDLE_FILL: char = '-';

/// Below this the entry box has no room for text under its border.
const MIN_ENTRY_HEIGHT: u16 = 2;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub nickname: String,
    pub history_length: usize,
    pub poll_interval: Duration,
    pub entry_height: u16,
    pub continuation_indent: String,
    pub busy_fill: char,
    pub idle_fill: char,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&HermitConfig::default(), &CliOverrides::default())
    }
}

/// Values passed on the command line (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub nickname: Option<&'a str>,
    pub poll_interval_ms: Option<u64>,
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

/// Returns the path to `~/.hermit/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hermit").join("config.toml"))
}

/// Load config from `~/.hermit/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HermitConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HermitConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HermitConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<HermitConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(HermitConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HermitConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Hermit Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# nickname = "Me"                    # Or set HERMIT_NICK env var
# history_length = 1000              # Lines kept per pane
# poll_interval_ms = 500             # Or set HERMIT_POLL_MS env var

# [layout]
# entry_height = 3                   # Rows for the text entry box (incl. border)
# continuation_indent = "  "         # Prefix for wrapped message lines
# busy_fill = "*"                    # Status bar fill while sending
# idle_fill = "-"                    # Status bar fill when idle
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
pub fn resolve(config: &HermitConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    // Nickname: CLI → env → config → default
    let nickname = cli
        .nickname
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HERMIT_NICK").ok())
        .or_else(|| config.general.nickname.clone())
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_string());

    // Poll interval: CLI → env → config → default
    let poll_interval_ms = cli
        .poll_interval_ms
        .or_else(|| {
            std::env::var("HERMIT_POLL_MS")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(ms) => Some(ms),
                    Err(e) => {
                        warn!("Ignoring HERMIT_POLL_MS={}: {}", v, e);
                        None
                    }
                })
        })
        .or(config.general.poll_interval_ms)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
        .max(1);

    ResolvedConfig {
        nickname,
        history_length: config
            .general
            .history_length
            .unwrap_or(DEFAULT_HISTORY_LENGTH)
            .max(1),
        poll_interval: Duration::from_millis(poll_interval_ms),
        entry_height: config
            .layout
            .entry_height
            .unwrap_or(DEFAULT_ENTRY_HEIGHT)
            .max(MIN_ENTRY_HEIGHT),
        continuation_indent: config
            .layout
            .continuation_indent
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTINUATION_INDENT.to_string()),
        busy_fill: config.layout.busy_fill.unwrap_or(DEFAULT_BUSY_FILL),
        idle_fill: config.layout.idle_fill.unwrap_or(DEFAULT_IDLE_FILL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = HermitConfig::default();
        assert!(config.general.nickname.is_none());
        assert!(config.layout.entry_height.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = HermitConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.history_length, DEFAULT_HISTORY_LENGTH);
        assert_eq!(resolved.entry_height, DEFAULT_ENTRY_HEIGHT);
        assert_eq!(resolved.continuation_indent, "  ");
        assert_eq!(resolved.busy_fill, '*');
        assert_eq!(resolved.idle_fill, '-');
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = HermitConfig {
            general: GeneralConfig {
                nickname: None,
                history_length: Some(50),
                poll_interval_ms: None,
            },
            layout: LayoutConfig {
                entry_height: Some(5),
                continuation_indent: Some("   ".to_string()),
                busy_fill: Some('#'),
                idle_fill: Some('.'),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.history_length, 50);
        assert_eq!(resolved.entry_height, 5);
        assert_eq!(resolved.continuation_indent, "   ");
        assert_eq!(resolved.busy_fill, '#');
        assert_eq!(resolved.idle_fill, '.');
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = HermitConfig {
            general: GeneralConfig {
                nickname: Some("from-file".to_string()),
                poll_interval_ms: Some(900),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            nickname: Some("from-cli"),
            poll_interval_ms: Some(250),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.nickname, "from-cli");
        assert_eq!(resolved.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_degenerate_values_are_clamped() {
        let config = HermitConfig {
            general: GeneralConfig {
                history_length: Some(0),
                ..Default::default()
            },
            layout: LayoutConfig {
                entry_height: Some(0),
                ..Default::default()
            },
        };
        let cli = CliOverrides {
            poll_interval_ms: Some(0),
            ..Default::default()
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.history_length, 1);
        assert_eq!(resolved.entry_height, MIN_ENTRY_HEIGHT);
        assert_eq!(resolved.poll_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
nickname = "tycho"
history_length = 200
poll_interval_ms = 250

[layout]
entry_height = 4
continuation_indent = "    "
busy_fill = "+"
idle_fill = "="
"#;
        let config: HermitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.nickname.as_deref(), Some("tycho"));
        assert_eq!(config.general.history_length, Some(200));
        assert_eq!(config.general.poll_interval_ms, Some(250));
        assert_eq!(config.layout.entry_height, Some(4));
        assert_eq!(config.layout.busy_fill, Some('+'));
        assert_eq!(config.layout.idle_fill, Some('='));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[layout]
entry_height = 6
"#;
        let config: HermitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.layout.entry_height, Some(6));
        assert!(config.general.nickname.is_none());
        assert!(config.layout.busy_fill.is_none());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("hermit-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.general.nickname.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Hermit Configuration"));

        // The generated file is all comments, so it parses back to defaults.
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.layout.entry_height.is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("hermit-bad-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\nnickname = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
