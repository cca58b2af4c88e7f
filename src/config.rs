//! User configuration, read from `<config dir>/scicalc/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::{DEFAULT_HISTORY_WINDOW, NumberFormat};

/// Calculator settings. Every key is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of entries shown by history views.
    pub history_window: usize,
    /// Maximum decimal places shown for results.
    pub precision: usize,
    /// Group result digits with commas.
    pub thousands_separator: bool,
}

impl Default for Config {
    fn default() -> Self {
        let format = NumberFormat::default();
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            precision: format.precision,
            thousands_separator: format.thousands_separator,
        }
    }
}

impl Config {
    /// Display options derived from this configuration.
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat {
            precision: self.precision,
            thousands_separator: self.thousands_separator,
        }
    }

    /// Reject values the calculator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.history_window == 0 {
            bail!("history_window must be at least 1");
        }
        if self.precision > 17 {
            bail!("precision must be at most 17, got {}", self.precision);
        }
        Ok(())
    }
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scicalc").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and a missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => load_from(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from(&path)?,
            _ => {
                debug!("no config file found, using defaults");
                Config::default()
            }
        },
    };
    config.validate()?;
    Ok(config)
}

fn load_from(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history_window, 10);
        assert_eq!(config.precision, 10);
        assert!(!config.thousands_separator);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("history_window = 20\n");
        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.history_window, 20);
        assert_eq!(config.precision, 10);
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            "history_window = 5\nprecision = 4\nthousands_separator = true\n",
        );
        let config = load(Some(file.path())).unwrap();
        assert_eq!(
            config,
            Config {
                history_window: 5,
                precision: 4,
                thousands_separator: true,
            }
        );
        assert_eq!(config.number_format().format(12345.678912), "12,345.6789");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("history_window = 0\n");
        assert!(load(Some(file.path())).is_err());

        let file = write_config("unknown_key = 1\n");
        assert!(load(Some(file.path())).is_err());

        let file = write_config("history_window = \"ten\"\n");
        assert!(load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = load(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config {
            history_window: 20,
            ..Config::default()
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }
}
