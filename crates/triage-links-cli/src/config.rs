use std::path::PathBuf;

use serde::Deserialize;
use triage_links::PathMappingConfig;

use crate::CliBackend;

pub const LOCAL_BASE_PATH_ENV: &str = "TRIAGE_LOCAL_BASE_PATH";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mapping: PathMappingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mapping: PathMappingConfig::default(),
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("parse config: {0}")]
    Parse(String),
    #[error("failed to resolve HOME")]
    Home,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    mapping: PartialMappingConfig,
    #[serde(default)]
    logging: PartialLoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PartialMappingConfig {
    #[serde(default)]
    local_base_path: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLoggingConfig {
    #[serde(default)]
    level: String,
}

/// Load config with precedence:
/// defaults < config file (explicit => hard error if unreadable) < environment.
///
/// The returned path is the config file actually applied, if any.
pub fn load_config(
    config_file: Option<&str>,
    backend: &dyn CliBackend,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let mut cfg = Config::default();

    let explicit = config_file
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let (path_to_try, used) = if let Some(path) = explicit {
        (Some(path), true)
    } else {
        (default_config_path(backend), false)
    };

    let mut applied = None;
    if let Some(path) = path_to_try {
        let display = path.to_string_lossy().to_string();
        match backend.read_file(&display) {
            Ok(text) => {
                let parsed: PartialConfig = serde_yaml::from_str(&text)
                    .map_err(|err| ConfigError::Parse(err.to_string()))?;
                apply_partial(&mut cfg, parsed, backend)?;
                applied = Some(path);
            }
            Err(message) => {
                if used {
                    return Err(ConfigError::Read {
                        path: display,
                        message,
                    });
                }
            }
        }
    }

    if let Some(base) = backend.env_var(LOCAL_BASE_PATH_ENV) {
        if !base.trim().is_empty() {
            cfg.mapping.local_base_path = expand_tilde(base.trim(), backend)?;
        }
    }

    Ok((cfg, applied))
}

fn default_config_path(backend: &dyn CliBackend) -> Option<PathBuf> {
    if let Some(xdg) = backend.env_var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("triage-links").join("config.yaml"));
        }
    }
    if let Some(home) = backend.env_var("HOME") {
        if !home.trim().is_empty() {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("triage-links")
                    .join("config.yaml"),
            );
        }
    }
    None
}

fn apply_partial(
    cfg: &mut Config,
    partial: PartialConfig,
    backend: &dyn CliBackend,
) -> Result<(), ConfigError> {
    if !partial.mapping.local_base_path.trim().is_empty() {
        cfg.mapping.local_base_path =
            expand_tilde(partial.mapping.local_base_path.trim(), backend)?;
    }
    if !partial.logging.level.trim().is_empty() {
        cfg.logging.level = partial.logging.level.trim().to_string();
    }
    Ok(())
}

fn expand_tilde(input: &str, backend: &dyn CliBackend) -> Result<String, ConfigError> {
    if input == "~" {
        return backend.env_var("HOME").ok_or(ConfigError::Home);
    }
    if let Some(rest) = input.strip_prefix("~/") {
        let home = backend.env_var("HOME").ok_or(ConfigError::Home)?;
        return Ok(format!("{}/{rest}", home.trim_end_matches('/')));
    }
    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::{load_config, Config, ConfigError, LOCAL_BASE_PATH_ENV};
    use crate::tests_common::MockBackend;

    #[test]
    fn defaults_leave_base_path_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.mapping.local_base_path, "");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn missing_config_file_is_ok_when_not_explicit() {
        let backend = MockBackend::default().with_env("HOME", "/home/qa");
        let (cfg, used) = match load_config(None, &backend) {
            Ok(value) => value,
            Err(err) => panic!("load: {err}"),
        };
        assert_eq!(used, None);
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let backend = MockBackend::default();
        match load_config(Some("/nope/config.yaml"), &backend) {
            Err(ConfigError::Read { path, .. }) => assert_eq!(path, "/nope/config.yaml"),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn default_config_file_under_xdg_is_applied() {
        let backend = MockBackend::default()
            .with_env("XDG_CONFIG_HOME", "/xdg")
            .with_env("HOME", "/home/qa")
            .with_file(
                "/xdg/triage-links/config.yaml",
                "mapping:\n  local_base_path: ~/checkout/tests\nlogging:\n  level: debug\n",
            );
        let (cfg, used) = match load_config(None, &backend) {
            Ok(value) => value,
            Err(err) => panic!("load: {err}"),
        };
        assert_eq!(
            used.map(|p| p.to_string_lossy().to_string()).as_deref(),
            Some("/xdg/triage-links/config.yaml")
        );
        assert_eq!(cfg.mapping.local_base_path, "/home/qa/checkout/tests");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn environment_overrides_config_file() {
        let backend = MockBackend::default()
            .with_env(LOCAL_BASE_PATH_ENV, "C:/mine")
            .with_file("/etc/tl.yaml", "mapping:\n  local_base_path: /from/file\n");
        let (cfg, _) = match load_config(Some("/etc/tl.yaml"), &backend) {
            Ok(value) => value,
            Err(err) => panic!("load: {err}"),
        };
        assert_eq!(cfg.mapping.local_base_path, "C:/mine");
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let backend = MockBackend::default().with_file("/etc/tl.yaml", "mapping: [unclosed\n");
        assert!(matches!(
            load_config(Some("/etc/tl.yaml"), &backend),
            Err(ConfigError::Parse(_))
        ));
    }
}
