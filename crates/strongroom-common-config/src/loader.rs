//! Configuration file loading and parsing.

use crate::env::{vars, EnvError, Environment};
use crate::types::StrongroomConfig;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the configuration file, relative to the project root.
pub const CONFIG_DIR: &str = ".strongroom";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Accepted `audit.firing` values: the textual forms of the capture crate's
/// `FiringPolicy`, which the audit facade parses them into.
pub const FIRING_POLICIES: [&str; 2] = ["always", "success_only"];
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the configuration file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.strongroom/config.yaml`.
    ///
    /// Defaults are used when the file does not exist. `STRONGROOM_*`
    /// environment overrides are applied last.
    pub fn load(&self) -> Result<StrongroomConfig, ConfigError> {
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            Self::load_file(&config_path)?
        } else {
            StrongroomConfig::default()
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;
        Ok(config)
    }

    /// Load and validate one configuration file. The file must exist.
    pub fn load_file(path: &Path) -> Result<StrongroomConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let config = parse(&contents)?;
        validate(&config)?;
        Ok(config)
    }
}

/// Parse YAML configuration text, expanding environment variables first.
pub fn parse(contents: &str) -> Result<StrongroomConfig, ConfigError> {
    let expanded = expand_env_vars(contents)?;

    serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| ConfigError::ParseError {
        line: None,
        message: e.to_string(),
    })?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match.as_str(), &value);
    }

    Ok(result)
}

/// Apply `STRONGROOM_*` environment overrides.
pub fn apply_env_overrides(config: &mut StrongroomConfig) -> Result<(), ConfigError> {
    if let Some(path) = Environment::get(vars::STRONGROOM_DB_PATH) {
        config.database.path = path;
    }
    if let Some(firing) = Environment::get(vars::STRONGROOM_AUDIT_FIRING) {
        config.audit.firing = firing;
    }
    if let Some(timeout) = Environment::get_int::<u64>(vars::STRONGROOM_AUDIT_WRITE_TIMEOUT_MS)? {
        config.audit.write_timeout_ms = Some(timeout);
    }
    if let Some(actor) = Environment::get(vars::STRONGROOM_AUDIT_ACTOR) {
        config.audit.default_actor = actor;
    }
    Ok(())
}

/// Validate configuration values.
pub fn validate(config: &StrongroomConfig) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::ValidationError { message });

    if !FIRING_POLICIES.contains(&config.audit.firing.as_str()) {
        return invalid(format!(
            "audit.firing must be one of {:?}, got '{}'",
            FIRING_POLICIES, config.audit.firing
        ));
    }

    if config.audit.write_timeout_ms == Some(0) {
        return invalid("audit.write_timeout_ms must be greater than 0".to_string());
    }

    if config.audit.default_actor.trim().is_empty() {
        return invalid("audit.default_actor must not be empty".to_string());
    }

    if config.database.path.trim().is_empty() {
        return invalid("database.path must not be empty".to_string());
    }

    if config.database.max_connections == 0 {
        return invalid("database.max_connections must be greater than 0".to_string());
    }

    if config.database.min_connections > config.database.max_connections {
        return invalid(
            "database.min_connections cannot exceed database.max_connections".to_string(),
        );
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        return invalid(format!("logging.level '{}' is not a known level", config.logging.level));
    }

    Ok(())
}
