//! Environment variable handling.

use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const STRONGROOM_ENV: &str = "STRONGROOM_ENV";

    // Overrides
    pub const STRONGROOM_DB_PATH: &str = "STRONGROOM_DB_PATH";
    pub const STRONGROOM_AUDIT_FIRING: &str = "STRONGROOM_AUDIT_FIRING";
    pub const STRONGROOM_AUDIT_WRITE_TIMEOUT_MS: &str = "STRONGROOM_AUDIT_WRITE_TIMEOUT_MS";
    pub const STRONGROOM_AUDIT_ACTOR: &str = "STRONGROOM_AUDIT_ACTOR";
}

/// Environment configuration.
pub struct Environment {
    _guard: (), // Prevent construction outside module
}

impl Environment {
    /// Initialize environment from .env files in `dir`.
    ///
    /// Loads `.env`, `.env.local` and `.env.<STRONGROOM_ENV>` in that order.
    /// Variables already set in the process are never overwritten. Missing
    /// files are skipped; malformed files are an error.
    pub fn init_from(dir: &Path) -> Result<Self, EnvError> {
        load_optional(&dir.join(".env"))?;
        load_optional(&dir.join(".env.local"))?;

        if let Ok(name) = env::var(vars::STRONGROOM_ENV) {
            load_optional(&dir.join(format!(".env.{}", name)))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match env::var(var) {
            Ok(v) => v.parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: "expected integer".to_string(),
            }),
            Err(_) => Ok(None),
        }
    }
}

fn load_optional(path: &Path) -> Result<(), EnvError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
