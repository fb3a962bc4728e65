//! Configuration types for Strongroom.
//!
//! This crate provides the configuration types used by Strongroom
//! for `.strongroom/config.yaml` files.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = StrongroomConfig::default();

        assert_eq!(config.audit.firing, "always");
        assert_eq!(config.audit.write_timeout_ms, None);
        assert_eq!(config.audit.default_actor, "system");

        assert_eq!(config.database.path, ".strongroom/audit.db");
        assert!(!config.database.is_in_memory());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert!(config.database.wal_mode);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file.is_none());

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&StrongroomConfig::default()).unwrap();

        assert!(yaml.contains("audit:"));
        assert!(yaml.contains("database:"));
        assert!(yaml.contains("logging:"));
        assert!(yaml.contains("firing: always"));
        assert!(yaml.contains("busy_timeout_ms: 5000"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
database:
  path: ":memory:"
"#;

        let config: StrongroomConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert!(config.database.is_in_memory());
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.audit, AuditSettings::default());
        assert_eq!(config.logging, LoggingSettings::default());
    }
}
