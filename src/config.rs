use tracing::warn;

use crate::game::FinalizePolicy;

/// Runtime configuration read from the environment at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// When absent the server runs on the in-memory store
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub finalize_policy: FinalizePolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to
    /// defaults for missing or unparseable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5),
            run_migrations: parse_flag(&lookup, "RUN_MIGRATIONS", true),
            finalize_policy: FinalizePolicy {
                allow_corrections: parse_flag(&lookup, "ALLOW_RESULT_CORRECTIONS", false),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable configuration value");
            default
        }),
        None => default,
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        Some(raw) if matches!(raw.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(raw) if matches!(raw.as_str(), "0" | "false" | "no" | "off") => false,
        Some(raw) => {
            warn!(key, value = %raw, "Ignoring unparseable flag");
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::default();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
        assert!(!config.finalize_policy.allow_corrections);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/pickem"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("RUN_MIGRATIONS", "false"),
            ("ALLOW_RESULT_CORRECTIONS", "TRUE"),
        ]);

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/pickem")
        );
        assert_eq!(config.max_connections, 12);
        assert!(!config.run_migrations);
        assert!(config.finalize_policy.allow_corrections);
    }

    #[test]
    fn falls_back_on_garbage() {
        let config = config_from(&[
            ("DATABASE_URL", "   "),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
            ("ALLOW_RESULT_CORRECTIONS", "maybe"),
        ]);

        assert_eq!(config.database_url, None);
        assert_eq!(config.max_connections, 5);
        assert!(!config.finalize_policy.allow_corrections);
    }
}
