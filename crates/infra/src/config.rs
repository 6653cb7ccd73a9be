//! Process configuration, read from environment variables.

use anyhow::{Context, bail};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `USE_PERSISTENT_STORES`: Postgres instead of the in-memory store.
    pub use_persistent_stores: bool,
    /// `DATABASE_URL`, required when `use_persistent_stores` is set.
    pub database_url: Option<String>,
    /// `SEED_DEMO_DATA`: load demo sellers, invoices and a demo user into the
    /// in-memory store.
    pub seed_demo_data: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            use_persistent_stores: false,
            database_url: None,
            seed_demo_data: true,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Some(v) = lookup("USE_PERSISTENT_STORES") {
            config.use_persistent_stores = parse_bool("USE_PERSISTENT_STORES", &v)?;
        }
        if let Some(v) = lookup("SEED_DEMO_DATA") {
            config.seed_demo_data = parse_bool("SEED_DEMO_DATA", &v)?;
        }
        config.database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        if config.use_persistent_stores && config.database_url.is_none() {
            bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("unrecognized boolean {other:?}")).with_context(|| format!("invalid {key}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<DashboardConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_port_8080() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        let err = config_from(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = config_from(&[
            ("USE_PERSISTENT_STORES", "TRUE"),
            ("DATABASE_URL", "postgres://localhost/dashboard"),
        ])
        .unwrap();
        assert!(config.use_persistent_stores);
    }

    #[test]
    fn rejects_unrecognized_booleans() {
        let err = config_from(&[("SEED_DEMO_DATA", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("SEED_DEMO_DATA"));
    }
}
