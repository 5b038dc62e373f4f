//! Process configuration from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use bistro_core::TenantId;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not valid: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} is required when USE_PERSISTENT_STORES is set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub seed_demo_data: bool,
    /// Restaurant that receives the demo rows; generated (and logged) when unset.
    pub demo_tenant_id: Option<TenantId>,
    /// Capacity of the realtime broadcast channel; slow SSE clients lag past it.
    pub realtime_buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let use_persistent_stores = parse_bool(&lookup, "USE_PERSISTENT_STORES")?;
        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let realtime_buffer = match lookup("REALTIME_BUFFER") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REALTIME_BUFFER",
                        value: raw,
                    });
                }
            },
            None => 256,
        };

        let demo_tenant_id = match lookup("DEMO_TENANT_ID").filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                name: "DEMO_TENANT_ID",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            use_persistent_stores,
            database_url,
            seed_demo_data: parse_bool(&lookup, "SEED_DEMO_DATA")?,
            demo_tenant_id,
            realtime_buffer,
        })
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    match lookup(name) {
        None => Ok(false),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert!(!cfg.use_persistent_stores);
        assert!(!cfg.seed_demo_data);
        assert_eq!(cfg.realtime_buffer, 256);
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "1"),
            ("DATABASE_URL", "postgres://localhost/bistro"),
        ])
        .unwrap();
        assert!(cfg.use_persistent_stores);
    }

    #[test]
    fn rejects_garbage() {
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("SEED_DEMO_DATA", "maybe")]).is_err());
        assert!(config(&[("REALTIME_BUFFER", "0")]).is_err());
        assert!(config(&[("DEMO_TENANT_ID", "restaurant-1")]).is_err());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("SEED_DEMO_DATA", "yes"),
            ("REALTIME_BUFFER", "16"),
            ("DEMO_TENANT_ID", "0190a5b2-7c3e-7d4f-8a1b-2c3d4e5f6a7b"),
        ])
        .unwrap();
        assert_eq!(
            cfg.demo_tenant_id.map(|t| t.to_string()).as_deref(),
            Some("0190a5b2-7c3e-7d4f-8a1b-2c3d4e5f6a7b")
        );
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert!(cfg.seed_demo_data);
        assert_eq!(cfg.realtime_buffer, 16);
    }
}
