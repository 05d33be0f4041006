//! Runtime settings read from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/catalog";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Which Resource Store backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Ordered in-memory list; contents are lost on restart.
    Memory,
    /// Single `products` table in PostgreSQL.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
    pub seed_products: bool,
    /// Single origin allowed by CORS. No CORS layer when unset.
    pub cors_origin: Option<String>,
    /// Answer not-found with 200 and an error body instead of 404.
    pub legacy_not_found: bool,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            backend: StoreBackend::Memory,
            seed_products: true,
            cors_origin: None,
            legacy_not_found: false,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; a `None` or blank value means "use the default".
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidValue {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let backend = match get("STORE_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") | Some("postgresql") => {
                let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                    Some(raw) => parse_number("DATABASE_MAX_CONNECTIONS", &raw)?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                StoreBackend::Postgres {
                    database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
                    max_connections,
                }
            }
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let seed_products = match get("SEED_PRODUCTS") {
            Some(raw) => parse_bool("SEED_PRODUCTS", &raw)?,
            None => true,
        };
        let legacy_not_found = match get("CATALOG_LEGACY_NOT_FOUND") {
            Some(raw) => parse_bool("CATALOG_LEGACY_NOT_FOUND", &raw)?,
            None => false,
        };
        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(raw) => parse_number("BODY_LIMIT_BYTES", &raw)?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        Ok(Settings {
            bind_addr,
            backend,
            seed_products,
            cors_origin: get("CORS_ORIGIN"),
            legacy_not_found,
            body_limit_bytes,
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_seeded_memory_store() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.backend, StoreBackend::Memory);
        assert_eq!(s.bind_addr.port(), 3000);
        assert!(s.seed_products);
        assert!(!s.legacy_not_found);
        assert!(s.cors_origin.is_none());
        assert_eq!(s.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
    }

    #[test]
    fn postgres_backend_reads_database_settings() {
        let s = settings(&[
            ("STORE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://db:5432/shop"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(
            s.backend,
            StoreBackend::Postgres {
                database_url: "postgres://db:5432/shop".into(),
                max_connections: 12,
            }
        );
        assert_eq!(s.backend.name(), "postgres");
    }

    #[test]
    fn flags_and_origin() {
        let s = settings(&[
            ("SEED_PRODUCTS", "no"),
            ("CATALOG_LEGACY_NOT_FOUND", "1"),
            ("CORS_ORIGIN", " http://localhost:5173 "),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert!(!s.seed_products);
        assert!(s.legacy_not_found);
        assert_eq!(s.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(s.bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("CORS_ORIGIN", "  "), ("STORE_BACKEND", "")]).unwrap();
        assert!(s.cors_origin.is_none());
        assert_eq!(s.backend, StoreBackend::Memory);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(settings(&[("STORE_BACKEND", "sqlite")]), Err(ConfigError::UnknownBackend(_))));
        assert!(matches!(
            settings(&[("SEED_PRODUCTS", "maybe")]),
            Err(ConfigError::InvalidValue { key: "SEED_PRODUCTS", .. })
        ));
        assert!(matches!(
            settings(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::InvalidValue { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            settings(&[("STORE_BACKEND", "postgres"), ("DATABASE_MAX_CONNECTIONS", "-1")]),
            Err(ConfigError::InvalidValue { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
