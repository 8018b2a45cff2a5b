//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default number of clients a relay room accepts
pub const DEFAULT_ROOM_MAX_CLIENTS: usize = 10;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origins for CORS (comma-separated, `*` for any)
    pub client_origin: String,
    /// Players per relay room
    pub room_max_clients: usize,
    /// Optional JSON vehicle catalog replacing the built-in roster
    pub vehicle_catalog: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // PORT wins over SERVER_ADDR for hosted deployments
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let room_max_clients = match lookup("ROOM_MAX_CLIENTS") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("ROOM_MAX_CLIENTS"))?,
            None => DEFAULT_ROOM_MAX_CLIENTS,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or_else(|| "*".to_string()),
            room_max_clients,
            vehicle_catalog: lookup("VEHICLE_CATALOG")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.client_origin, "*");
        assert_eq!(config.room_max_clients, DEFAULT_ROOM_MAX_CLIENTS);
        assert!(config.vehicle_catalog.is_none());
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9001"),
            ("SERVER_ADDR", "127.0.0.1:7000"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr.port(), 9001);
    }

    #[test]
    fn zero_room_size_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("ROOM_MAX_CLIENTS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("ROOM_MAX_CLIENTS")));
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress));
    }
}
