use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_CONNECTIONS_PER_USER, DEFAULT_PORT, MAX_MAX_CONNECTIONS,
    MAX_MAX_CONNECTIONS_PER_USER, MIN_MAX_CONNECTIONS, MIN_MAX_CONNECTIONS_PER_USER, MIN_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum concurrent connections
    pub max_connections: usize,
    /// Maximum concurrent connections (devices) for a single user
    pub max_connections_per_user: usize,
    /// Auto-shutdown when no connections for N seconds (0 = disabled)
    pub idle_shutdown_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_user: DEFAULT_MAX_CONNECTIONS_PER_USER,
            idle_shutdown_secs: 0,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        // Port 0 means "auto-assign" - OS picks an available port.
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::server(format!(
                "server.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.max_connections < MIN_MAX_CONNECTIONS || self.max_connections > MAX_MAX_CONNECTIONS
        {
            return Err(ConfigError::server(format!(
                "server.max_connections must be {}-{}, got {}",
                MIN_MAX_CONNECTIONS, MAX_MAX_CONNECTIONS, self.max_connections
            )));
        }

        if self.max_connections_per_user < MIN_MAX_CONNECTIONS_PER_USER
            || self.max_connections_per_user > MAX_MAX_CONNECTIONS_PER_USER
        {
            return Err(ConfigError::server(format!(
                "server.max_connections_per_user must be {}-{}, got {}",
                MIN_MAX_CONNECTIONS_PER_USER,
                MAX_MAX_CONNECTIONS_PER_USER,
                self.max_connections_per_user
            )));
        }

        if self.max_connections_per_user > self.max_connections {
            return Err(ConfigError::server(format!(
                "server.max_connections_per_user ({}) cannot exceed max_connections ({})",
                self.max_connections_per_user, self.max_connections
            )));
        }

        Ok(())
    }
}
