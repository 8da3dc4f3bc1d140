use lc_config::ServerConfig;

/// Configuration for connection limits
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    /// Maximum live connections (devices) for a single user
    pub max_per_user: usize,
    /// Maximum total connections across all users
    pub max_total: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_per_user: 10,
            max_total: 10000,
        }
    }
}

impl From<&ServerConfig> for ConnectionLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_per_user: config.max_connections_per_user,
            max_total: config.max_connections,
        }
    }
}
