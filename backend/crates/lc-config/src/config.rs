use crate::{
    BrokerConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, RateLimitConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub rate_limit: RateLimitConfig,
    pub broker: BrokerConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. LC_CONFIG_DIR env var, else ./.lc/
    /// 2. Create the config directory if missing
    /// 3. Parse config.toml if present, else defaults
    /// 4. Apply LC_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: LC_CONFIG_DIR env var > ./.lc/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate every section. Call after load() to fail fast at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.websocket.validate()?;
        self.rate_limit.validate()?;
        self.broker.validate()?;

        if let Some(file) = &self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::logging(
                "logging.file must be a relative file name and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => {
                let dir = Self::config_dir()?.join(&self.logging.dir);
                Ok(Some(dir.join(file)))
            }
            None => Ok(None),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} connections, {} per user)",
            self.server.host,
            self.server.port,
            self.server.max_connections,
            self.server.max_connections_per_user
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s, max_frame={}B",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs,
            self.websocket.max_frame_bytes
        );
        info!(
            "  rate_limit: {}/{}s",
            self.rate_limit.max_requests, self.rate_limit.window_secs
        );
        info!(
            "  broker: typing ttl={}s sweep={}s, truncation={}s cap={}, history={}",
            self.broker.typing_ttl_secs,
            self.broker.typing_sweep_interval_secs,
            self.broker.log_truncation_interval_secs,
            self.broker.message_retention_cap,
            self.broker.history_limit
        );
        info!(
            "  limits: message={} chars, trade participants={}, reactions={}",
            self.broker.max_message_length,
            self.broker.max_trade_participants,
            self.broker.max_reactions_per_message
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("LC_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("LC_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse("LC_SERVER_MAX_CONNECTIONS", &mut self.server.max_connections);
        Self::apply_env_parse(
            "LC_SERVER_MAX_CONNECTIONS_PER_USER",
            &mut self.server.max_connections_per_user,
        );
        Self::apply_env_parse("LC_IDLE_SHUTDOWN_SECS", &mut self.server.idle_shutdown_secs);

        // Logging
        Self::apply_env_parse("LC_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("LC_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("LC_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("LC_LOG_DIR", &mut self.logging.dir);

        // WebSocket
        Self::apply_env_parse("LC_WS_SEND_BUFFER_SIZE", &mut self.websocket.send_buffer_size);
        Self::apply_env_parse(
            "LC_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "LC_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );
        Self::apply_env_parse("LC_WS_MAX_FRAME_BYTES", &mut self.websocket.max_frame_bytes);

        // Rate limit
        Self::apply_env_parse("LC_RATE_LIMIT_MAX_REQUESTS", &mut self.rate_limit.max_requests);
        Self::apply_env_parse("LC_RATE_LIMIT_WINDOW_SECS", &mut self.rate_limit.window_secs);

        // Broker
        Self::apply_env_parse("LC_TYPING_TTL_SECS", &mut self.broker.typing_ttl_secs);
        Self::apply_env_parse(
            "LC_TYPING_SWEEP_INTERVAL_SECS",
            &mut self.broker.typing_sweep_interval_secs,
        );
        Self::apply_env_parse(
            "LC_LOG_TRUNCATION_INTERVAL_SECS",
            &mut self.broker.log_truncation_interval_secs,
        );
        Self::apply_env_parse(
            "LC_MESSAGE_RETENTION_CAP",
            &mut self.broker.message_retention_cap,
        );
        Self::apply_env_parse("LC_HISTORY_LIMIT", &mut self.broker.history_limit);
        Self::apply_env_parse("LC_MAX_MESSAGE_LENGTH", &mut self.broker.max_message_length);
        Self::apply_env_parse(
            "LC_MAX_TRADE_PARTICIPANTS",
            &mut self.broker.max_trade_participants,
        );
        Self::apply_env_parse(
            "LC_MAX_REACTIONS_PER_MESSAGE",
            &mut self.broker.max_reactions_per_message,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
