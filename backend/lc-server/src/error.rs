use thiserror::Error;

/// Startup failures; anything after the listener is bound is logged instead.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] lc_config::ConfigError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Metrics exporter error: {message}")]
    MetricsExporter { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
