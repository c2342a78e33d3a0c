pub type CommonResult<T = (), E = CommonError> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Config not initialized")]
    ConfigNotInitialized,
    #[error("Config already initialized")]
    ConfigAlreadyInitialized,
    #[error("Runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
    #[error("Tracing error: {0}")]
    Tracing(String),
}
