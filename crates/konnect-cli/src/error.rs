use konnect_common::error::CommonError;
use konnect_operator::OperatorError;
use thiserror::Error;

pub type CliResult<T = (), E = CliError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unable to initialize config: {0}")]
    InitConfig(String),
    #[error("Unable to run command: {0}")]
    Command(#[from] clap::error::Error),
    #[error(transparent)]
    Common(#[from] CommonError),
    #[error("Operator failed: {0}")]
    Operator(#[from] OperatorError),
    #[error("Invalid Json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

