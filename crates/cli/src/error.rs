use thiserror::Error;

use crate::commands::error::{
    AccountCommandError, DeployCommandError, InitError, NetworksError, ProjectLocationError,
    VerifyCommandError,
};

/// Top-level CLI error that composes all command-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    #[error("Deploy error: {0}")]
    Deploy(#[from] DeployCommandError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyCommandError),

    #[error("Account error: {0}")]
    Account(#[from] AccountCommandError),

    #[error("Networks error: {0}")]
    Networks(#[from] NetworksError),

    #[error("Configuration error: {0}")]
    ProjectLocation(#[from] ProjectLocationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Terminal interaction error: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<String> for CliError {
    fn from(err: String) -> Self {
        CliError::Internal(err)
    }
}

impl From<&str> for CliError {
    fn from(err: &str) -> Self {
        CliError::Internal(err.to_string())
    }
}
