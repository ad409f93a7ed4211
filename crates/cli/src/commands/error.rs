use exdeploy_core::{
    account::AccountError,
    deploy::DeployError,
    provider::{ChainIdValidationError, EvmProviderNewError},
    WriteFileError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectLocationError {
    #[error("Project configuration error: {0}")]
    ProjectConfig(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while scaffolding a project
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Terminal interaction failed: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not write config: {0}")]
    ConfigWrite(#[from] WriteFileError),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum DeployCommandError {
    #[error("Network {0} is not defined in exdeploy.yaml")]
    UnknownNetwork(String),

    #[error("{0}")]
    ProjectLocation(#[from] ProjectLocationError),

    #[error("{0}")]
    Deploy(#[from] DeployError),
}

#[derive(Error, Debug)]
pub enum VerifyCommandError {
    #[error("Network {0} is not defined in exdeploy.yaml")]
    UnknownNetwork(String),

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    ProjectLocation(#[from] ProjectLocationError),

    #[error("{0}")]
    Deploy(#[from] DeployError),
}

#[derive(Error, Debug)]
pub enum AccountCommandError {
    #[error("Network {0} is not defined in exdeploy.yaml")]
    UnknownNetwork(String),

    #[error("Network {0} has no signing key and no top-level signing key is set")]
    SigningKeyNotConfigured(String),

    #[error("{0}")]
    ProjectLocation(#[from] ProjectLocationError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Provider error: {0}")]
    Provider(#[from] EvmProviderNewError),

    #[error("{0}")]
    ChainId(#[from] ChainIdValidationError),

    #[error("Balance query failed: {0}")]
    QueryFailed(String),
}

#[derive(Error, Debug)]
pub enum NetworksError {
    #[error("{0}")]
    ProjectLocation(#[from] ProjectLocationError),
}
