pub mod account;
mod artifact;
pub use artifact::{ArtifactError, ContractArtifact};
pub mod deploy;
mod environment;
pub use environment::load_env_from_project_path;
pub mod explorer;
mod file;
pub use file::{write_file, WriteFileError};
mod logger;
pub use logger::{setup_info_logger, setup_logger};
pub mod network;
pub mod provider;
mod shared;
pub use shared::common_types;
mod yaml;
pub use yaml::{
    read, ArtifactConfig, EtherscanConfig, KeystoreSigningKey, MnemonicSigningKey,
    NetworkSetupConfig, RawSigningKey, ReadYamlError, SetupConfig, SigningKey,
};

pub use tracing::{error as exdeploy_error, info as exdeploy_info};
