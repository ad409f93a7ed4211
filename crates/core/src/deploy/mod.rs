use std::{fs, path::Path};

use alloy::{
    dyn_abi::DynSolValue,
    network::{EthereumWallet, TransactionBuilder},
    primitives::TxHash,
    providers::{PendingTransactionError, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    sol,
    transports::{RpcError, TransportErrorKind},
};
use reqwest::Url;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    account::{AccountError, AccountManager},
    artifact::{encoded_constructor_args_hex, ArtifactError, ContractArtifact},
    explorer::{ExplorerClient, ExplorerError, SubmitOutcome, VerifyContractRequest},
    provider::{ChainIdValidationError, EvmProvider, EvmProviderNewError},
    shared::common_types::EvmAddress,
    yaml::{NetworkSetupConfig, SetupConfig},
};

/// Logical name the token contract address is configured under.
pub const TOKEN_ADDRESS_KEY: &str = "cryptodev_token";

pub const DEFAULT_CONFIRMATIONS: u64 = 1;

sol! {
    #[sol(rpc)]
    interface IExchange {
        function tokenAddress() external view returns (address);
    }
}

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Network {0} has no signing key and no top-level signing key is set")]
    SigningKeyNotConfigured(String),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("No contract address configured under {key} for network {network}")]
    TokenAddressNotConfigured { network: String, key: &'static str },

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Provider error: {0}")]
    Provider(#[from] EvmProviderNewError),

    #[error("{0}")]
    ChainId(#[from] ChainIdValidationError),

    #[error("Network {0} has no provider urls defined")]
    NoProviderUrls(String),

    #[error("Invalid provider url {url}: {error}")]
    InvalidProviderUrl { url: String, error: String },

    #[error("Rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),

    #[error("Could not get deployment receipt: {0}")]
    Receipt(#[from] PendingTransactionError),

    #[error("Deployment transaction {0} reverted")]
    DeploymentReverted(TxHash),

    #[error("Deployment receipt carries no contract address")]
    NoContractAddressInReceipt,

    #[error("Network {0} has verify enabled but no etherscan config")]
    MissingVerificationConfig(String),

    #[error("Verification needs {0} set in the artifact config")]
    MissingVerificationMetadata(&'static str),

    #[error("Can not read contract source {path}: {error}")]
    SourceRead { path: String, error: std::io::Error },

    #[error("Explorer error: {0}")]
    Explorer(#[from] ExplorerError),
}

#[derive(Debug, Clone)]
pub struct DeployResult {
    pub contract_address: EvmAddress,
    pub transaction_hash: TxHash,
    pub deployer: EvmAddress,
    pub verified: bool,
}

/// Resolves the token contract address configured under
/// [`TOKEN_ADDRESS_KEY`] for a network.
pub fn resolve_token_address(
    config: &SetupConfig,
    network: &NetworkSetupConfig,
) -> Result<EvmAddress, DeployError> {
    config.resolve_contract_address(network, TOKEN_ADDRESS_KEY).ok_or(
        DeployError::TokenAddressNotConfigured {
            network: network.name.clone(),
            key: TOKEN_ADDRESS_KEY,
        },
    )
}

/// The Exchange constructor arguments for a network: just the token address.
pub fn exchange_constructor_args(
    config: &SetupConfig,
    network: &NetworkSetupConfig,
) -> Result<Vec<DynSolValue>, DeployError> {
    let token_address = resolve_token_address(config, network)?;
    Ok(vec![DynSolValue::Address(token_address.into_address())])
}

/// Deploys the Exchange contract to the given network.
///
/// One deployment transaction per invocation: the configured token address
/// as the constructor argument, signed by the resolved account, with source
/// verification submitted afterwards iff the network's `verify` flag is set.
pub async fn deploy_exchange(
    config: &SetupConfig,
    network: &NetworkSetupConfig,
    accounts: &AccountManager,
    project_root: &Path,
) -> Result<DeployResult, DeployError> {
    let signing_key = config
        .resolve_signing_key(network)
        .ok_or_else(|| DeployError::SigningKeyNotConfigured(network.name.clone()))?;
    let account = accounts.get_account(&network.name, signing_key, project_root).await?;
    let deployer = EvmAddress::new(account.address());

    let token_address = resolve_token_address(config, network)?;
    let constructor_args = vec![DynSolValue::Address(token_address.into_address())];

    let evm_provider = EvmProvider::new(network)?;
    evm_provider.validate_chain_id().await?;

    let artifact = ContractArtifact::load(&project_root.join(&config.artifact.path))?;
    let init_code = artifact.init_code(&constructor_args);

    info!(
        "Deploying {} to {} from {}",
        config.artifact.contract_name, network.name, deployer
    );

    let rpc_url = network
        .provider_urls
        .first()
        .ok_or_else(|| DeployError::NoProviderUrls(network.name.clone()))?;
    let rpc_url = Url::parse(rpc_url).map_err(|e| DeployError::InvalidProviderUrl {
        url: rpc_url.clone(),
        error: e.to_string(),
    })?;

    let wallet = EthereumWallet::from(account);
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);

    let transaction = TransactionRequest::default()
        .with_from(deployer.into_address())
        .with_deploy_code(init_code);

    let pending = provider.send_transaction(transaction).await?;
    let transaction_hash = *pending.tx_hash();
    info!("Deployment transaction sent: {}", transaction_hash);

    let confirmations = network.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS);
    let receipt = pending.with_required_confirmations(confirmations).get_receipt().await?;

    if !receipt.status() {
        return Err(DeployError::DeploymentReverted(transaction_hash));
    }

    let contract_address = receipt
        .contract_address
        .map(EvmAddress::new)
        .ok_or(DeployError::NoContractAddressInReceipt)?;

    info!("{} deployed at {}", config.artifact.contract_name, contract_address);

    // Read the token address back through the binding; the deployment stands
    // either way, so a failed read only warns.
    let exchange = IExchange::new(contract_address.into_address(), &provider);
    match exchange.tokenAddress().call().await {
        Ok(token) if EvmAddress::new(token) == token_address => {
            info!("Exchange token address read back: {:?}", token);
        }
        Ok(token) => {
            warn!("Deployed Exchange reports an unexpected token address: {:?}", token);
        }
        Err(e) => warn!("Could not read the token address back from the Exchange: {}", e),
    }

    let verified = if network.verify {
        publish_source(config, network, &contract_address, &constructor_args, project_root)
            .await?;
        true
    } else {
        false
    };

    Ok(DeployResult { contract_address, transaction_hash, deployer, verified })
}

/// Submits the contract source to the network's explorer and waits for the
/// verification verdict.
pub async fn publish_source(
    config: &SetupConfig,
    network: &NetworkSetupConfig,
    contract_address: &EvmAddress,
    constructor_args: &[DynSolValue],
    project_root: &Path,
) -> Result<(), DeployError> {
    let etherscan = network
        .etherscan
        .as_ref()
        .ok_or_else(|| DeployError::MissingVerificationConfig(network.name.clone()))?;

    let source_path = config
        .artifact
        .source_path
        .as_ref()
        .ok_or(DeployError::MissingVerificationMetadata("source_path"))?;
    let compiler_version = config
        .artifact
        .compiler_version
        .clone()
        .ok_or(DeployError::MissingVerificationMetadata("compiler_version"))?;

    let source_code = fs::read_to_string(project_root.join(source_path)).map_err(|error| {
        DeployError::SourceRead { path: source_path.clone(), error }
    })?;

    let request = VerifyContractRequest {
        contract_address: *contract_address,
        source_code,
        contract_name: config.artifact.contract_name.clone(),
        compiler_version,
        optimizer_runs: config.artifact.optimizer_runs,
        constructor_args_hex: encoded_constructor_args_hex(constructor_args),
    };

    let client = ExplorerClient::new(etherscan);
    match client.submit_verification(&request).await? {
        SubmitOutcome::AlreadyVerified => {
            info!("Source for {} already verified", contract_address);
        }
        SubmitOutcome::Submitted(guid) => {
            info!("Verification submitted, guid {}", guid);
            client.wait_for_verification(&guid).await?;
            info!("Source for {} verified", contract_address);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ChainId;
    use crate::yaml::{ArtifactConfig, RawSigningKey, SigningKey};
    use alloy::primitives::address;
    use std::collections::HashMap;

    fn test_config(network_token: Option<EvmAddress>) -> (SetupConfig, NetworkSetupConfig) {
        let network = NetworkSetupConfig {
            name: "local".to_string(),
            chain_id: ChainId::new(31337),
            provider_urls: vec!["http://127.0.0.1:8545".to_string()],
            verify: false,
            etherscan: None,
            signing_key: None,
            contract_addresses: network_token
                .map(|token| HashMap::from([(TOKEN_ADDRESS_KEY.to_string(), token)])),
            confirmations: None,
        };

        let config = SetupConfig {
            name: "cryptodev".to_string(),
            description: None,
            signing_key: Some(SigningKey::from_raw(RawSigningKey {
                private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                    .to_string(),
            })),
            contract_addresses: HashMap::from([(
                TOKEN_ADDRESS_KEY.to_string(),
                EvmAddress::new(address!("26988BA8250E009DCC5DF543D78E2277E2AA900B")),
            )]),
            artifact: ArtifactConfig {
                path: "build/contracts/Exchange.json".to_string(),
                contract_name: "Exchange".to_string(),
                source_path: None,
                compiler_version: None,
                optimizer_runs: None,
            },
            networks: vec![network.clone()],
        };

        (config, network)
    }

    #[test]
    fn constructor_args_use_the_configured_token_address() {
        let (config, network) = test_config(None);

        let args = exchange_constructor_args(&config, &network).unwrap();
        assert_eq!(
            args,
            vec![DynSolValue::Address(address!("26988BA8250E009DCC5DF543D78E2277E2AA900B"))]
        );
    }

    #[test]
    fn constructor_args_prefer_the_network_override() {
        let override_token = EvmAddress::new(address!("36988BA8250E009DCC5DF543D78E2277E2AA900B"));
        let (config, network) = test_config(Some(override_token));

        let args = exchange_constructor_args(&config, &network).unwrap();
        assert_eq!(args, vec![DynSolValue::Address(override_token.into_address())]);
    }

    #[test]
    fn missing_token_address_is_an_error() {
        let (mut config, network) = test_config(None);
        config.contract_addresses.clear();

        assert!(matches!(
            exchange_constructor_args(&config, &network),
            Err(DeployError::TokenAddressNotConfigured { key, .. }) if key == TOKEN_ADDRESS_KEY
        ));
    }
}
