use std::sync::Arc;

use alloy::{
    primitives::U256,
    providers::{Provider, RootProvider},
    rpc::client::ClientBuilder,
    transports::{layers::RetryBackoffLayer, RpcError, TransportErrorKind},
};
use rand::{thread_rng, Rng};
use reqwest::Url;
use thiserror::Error;

use crate::{network::ChainId, shared::common_types::EvmAddress, yaml::NetworkSetupConfig};

pub type DeployerProvider = RootProvider;

#[derive(Error, Debug)]
pub enum RetryClientError {
    #[error("http provider cant be created for {0}: {1}")]
    HttpProviderCantBeCreated(String, String),
}

/// Creates an HTTP provider with retry/backoff on the transport layer.
///
/// Transport-level retries only; the deployment transaction itself is never
/// re-sent.
pub fn create_retry_client(rpc_url: &str) -> Result<Arc<DeployerProvider>, RetryClientError> {
    let url = Url::parse(rpc_url).map_err(|e| {
        RetryClientError::HttpProviderCantBeCreated(rpc_url.to_string(), e.to_string())
    })?;

    let retry_layer = RetryBackoffLayer::new(10, 400, 660);
    let client = ClientBuilder::default().layer(retry_layer).http(url);

    Ok(Arc::new(RootProvider::new(client)))
}

#[derive(Error, Debug)]
pub enum EvmProviderNewError {
    #[error("http provider cant be created for {0}: {1}")]
    HttpProviderCantBeCreated(String, String),

    #[error("Network {0} has no provider urls defined")]
    NoProviderUrls(String),
}

#[derive(Error, Debug)]
pub enum ChainIdValidationError {
    #[error("Provider error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),

    #[error("Network {name} is configured with chain id {expected} but the node reports {actual}")]
    Mismatch { name: String, expected: ChainId, actual: ChainId },
}

/// Read-side RPC access for one configured network.
#[derive(Clone)]
pub struct EvmProvider {
    rpc_clients: Vec<Arc<DeployerProvider>>,
    pub chain_id: ChainId,
    pub name: String,
    pub provider_urls: Vec<String>,
}

impl EvmProvider {
    pub fn new(network: &NetworkSetupConfig) -> Result<Self, EvmProviderNewError> {
        if network.provider_urls.is_empty() {
            return Err(EvmProviderNewError::NoProviderUrls(network.name.clone()));
        }

        let mut rpc_clients = Vec::with_capacity(network.provider_urls.len());
        for url in &network.provider_urls {
            let client = create_retry_client(url).map_err(|e| {
                EvmProviderNewError::HttpProviderCantBeCreated(url.clone(), e.to_string())
            })?;
            rpc_clients.push(client);
        }

        Ok(EvmProvider {
            rpc_clients,
            chain_id: network.chain_id,
            name: network.name.clone(),
            provider_urls: network.provider_urls.clone(),
        })
    }

    /// Spreads reads across the configured provider urls.
    fn rpc_client(&self) -> Arc<DeployerProvider> {
        let index = thread_rng().gen_range(0..self.rpc_clients.len());
        self.rpc_clients[index].clone()
    }

    /// Fails when the node's reported chain id does not match the config.
    /// Nothing should be signed or sent for this network before this passes.
    pub async fn validate_chain_id(&self) -> Result<(), ChainIdValidationError> {
        let actual: ChainId = self.rpc_client().get_chain_id().await?.into();

        if actual != self.chain_id {
            return Err(ChainIdValidationError::Mismatch {
                name: self.name.clone(),
                expected: self.chain_id,
                actual,
            });
        }

        Ok(())
    }

    pub async fn get_balance(
        &self,
        address: &EvmAddress,
    ) -> Result<U256, RpcError<TransportErrorKind>> {
        self.rpc_client().get_balance(address.into_address()).await
    }
}
