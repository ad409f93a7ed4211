mod evm_provider;
pub use evm_provider::{
    create_retry_client, ChainIdValidationError, DeployerProvider, EvmProvider,
    EvmProviderNewError, RetryClientError,
};
