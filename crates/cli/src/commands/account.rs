use alloy::primitives::utils::format_ether;
use exdeploy_core::{account::get_account, common_types::EvmAddress, provider::EvmProvider};

use crate::{
    commands::error::AccountCommandError, print_warn_message, project_location::ProjectLocation,
};

pub async fn handle_account(
    network_name: &str,
    project_location: &ProjectLocation,
) -> Result<(), AccountCommandError> {
    let config = project_location.setup_config()?;
    let network = config
        .network(network_name)
        .ok_or_else(|| AccountCommandError::UnknownNetwork(network_name.to_string()))?;

    let signing_key = config
        .resolve_signing_key(network)
        .ok_or_else(|| AccountCommandError::SigningKeyNotConfigured(network.name.clone()))?;
    let account = get_account(signing_key, project_location.project_root())?;
    let address = EvmAddress::new(account.address());

    let provider = EvmProvider::new(network)?;
    provider.validate_chain_id().await?;

    let balance = provider
        .get_balance(&address)
        .await
        .map_err(|e| AccountCommandError::QueryFailed(e.to_string()))?;

    println!("Network:  {}", network.name);
    println!("Deployer: {}", address);
    println!("Balance:  {} ETH", format_ether(balance));

    if balance.is_zero() {
        print_warn_message("Deployer balance is zero, a deployment from this account will fail");
    }

    Ok(())
}
