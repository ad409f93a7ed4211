use exdeploy_core::{
    common_types::EvmAddress,
    deploy::{exchange_constructor_args, publish_source},
};

use crate::{
    commands::error::VerifyCommandError, print_success_message, project_location::ProjectLocation,
};

pub async fn handle_verify(
    network_name: &str,
    address: &str,
    project_location: &ProjectLocation,
) -> Result<(), VerifyCommandError> {
    let config = project_location.setup_config()?;
    let network = config
        .network(network_name)
        .ok_or_else(|| VerifyCommandError::UnknownNetwork(network_name.to_string()))?;

    let contract_address: EvmAddress = address
        .parse()
        .map_err(|_| VerifyCommandError::InvalidAddress(address.to_string()))?;

    // The same constructor arguments the deployment used; the explorer
    // replays them when checking the creation bytecode.
    let constructor_args = exchange_constructor_args(&config, network)?;

    publish_source(
        &config,
        network,
        &contract_address,
        &constructor_args,
        project_location.project_root(),
    )
    .await?;

    print_success_message(&format!(
        "Source for {} verified on the block explorer",
        contract_address
    ));

    Ok(())
}
