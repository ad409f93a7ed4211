use exdeploy_core::{account::AccountManager, deploy::deploy_exchange};

use crate::{
    commands::error::DeployCommandError, print_success_message, project_location::ProjectLocation,
};

pub async fn handle_deploy(
    network_name: &str,
    project_location: &ProjectLocation,
) -> Result<(), DeployCommandError> {
    let config = project_location.setup_config()?;
    let network = config
        .network(network_name)
        .ok_or_else(|| DeployCommandError::UnknownNetwork(network_name.to_string()))?;

    let accounts = AccountManager::new();
    let result =
        deploy_exchange(&config, network, &accounts, project_location.project_root()).await?;

    print_success_message(&format!(
        "\nExchange deployed to {} at {}",
        network.name, result.contract_address
    ));
    println!("Transaction hash: {}", result.transaction_hash);
    println!("Deployer:         {}", result.deployer);
    if result.verified {
        print_success_message("Source verified on the block explorer");
    }

    Ok(())
}
