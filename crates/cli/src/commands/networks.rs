use crate::{
    commands::error::NetworksError, console::print_table, project_location::ProjectLocation,
};

pub fn handle_networks(project_location: &ProjectLocation) -> Result<(), NetworksError> {
    let config = project_location.setup_config()?;

    let rows = config
        .networks
        .iter()
        .map(|network| {
            vec![
                network.name.clone(),
                network.chain_id.to_string(),
                if network.verify { "yes" } else { "no" }.to_string(),
                network.provider_urls.len().to_string(),
                network
                    .etherscan
                    .as_ref()
                    .map(|etherscan| etherscan.api_url.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    print_table(
        vec!["Name", "Chain ID", "Verify", "Providers", "Explorer API"],
        rows,
        Some(&format!("Networks for {}", config.name)),
    );

    Ok(())
}
