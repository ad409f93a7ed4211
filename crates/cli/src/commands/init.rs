use std::{collections::HashMap, fs, path::Path};

use dialoguer::{Confirm, Input};
use exdeploy_core::{
    common_types::EvmAddress, deploy::TOKEN_ADDRESS_KEY, network::ChainId, write_file,
    ArtifactConfig, EtherscanConfig, NetworkSetupConfig, RawSigningKey, SetupConfig, SigningKey,
    WriteFileError,
};

use crate::{
    commands::error::InitError, print_success_message, project_location::SETUP_CONFIG_FILE,
};

fn write_gitignore(path: &Path) -> Result<(), WriteFileError> {
    write_file(
        &path.join(".gitignore"),
        r#".env
"#,
    )
}

pub async fn handle_init(path: &Path) -> Result<(), InitError> {
    let project_name: String = Input::new().with_prompt("Enter project name").interact_text()?;

    let project_description: String = Input::new()
        .with_prompt("Enter project description (skip by pressing Enter)")
        .allow_empty(true)
        .interact_text()?;

    let token_address_input: String = Input::new()
        .with_prompt("Token contract address the Exchange trades (skip by pressing Enter)")
        .allow_empty(true)
        .interact_text()?;

    let token_address = if token_address_input.is_empty() {
        EvmAddress::zero()
    } else {
        token_address_input
            .parse::<EvmAddress>()
            .map_err(|_| InitError::InvalidAddress(token_address_input.clone()))?
    };

    let verify_on_sepolia = Confirm::new()
        .with_prompt("Verify source on Etherscan after deploying to sepolia?")
        .default(true)
        .interact()?;

    let project_path = path.join(&project_name);

    fs::create_dir(&project_path)?;

    let yaml_content: SetupConfig = SetupConfig {
        name: project_name.clone(),
        description: if !project_description.is_empty() { Some(project_description) } else { None },
        signing_key: Some(SigningKey::from_raw(RawSigningKey {
            private_key: "${DEPLOYER_PRIVATE_KEY}".to_string(),
        })),
        contract_addresses: HashMap::from([(TOKEN_ADDRESS_KEY.to_string(), token_address)]),
        artifact: ArtifactConfig {
            path: "build/contracts/Exchange.json".to_string(),
            contract_name: "Exchange".to_string(),
            source_path: Some("contracts/Exchange.sol".to_string()),
            compiler_version: Some("v0.8.24+commit.e11b9ed9".to_string()),
            optimizer_runs: Some(200),
        },
        networks: vec![
            NetworkSetupConfig {
                name: "sepolia".to_string(),
                chain_id: ChainId::new(11155111),
                provider_urls: vec!["https://sepolia.gateway.tenderly.co".to_string()],
                verify: verify_on_sepolia,
                etherscan: Some(EtherscanConfig {
                    api_url: "https://api-sepolia.etherscan.io/api".to_string(),
                    api_key: "${ETHERSCAN_API_KEY}".to_string(),
                }),
                signing_key: None,
                contract_addresses: None,
                confirmations: None,
            },
            NetworkSetupConfig {
                name: "local".to_string(),
                chain_id: ChainId::new(31337),
                provider_urls: vec!["http://127.0.0.1:8545".to_string()],
                verify: false,
                etherscan: None,
                signing_key: None,
                contract_addresses: None,
                confirmations: None,
            },
        ],
    };
    fs::write(project_path.join(SETUP_CONFIG_FILE), serde_yaml::to_string(&yaml_content)?)?;

    let env = "DEPLOYER_PRIVATE_KEY=\nETHERSCAN_API_KEY=\n";
    write_file(&project_path.join(".env"), env).map_err(InitError::ConfigWrite)?;

    write_gitignore(&project_path).map_err(InitError::ConfigWrite)?;

    print_success_message(&format!(
        "\nProject '{}' initialized successfully! Fill in DEPLOYER_PRIVATE_KEY and ETHERSCAN_API_KEY in the .env, drop the compiled Exchange artifact under build/contracts and run 'exdeploy deploy --network sepolia'.",
        project_name
    ));

    Ok(())
}
