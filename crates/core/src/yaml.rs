use std::{collections::HashMap, env, fs::File, io::Read, path::Path};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{network::ChainId, shared::common_types::EvmAddress};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSigningKey {
    pub private_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreSigningKey {
    pub path: String,
    /// Name of the environment variable holding the keystore password.
    pub password_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemonicSigningKey {
    pub phrase: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningKey {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw: Option<RawSigningKey>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keystore: Option<KeystoreSigningKey>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mnemonic: Option<MnemonicSigningKey>,
}

impl SigningKey {
    pub fn from_raw(raw: RawSigningKey) -> Self {
        Self { raw: Some(raw), keystore: None, mnemonic: None }
    }

    pub fn from_keystore(keystore: KeystoreSigningKey) -> Self {
        Self { raw: None, keystore: Some(keystore), mnemonic: None }
    }
}

impl SigningKey {
    pub fn validate(&self) -> Result<(), String> {
        if self.raw.is_none() && self.keystore.is_none() && self.mnemonic.is_none() {
            return Err("Signing key is not set".to_string());
        }

        if self.raw.is_some() && self.keystore.is_some() {
            return Err("Signing key can not be both raw and keystore".to_string());
        }

        if self.raw.is_some() && self.mnemonic.is_some() {
            return Err("Signing key can not be both raw and mnemonic".to_string());
        }

        if self.keystore.is_some() && self.mnemonic.is_some() {
            return Err("Signing key can not be both keystore and mnemonic".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtherscanConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Compiled artifact JSON (abi + creation bytecode), relative to the project root.
    pub path: String,
    pub contract_name: String,
    /// Flattened source submitted on verification, relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub compiler_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub optimizer_runs: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSetupConfig {
    pub name: String,
    pub chain_id: ChainId,
    pub provider_urls: Vec<String>,
    #[serde(default)]
    pub verify: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub etherscan: Option<EtherscanConfig>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signing_key: Option<SigningKey>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contract_addresses: Option<HashMap<String, EvmAddress>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confirmations: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signing_key: Option<SigningKey>,
    #[serde(default)]
    pub contract_addresses: HashMap<String, EvmAddress>,
    pub artifact: ArtifactConfig,
    pub networks: Vec<NetworkSetupConfig>,
}

impl SetupConfig {
    /// Looks up a network by its configured name.
    pub fn network(&self, name: &str) -> Option<&NetworkSetupConfig> {
        self.networks.iter().find(|network| network.name == name)
    }

    /// Resolves the signing key for a network, preferring the network's own
    /// key over the top-level one.
    pub fn resolve_signing_key<'a>(
        &'a self,
        network: &'a NetworkSetupConfig,
    ) -> Option<&'a SigningKey> {
        network.signing_key.as_ref().or(self.signing_key.as_ref())
    }

    /// Resolves a contract address by logical name, preferring the network's
    /// own map over the top-level one.
    pub fn resolve_contract_address(
        &self,
        network: &NetworkSetupConfig,
        key: &str,
    ) -> Option<EvmAddress> {
        network
            .contract_addresses
            .as_ref()
            .and_then(|addresses| addresses.get(key))
            .or_else(|| self.contract_addresses.get(key))
            .copied()
    }
}

fn substitute_env_variables(contents: &str) -> Result<String, ReadYamlError> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;
    let mut missing: Vec<String> = Vec::new();
    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => {
                missing.push(var_name.to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing.into_iter().next() {
        return Err(ReadYamlError::EnvironmentVariableNotFound(var_name));
    }

    Ok(result.into_owned())
}

#[derive(Error, Debug)]
pub enum ReadYamlError {
    #[error("Can not find yaml")]
    CanNotFindYaml,

    #[error("Can not read yaml")]
    CanNotReadYaml,

    #[error("Setup config is invalid yaml and does not match the struct - {0}")]
    SetupConfigInvalidYaml(String),

    #[error("Invalid environment variable pattern: {0}")]
    InvalidEnvironmentVariablePattern(#[from] regex::Error),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("No networks defined in the yaml")]
    NoNetworksDefined,

    #[error("Signing key yaml bad format: {0}")]
    SigningKeyYamlError(String),

    #[error("Network {0} provider urls not defined")]
    NetworkProviderUrlsNotDefined(String),

    #[error("Network {0} has no signing key and no top-level signing key is set")]
    SigningKeyNotConfigured(String),

    #[error("Network {0} has verify enabled but no etherscan config")]
    VerifyWithoutEtherscan(String),
}

pub(crate) fn parse(contents: &str) -> Result<SetupConfig, ReadYamlError> {
    let substituted_contents = substitute_env_variables(contents)?;

    let config: SetupConfig = serde_yaml::from_str(&substituted_contents)
        .map_err(|e| ReadYamlError::SetupConfigInvalidYaml(e.to_string()))?;

    if config.networks.is_empty() {
        return Err(ReadYamlError::NoNetworksDefined);
    }

    for network in &config.networks {
        if network.provider_urls.is_empty() {
            return Err(ReadYamlError::NetworkProviderUrlsNotDefined(network.name.clone()));
        }

        if let Some(signing_key) = &network.signing_key {
            signing_key.validate().map_err(ReadYamlError::SigningKeyYamlError)?;
        }

        if network.signing_key.is_none() && config.signing_key.is_none() {
            return Err(ReadYamlError::SigningKeyNotConfigured(network.name.clone()));
        }

        if network.verify && network.etherscan.is_none() {
            return Err(ReadYamlError::VerifyWithoutEtherscan(network.name.clone()));
        }
    }

    if let Some(signing_key) = &config.signing_key {
        signing_key.validate().map_err(ReadYamlError::SigningKeyYamlError)?;
    }

    Ok(config)
}

pub fn read(file_path: &Path) -> Result<SetupConfig, ReadYamlError> {
    let mut file = File::open(file_path).map_err(|_| ReadYamlError::CanNotFindYaml)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|_| ReadYamlError::CanNotReadYaml)?;

    parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_YAML: &str = r#"
name: cryptodev
signing_key:
  raw:
    private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
contract_addresses:
  cryptodev_token: "0x26988ba8250e009dcc5df543d78e2277e2aa900b"
artifact:
  path: build/contracts/Exchange.json
  contract_name: Exchange
  source_path: contracts/Exchange.sol
  compiler_version: v0.8.24+commit.e11b9ed9
networks:
  - name: sepolia
    chain_id: 11155111
    provider_urls:
      - https://sepolia.gateway.tenderly.co
    verify: true
    etherscan:
      api_url: https://api-sepolia.etherscan.io/api
      api_key: test-key
  - name: local
    chain_id: 31337
    provider_urls:
      - http://127.0.0.1:8545
    contract_addresses:
      cryptodev_token: "0x36988ba8250e009dcc5df543d78e2277e2aa900b"
"#;

    #[test]
    fn parses_a_full_config() {
        let config = parse(FULL_YAML).unwrap();

        assert_eq!(config.name, "cryptodev");
        assert_eq!(config.networks.len(), 2);

        let sepolia = config.network("sepolia").unwrap();
        assert!(sepolia.verify);
        assert_eq!(sepolia.chain_id, ChainId::new(11155111));

        let local = config.network("local").unwrap();
        assert!(!local.verify);
    }

    #[test]
    fn network_lookup_misses_return_none() {
        let config = parse(FULL_YAML).unwrap();
        assert!(config.network("mainnet").is_none());
    }

    #[test]
    fn contract_address_prefers_the_network_override() {
        let config = parse(FULL_YAML).unwrap();

        let sepolia = config.network("sepolia").unwrap();
        let global = config.resolve_contract_address(sepolia, "cryptodev_token").unwrap();
        assert_eq!(global.hex().to_lowercase(), "0x26988ba8250e009dcc5df543d78e2277e2aa900b");

        let local = config.network("local").unwrap();
        let overridden = config.resolve_contract_address(local, "cryptodev_token").unwrap();
        assert_ne!(overridden, global);
    }

    #[test]
    fn substitutes_environment_variables() {
        env::set_var("EXDEPLOY_TEST_RPC_URL", "http://10.0.0.1:8545");

        let yaml = FULL_YAML.replace("http://127.0.0.1:8545", "${EXDEPLOY_TEST_RPC_URL}");
        let config = parse(&yaml).unwrap();

        let local = config.network("local").unwrap();
        assert_eq!(local.provider_urls, vec!["http://10.0.0.1:8545".to_string()]);
    }

    #[test]
    fn missing_environment_variable_is_an_error() {
        let yaml = FULL_YAML.replace("http://127.0.0.1:8545", "${EXDEPLOY_TEST_UNSET_VAR}");
        let result = parse(&yaml);

        assert!(matches!(result, Err(ReadYamlError::EnvironmentVariableNotFound(name)) if name == "EXDEPLOY_TEST_UNSET_VAR"));
    }

    #[test]
    fn rejects_a_config_without_networks() {
        let yaml = r#"
name: cryptodev
artifact:
  path: build/contracts/Exchange.json
  contract_name: Exchange
networks: []
"#;
        assert!(matches!(parse(yaml), Err(ReadYamlError::NoNetworksDefined)));
    }

    #[test]
    fn rejects_a_network_without_any_signing_key() {
        let yaml = r#"
name: cryptodev
artifact:
  path: build/contracts/Exchange.json
  contract_name: Exchange
networks:
  - name: local
    chain_id: 31337
    provider_urls:
      - http://127.0.0.1:8545
"#;
        assert!(matches!(
            parse(yaml),
            Err(ReadYamlError::SigningKeyNotConfigured(name)) if name == "local"
        ));
    }

    #[test]
    fn rejects_verify_without_etherscan_config() {
        let yaml = FULL_YAML.replace(
            "    etherscan:\n      api_url: https://api-sepolia.etherscan.io/api\n      api_key: test-key\n",
            "",
        );
        assert!(matches!(
            parse(&yaml),
            Err(ReadYamlError::VerifyWithoutEtherscan(name)) if name == "sepolia"
        ));
    }

    #[test]
    fn signing_key_must_have_exactly_one_variant() {
        let none = SigningKey { raw: None, keystore: None, mnemonic: None };
        assert!(none.validate().is_err());

        let both = SigningKey {
            raw: Some(RawSigningKey { private_key: "0x01".to_string() }),
            keystore: Some(KeystoreSigningKey {
                path: "keystore/deployer.json".to_string(),
                password_env: "KEYSTORE_PASSWORD".to_string(),
            }),
            mnemonic: None,
        };
        assert!(both.validate().is_err());

        let raw = SigningKey::from_raw(RawSigningKey { private_key: "0x01".to_string() });
        assert!(raw.validate().is_ok());
    }
}
