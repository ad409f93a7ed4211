use std::{collections::HashMap, env, path::Path};

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    shared::common_types::EvmAddress,
    yaml::{KeystoreSigningKey, MnemonicSigningKey, RawSigningKey, SigningKey},
};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Signing key has no variant set")]
    NotConfigured,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Keystore password environment variable {0} not set")]
    MissingPasswordEnv(String),

    #[error("Could not decrypt keystore {path}: {error}")]
    KeystoreDecrypt { path: String, error: String },

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
}

fn account_from_raw(raw: &RawSigningKey) -> Result<PrivateKeySigner, AccountError> {
    raw.private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| AccountError::InvalidPrivateKey(e.to_string()))
}

fn account_from_keystore(
    keystore: &KeystoreSigningKey,
    project_root: &Path,
) -> Result<PrivateKeySigner, AccountError> {
    let password = env::var(&keystore.password_env)
        .map_err(|_| AccountError::MissingPasswordEnv(keystore.password_env.clone()))?;

    let path = project_root.join(&keystore.path);
    PrivateKeySigner::decrypt_keystore(&path, password).map_err(|e| {
        AccountError::KeystoreDecrypt { path: keystore.path.clone(), error: e.to_string() }
    })
}

fn account_from_mnemonic(mnemonic: &MnemonicSigningKey) -> Result<PrivateKeySigner, AccountError> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic.phrase.trim())
        .index(mnemonic.index.unwrap_or(0))
        .map_err(|e| AccountError::InvalidMnemonic(e.to_string()))?
        .build()
        .map_err(|e| AccountError::InvalidMnemonic(e.to_string()))
}

/// Turns the configured signing key into a local signer.
///
/// This is the account-retrieval helper the deploy flow signs with: a raw
/// private key, an encrypted JSON keystore (password taken from the named
/// environment variable), or a BIP-39 mnemonic with an optional derivation
/// index.
pub fn get_account(
    signing_key: &SigningKey,
    project_root: &Path,
) -> Result<PrivateKeySigner, AccountError> {
    if let Some(raw) = &signing_key.raw {
        return account_from_raw(raw);
    }

    if let Some(keystore) = &signing_key.keystore {
        return account_from_keystore(keystore, project_root);
    }

    if let Some(mnemonic) = &signing_key.mnemonic {
        return account_from_mnemonic(mnemonic);
    }

    Err(AccountError::NotConfigured)
}

/// Caches resolved signers per network so a command only pays the keystore
/// decryption once.
pub struct AccountManager {
    accounts: Mutex<HashMap<String, PrivateKeySigner>>,
}

impl AccountManager {
    pub fn new() -> Self {
        AccountManager { accounts: Mutex::new(HashMap::new()) }
    }

    pub async fn get_account(
        &self,
        network_name: &str,
        signing_key: &SigningKey,
        project_root: &Path,
    ) -> Result<PrivateKeySigner, AccountError> {
        let mut accounts = self.accounts.lock().await;

        if let Some(account) = accounts.get(network_name) {
            return Ok(account.clone());
        }

        let account = get_account(signing_key, project_root)?;
        accounts.insert(network_name.to_string(), account.clone());

        Ok(account)
    }

    pub async fn address(
        &self,
        network_name: &str,
        signing_key: &SigningKey,
        project_root: &Path,
    ) -> Result<EvmAddress, AccountError> {
        let account = self.get_account(network_name, signing_key, project_root).await?;
        Ok(EvmAddress::new(account.address()))
    }
}

impl Default for AccountManager {
    fn default() -> Self {
        Self::new()
    }
}
