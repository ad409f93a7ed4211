use std::{fs, path::Path};

use alloy::dyn_abi::DynSolValue;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Can not read artifact {path}: {error}")]
    CanNotRead { path: String, error: std::io::Error },

    #[error("Artifact is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Artifact has no creation bytecode")]
    MissingBytecode,

    #[error("Artifact bytecode is not valid hex (is the contract fully linked?): {0}")]
    InvalidBytecodeHex(#[from] hex::FromHexError),
}

// Both layouts in the wild: solc/truffle keep a flat "bytecode" hex string,
// forge nests it as "bytecode": { "object": "0x..." }.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Object { object: String },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    bytecode: Option<RawBytecode>,
}

/// A compiled contract artifact: the creation bytecode the deploy
/// transaction carries.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    bytecode: Vec<u8>,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let contents = fs::read_to_string(path).map_err(|error| ArtifactError::CanNotRead {
            path: path.display().to_string(),
            error,
        })?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(contents)?;

        let bytecode_hex = match raw.bytecode {
            Some(RawBytecode::Object { object }) => object,
            Some(RawBytecode::Plain(hex)) => hex,
            None => return Err(ArtifactError::MissingBytecode),
        };

        let trimmed = bytecode_hex.trim_start_matches("0x");
        if trimmed.is_empty() {
            return Err(ArtifactError::MissingBytecode);
        }

        let bytecode = hex::decode(trimmed)?;

        Ok(ContractArtifact { bytecode })
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Creation bytecode with the ABI-encoded constructor arguments appended.
    pub fn init_code(&self, constructor_args: &[DynSolValue]) -> Vec<u8> {
        let mut code = self.bytecode.clone();
        code.extend(encode_constructor_args(constructor_args));
        code
    }
}

/// ABI-encodes constructor arguments as a parameter sequence.
pub fn encode_constructor_args(constructor_args: &[DynSolValue]) -> Vec<u8> {
    if constructor_args.is_empty() {
        return Vec::new();
    }

    DynSolValue::Tuple(constructor_args.to_vec()).abi_encode_params()
}

/// Hex form (no 0x prefix) of the constructor arguments, as the explorer
/// verification API expects them.
pub fn encoded_constructor_args_hex(constructor_args: &[DynSolValue]) -> String {
    hex::encode(encode_constructor_args(constructor_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn parses_a_flat_bytecode_artifact() {
        let artifact =
            ContractArtifact::from_json(r#"{"abi": [], "bytecode": "0x600160005260206000f3"}"#)
                .unwrap();

        assert_eq!(artifact.bytecode().len(), 10);
    }

    #[test]
    fn parses_a_nested_bytecode_artifact() {
        let artifact = ContractArtifact::from_json(
            r#"{"abi": [], "bytecode": {"object": "0x600160005260206000f3"}}"#,
        )
        .unwrap();

        assert_eq!(artifact.bytecode().len(), 10);
    }

    #[test]
    fn missing_bytecode_is_an_error() {
        let result = ContractArtifact::from_json(r#"{"abi": []}"#);
        assert!(matches!(result, Err(ArtifactError::MissingBytecode)));

        let result = ContractArtifact::from_json(r#"{"abi": [], "bytecode": "0x"}"#);
        assert!(matches!(result, Err(ArtifactError::MissingBytecode)));
    }

    #[test]
    fn unlinked_bytecode_is_rejected() {
        let result = ContractArtifact::from_json(
            r#"{"bytecode": "0x6001__$a0e4885f0b5b92dbe0ccb53a6304bc3b19$__6000f3"}"#,
        );
        assert!(matches!(result, Err(ArtifactError::InvalidBytecodeHex(_))));
    }

    #[test]
    fn init_code_appends_the_encoded_token_address() {
        let artifact =
            ContractArtifact::from_json(r#"{"bytecode": "0x600160005260206000f3"}"#).unwrap();

        let token = address!("26988BA8250E009DCC5DF543D78E2277E2AA900B");
        let init_code = artifact.init_code(&[DynSolValue::Address(token)]);

        assert_eq!(init_code.len(), 10 + 32);
        assert_eq!(&init_code[init_code.len() - 20..], token.as_slice());
        // Address args are left-padded to a full word
        assert!(init_code[10..22].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn constructor_args_hex_has_no_prefix() {
        let token = address!("26988BA8250E009DCC5DF543D78E2277E2AA900B");
        let encoded = encoded_constructor_args_hex(&[DynSolValue::Address(token)]);

        assert_eq!(encoded.len(), 64);
        assert!(encoded.ends_with("26988ba8250e009dcc5df543d78e2277e2aa900b"));
        assert!(!encoded.starts_with("0x"));
    }

    #[test]
    fn no_constructor_args_encodes_to_nothing() {
        assert!(encode_constructor_args(&[]).is_empty());
        assert_eq!(encoded_constructor_args_hex(&[]), "");
    }
}
