use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{shared::common_types::EvmAddress, yaml::EtherscanConfig};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const POLL_ATTEMPTS: u32 = 20;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Explorer rejected the request: {0}")]
    Api(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Verification still pending after {0} status checks")]
    Timeout(u32),
}

/// One source-verification submission for a deployed contract.
#[derive(Debug, Clone)]
pub struct VerifyContractRequest {
    pub contract_address: EvmAddress,
    /// Flattened source of the contract.
    pub source_code: String,
    pub contract_name: String,
    pub compiler_version: String,
    pub optimizer_runs: Option<u32>,
    /// ABI-encoded constructor arguments, hex without the 0x prefix.
    pub constructor_args_hex: String,
}

/// Receipt handle the explorer returns for a submitted verification.
#[derive(Debug, Clone)]
pub struct VerificationGuid(String);

impl std::fmt::Display for VerificationGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Pass,
    Fail(String),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(VerificationGuid),
    AlreadyVerified,
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[allow(dead_code)]
    message: String,
    result: String,
}

fn parse_verification_status(result: &str) -> VerificationStatus {
    if result.contains("Pending") {
        return VerificationStatus::Pending;
    }

    if result.contains("Pass") || result.contains("Already Verified") {
        return VerificationStatus::Pass;
    }

    VerificationStatus::Fail(result.to_string())
}

fn is_already_verified(result: &str) -> bool {
    result.to_lowercase().contains("already verified")
}

/// Etherscan-compatible source verification client.
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ExplorerClient {
    pub fn new(config: &EtherscanConfig) -> Self {
        ExplorerClient {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn submit_params(&self, request: &VerifyContractRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.api_key.clone()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", request.contract_address.hex()),
            ("sourceCode", request.source_code.clone()),
            ("codeformat", "solidity-singlefile".to_string()),
            ("contractname", request.contract_name.clone()),
            ("compilerversion", request.compiler_version.clone()),
        ];

        match request.optimizer_runs {
            Some(runs) => {
                params.push(("optimizationUsed", "1".to_string()));
                params.push(("runs", runs.to_string()));
            }
            None => params.push(("optimizationUsed", "0".to_string())),
        }

        if !request.constructor_args_hex.is_empty() {
            // Etherscan's parameter name really is spelt this way
            params.push(("constructorArguements", request.constructor_args_hex.clone()));
        }

        params
    }

    pub async fn submit_verification(
        &self,
        request: &VerifyContractRequest,
    ) -> Result<SubmitOutcome, ExplorerError> {
        let params = self.submit_params(request);

        let response: EtherscanResponse =
            self.http.post(&self.api_url).form(&params).send().await?.json().await?;

        if response.status == "1" {
            return Ok(SubmitOutcome::Submitted(VerificationGuid(response.result)));
        }

        if is_already_verified(&response.result) {
            return Ok(SubmitOutcome::AlreadyVerified);
        }

        Err(ExplorerError::Api(response.result))
    }

    pub async fn check_verification(
        &self,
        guid: &VerificationGuid,
    ) -> Result<VerificationStatus, ExplorerError> {
        let response: EtherscanResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid.0.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(parse_verification_status(&response.result))
    }

    /// Polls the explorer until verification settles, bounded to a fixed
    /// number of checks.
    pub async fn wait_for_verification(
        &self,
        guid: &VerificationGuid,
    ) -> Result<(), ExplorerError> {
        for attempt in 1..=POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            match self.check_verification(guid).await? {
                VerificationStatus::Pass => return Ok(()),
                VerificationStatus::Fail(reason) => {
                    return Err(ExplorerError::VerificationFailed(reason))
                }
                VerificationStatus::Pending => {
                    info!("Verification pending ({}/{})", attempt, POLL_ATTEMPTS);
                }
            }
        }

        Err(ExplorerError::Timeout(POLL_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn test_request() -> VerifyContractRequest {
        VerifyContractRequest {
            contract_address: EvmAddress::new(address!(
                "26988BA8250E009DCC5DF543D78E2277E2AA900B"
            )),
            source_code: "contract Exchange {}".to_string(),
            contract_name: "Exchange".to_string(),
            compiler_version: "v0.8.24+commit.e11b9ed9".to_string(),
            optimizer_runs: Some(200),
            constructor_args_hex:
                "00000000000000000000000026988ba8250e009dcc5df543d78e2277e2aa900b".to_string(),
        }
    }

    fn test_client() -> ExplorerClient {
        ExplorerClient::new(&EtherscanConfig {
            api_url: "https://api-sepolia.etherscan.io/api".to_string(),
            api_key: "test-key".to_string(),
        })
    }

    #[test]
    fn submit_params_carry_the_verification_payload() {
        let params = test_client().submit_params(&test_request());

        let get = |key: &str| {
            params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str()).unwrap_or_default()
        };

        assert_eq!(get("action"), "verifysourcecode");
        assert_eq!(get("codeformat"), "solidity-singlefile");
        assert_eq!(get("contractname"), "Exchange");
        assert_eq!(get("optimizationUsed"), "1");
        assert_eq!(get("runs"), "200");
        assert!(get("constructorArguements").ends_with("e2aa900b"));
    }

    #[test]
    fn no_optimizer_means_optimization_unused_and_no_runs() {
        let mut request = test_request();
        request.optimizer_runs = None;

        let params = test_client().submit_params(&request);

        assert!(params.iter().any(|(k, v)| *k == "optimizationUsed" && v == "0"));
        assert!(!params.iter().any(|(k, _)| *k == "runs"));
    }

    #[test]
    fn empty_constructor_args_are_not_submitted() {
        let mut request = test_request();
        request.constructor_args_hex = String::new();

        let params = test_client().submit_params(&request);

        assert!(!params.iter().any(|(k, _)| *k == "constructorArguements"));
    }

    #[test]
    fn parses_the_status_responses_etherscan_returns() {
        assert_eq!(parse_verification_status("Pending in queue"), VerificationStatus::Pending);
        assert_eq!(parse_verification_status("Pass - Verified"), VerificationStatus::Pass);
        assert_eq!(parse_verification_status("Already Verified"), VerificationStatus::Pass);
        assert_eq!(
            parse_verification_status("Fail - Unable to verify"),
            VerificationStatus::Fail("Fail - Unable to verify".to_string())
        );
    }

    #[test]
    fn already_verified_submissions_count_as_success() {
        assert!(is_already_verified("Contract source code already verified"));
        assert!(!is_already_verified("Max rate limit reached"));
    }

    #[test]
    fn deserializes_the_etherscan_response_shape() {
        let response: EtherscanResponse = serde_json::from_str(
            r#"{"status":"1","message":"OK","result":"tp4hrur4hwzd8dbmqdcnd5dhzbiviavkaiyrz64vbhn22yxmjf"}"#,
        )
        .unwrap();

        assert_eq!(response.status, "1");
        assert_eq!(response.result.len(), 50);
    }
}
