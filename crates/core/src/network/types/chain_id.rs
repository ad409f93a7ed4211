use std::{
    error::Error,
    fmt::Display,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Copy, Clone, Serialize, Eq)]
pub struct ChainId(u64);

impl Default for ChainId {
    fn default() -> Self {
        ChainId(1)
    }
}

impl ChainId {
    pub fn new(id: u64) -> Self {
        ChainId(id)
    }
    pub fn u64(&self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;

        Ok(ChainId(id))
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ChainId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq for ChainId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

#[derive(Debug)]
pub struct ParseChainIdError;

impl Display for ParseChainIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid chain id")
    }
}

impl Error for ParseChainIdError {}

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(param: &str) -> Result<Self, Self::Err> {
        u64::from_str(param).map(ChainId).map_err(|_| ParseChainIdError)
    }
}

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

impl From<u64> for ChainId {
    fn from(chain_id: u64) -> Self {
        ChainId(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_decimal_string() {
        let chain_id: ChainId = "11155111".parse().unwrap();
        assert_eq!(chain_id.u64(), 11155111);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!("sepolia".parse::<ChainId>().is_err());
    }

    #[test]
    fn deserializes_from_yaml_number() {
        let chain_id: ChainId = serde_yaml::from_str("31337").unwrap();
        assert_eq!(chain_id, ChainId::new(31337));
    }
}
