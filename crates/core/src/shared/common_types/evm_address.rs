use std::{fmt::Display, str::FromStr};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Hash, Deserialize)]
pub struct EvmAddress(Address);

impl EvmAddress {
    /// Returns the hexadecimal string representation of the address.
    pub fn hex(&self) -> String {
        format!("{:?}", self.0)
    }

    pub fn new(address: Address) -> Self {
        EvmAddress(address)
    }

    /// Consumes this EvmAddress and returns the inner Alloy Address.
    pub fn into_address(self) -> Address {
        self.0
    }

    pub fn zero() -> Self {
        Self(Address::ZERO)
    }
}

impl Display for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Address> for EvmAddress {
    fn from(address: Address) -> Self {
        EvmAddress(address)
    }
}

impl From<EvmAddress> for Address {
    fn from(address: EvmAddress) -> Self {
        address.0
    }
}

impl FromStr for EvmAddress {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_str(s).map(EvmAddress)
    }
}
