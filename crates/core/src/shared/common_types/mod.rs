mod evm_address;
pub use evm_address::EvmAddress;
