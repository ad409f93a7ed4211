pub mod types;
pub use types::ChainId;
