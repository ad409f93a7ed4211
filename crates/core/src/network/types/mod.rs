mod chain_id;
pub use chain_id::{ChainId, ParseChainIdError};
