pub mod mgn;
pub mod pool;
pub mod token;

// Re-export for easier access
pub use mgn::MgnBalances;
pub use pool::{PoolPair, sum_shares};
pub use token::{PoolTokens, TokenInfo};
