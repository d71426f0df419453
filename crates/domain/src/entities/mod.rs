pub mod pool;
pub mod token;

// Re-export for easier access
pub use pool::{LiquidityDelta, Pool, PoolHandle, PoolKey, SwapQuote};
pub use token::Token;
