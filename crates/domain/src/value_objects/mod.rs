pub mod price;
pub mod sqrt_price;
pub mod tick;

pub use price::{PRICE_DECIMALS, PRICE_SCALE, Price, WAD};
pub use sqrt_price::{MAX_SQRT_RATIO, MIN_SQRT_RATIO, SqrtPriceX96};
pub use tick::{MAX_TICK, MIN_TICK, Tick};
