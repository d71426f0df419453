pub mod registry;

pub use registry::{PoolRegistry, SwapOutcome, SwapRequest};
