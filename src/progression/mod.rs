pub mod growth;
pub mod rewards;

pub use growth::GrowthDistributor;
pub use rewards::{RewardGenerator, Rewards};
