pub mod seed;
pub mod seeds;
pub mod verify;

pub use seed::{SeedSummary, seed_all};
