pub mod attack;
pub mod calculators;
pub mod events;
pub mod items;
pub mod rng;
pub mod runner;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod tests;
