// Monster Battle Schema - Shared content definitions
// This crate contains the catalog record shapes and their validated forms
// that are shared between the battle engine and anything that loads or
// authors content for it.

// Re-export the main types
pub use attack_data::*;
pub use error::*;
pub use item_data::*;
pub use species_data::*;
pub use stats::*;

pub mod attack_data;
pub mod error;
pub mod item_data;
pub mod species_data;
pub mod stats;
