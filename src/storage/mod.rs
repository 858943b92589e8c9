//! Threshold storage module.
//!
//! Handles saving and loading the threshold pair to/from disk.

pub mod settings;

// Re-export commonly used items
pub use settings::*;
