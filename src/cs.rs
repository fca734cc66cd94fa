pub mod ecc;
pub mod error;

// Re-export the coding modules
pub use ecc::*;
