pub mod cs;

pub use cs::ecc;
pub use cs::ecc::Result;
pub use cs::error::Error;
