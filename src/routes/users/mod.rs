mod edit;
mod me;
pub mod queries;

pub use edit::*;
pub use me::*;
