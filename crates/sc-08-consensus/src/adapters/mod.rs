//! Adapters layer (Hexagonal Architecture)

mod chain;
mod connection;

pub use chain::*;
pub use connection::*;
