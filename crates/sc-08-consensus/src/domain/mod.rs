//! Domain layer: fork entity, announcements, configuration and errors

pub mod announcement;
pub mod config;
pub mod error;
pub mod fork;
pub mod outcome;

pub use announcement::Announcement;
pub use config::ForkChoiceConfig;
pub use error::{ConnectionError, ConsensusError, ForkError, ProtocolError};
pub use fork::{Fork, ForkState};
pub use outcome::ChainUpdateOutcome;
