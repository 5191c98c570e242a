//! World state
//!
//! Contains the game session and its message log.

mod message_log;
mod session;

pub use message_log::{Message, MessageLog};
pub use session::{Session, StairsOutcome};
