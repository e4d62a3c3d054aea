//! Domain errors raised by the game core.
//!
//! Only malformed input and invariant violations are errors. Things a player
//! can simply fail at (not enough mana, a failed escape, a missing item) are
//! reported as ordinary values by the operations that produce them.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Malformed input to a constructor or operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A new item stack would not fit in the inventory.
    #[error("inventory is full ({capacity} slots)")]
    CapacityExceeded { capacity: usize },
    /// A scripted roll sequence was used up.
    #[error("loaded dice ran out of rolls")]
    DiceExhausted,
}

/// Raised by a prompt when its input stream reaches end-of-file.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("input stream closed")]
pub struct InputClosed;
