//! Shared save-file data model for the Vorath engine.

pub mod defs;
pub mod format;
pub mod validate;

pub use defs::*;
pub use format::{SaveError, parse_save, to_save_text};
pub use validate::{ValidationError, validate_save};
