#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const VORATH_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod bestiary;
pub mod class;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod data_paths;
pub mod dice;
pub mod error;
pub mod game;
pub mod health;
pub mod input;
pub mod inventory;
pub mod item;
pub mod item_use;
pub mod progression;
pub mod save_files;
pub mod session;
pub mod slug;
pub mod spinners;
pub mod story;
pub mod style;
pub mod view;

// Re-exports for convenience
pub use class::{ClassState, SpecialOutcome, Strike};
pub use combat::{CombatOutcome, Encounter, TurnContext, fight};
pub use combatant::{Attackable, BaseStats, Combatant};
pub use config::{GameConfig, load_runtime_config};
pub use dice::{Dice, LoadedDice, Roller};
pub use error::{GameError, InputClosed};
pub use game::{GameEnd, run_game};
pub use health::{HealthState, LifeState, LivingEntity};
pub use input::{ConsoleInput, Prompt, ScriptedInput};
pub use inventory::Inventory;
pub use item::{EffectKind, Item};
pub use session::GameSession;
pub use view::{View, ViewItem};
