//! Randomized flavor lines.
//!
//! Flavor text is cosmetic, so it draws from the spinners' own randomness
//! rather than the game dice; seeding the dice never changes game outcomes
//! through these lines.

use std::collections::HashMap;

use gametools::spinners::{Spinner, Wedge};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpinnerType {
    QuietExploration,
    FleeFailed,
    EnemyAppears,
    Farewell,
}

pub trait SpinnerExt {
    fn from_strs(words: &[&'static str]) -> Self;
}
impl SpinnerExt for Spinner<&'static str> {
    fn from_strs(words: &[&'static str]) -> Self {
        let wedges = words.iter().map(|w| Wedge::new(*w)).collect::<Vec<_>>();
        Spinner::new(wedges)
    }
}

/// The game's flavor spinners.
pub struct FlavorText {
    spinners: HashMap<SpinnerType, Spinner<&'static str>>,
}

impl Default for FlavorText {
    fn default() -> Self {
        Self::new()
    }
}

impl FlavorText {
    pub fn new() -> Self {
        let mut spinners = HashMap::new();
        spinners.insert(
            SpinnerType::QuietExploration,
            Spinner::from_strs(&[
                "You explore the area but find nothing of interest.",
                "The path is quiet. Only the wind answers your footsteps.",
                "You search the ruins carefully. Dust, bones, nothing more.",
                "A crow watches you pass, then loses interest.",
            ]),
        );
        spinners.insert(
            SpinnerType::FleeFailed,
            Spinner::from_strs(&[
                "You couldn't get away!",
                "Your escape is cut off!",
                "You stumble and the enemy closes in!",
            ]),
        );
        spinners.insert(
            SpinnerType::EnemyAppears,
            Spinner::from_strs(&[
                "blocks your path!",
                "leaps out of the shadows!",
                "appears with a snarl!",
            ]),
        );
        spinners.insert(
            SpinnerType::Farewell,
            Spinner::from_strs(&[
                "Thanks for playing!",
                "The darkness will wait for your return.",
                "Rest well, adventurer.",
            ]),
        );
        Self { spinners }
    }

    /// Returns a random line from the selected spinner type, or a supplied default.
    pub fn spin(&self, spin_type: SpinnerType, default: &'static str) -> String {
        self.spinners
            .get(&spin_type)
            .and_then(Spinner::spin)
            .unwrap_or(default)
            .to_string()
    }
}
