//! Dice Module
//!
//! Every random decision in the game goes through a [`Roller`]. The game uses
//! [`Dice`], a seedable generator; tests use [`LoadedDice`] to script exact
//! outcomes.

use std::collections::VecDeque;

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::GameError;

/// Source of die rolls.
pub trait Roller {
    /// Roll a die with `faces` sides, returning a value in `1..=faces`.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if `faces` is zero
    fn roll(&mut self, faces: u32) -> Result<u32, GameError>;

    /// Roll a six-sided die.
    ///
    /// # Errors
    /// See [`Roller::roll`].
    fn roll_d6(&mut self) -> Result<u32, GameError> {
        self.roll(6)
    }

    /// Roll a twenty-sided die.
    ///
    /// # Errors
    /// See [`Roller::roll`].
    fn roll_d20(&mut self) -> Result<u32, GameError> {
        self.roll(20)
    }

    /// Percentile check: true when a d100 lands at or under `percent`.
    ///
    /// # Errors
    /// See [`Roller::roll`].
    fn chance(&mut self, percent: u32) -> Result<bool, GameError> {
        Ok(self.roll(100)? <= percent)
    }
}

fn check_faces(faces: u32) -> Result<(), GameError> {
    if faces == 0 {
        return Err(GameError::InvalidArgument(
            "a die needs at least one face".to_string(),
        ));
    }
    Ok(())
}

/// Seedable random dice.
///
/// With a seed set, the sequence of rolls is reproducible.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: StdRng,
    seed: Option<u64>,
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice {
    /// Unseeded dice drawing entropy from the OS.
    pub fn new() -> Dice {
        Dice {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    /// Dice with a fixed seed.
    pub fn seeded(seed: u64) -> Dice {
        Dice {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Reseed; later rolls repeat the sequence for `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        debug!("[dice] reseeded with {seed}");
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
    }

    /// Drop any fixed seed and go back to OS entropy.
    pub fn reset_seed(&mut self) {
        debug!("[dice] seed cleared");
        self.rng = StdRng::from_os_rng();
        self.seed = None;
    }

    /// The active seed, if one was set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Roller for Dice {
    fn roll(&mut self, faces: u32) -> Result<u32, GameError> {
        check_faces(faces)?;
        let result = self.rng.random_range(1..=faces);
        debug!("[dice] d{faces} -> {result}");
        Ok(result)
    }
}

/// Dice that replay a fixed list of results.
///
/// Each scripted value is clamped into `1..=faces` of the die being rolled.
/// When the script runs out every roll fails with [`GameError::DiceExhausted`].
#[derive(Debug, Clone, Default)]
pub struct LoadedDice {
    script: VecDeque<u32>,
}

impl LoadedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> LoadedDice {
        LoadedDice {
            script: rolls.into_iter().collect(),
        }
    }

    /// Append more results to the end of the script.
    pub fn push(&mut self, rolls: impl IntoIterator<Item = u32>) {
        self.script.extend(rolls);
    }

    /// Number of scripted results not yet used.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Roller for LoadedDice {
    fn roll(&mut self, faces: u32) -> Result<u32, GameError> {
        check_faces(faces)?;
        let next = self.script.pop_front().ok_or(GameError::DiceExhausted)?;
        let result = next.clamp(1, faces);
        debug!("[dice] d{faces} -> {result} (loaded)");
        Ok(result)
    }
}
