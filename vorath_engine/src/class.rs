//! Class specializations.
//!
//! Every combatant carries a [`ClassState`] holding the resources its class
//! spends. The class decides how a base hit is modified and what the special
//! ability does; the combatant itself only knows the base formula.

use std::fmt::Display;

use log::debug;
use vorath_data::HeroClass;

use crate::dice::Roller;
use crate::error::GameError;

pub const WARRIOR_CRIT_CHANCE: u32 = 20;
pub const FURY_DEFENSE_PENALTY: u32 = 3;

pub const MAGE_MAGIC_POWER: u32 = 20;
pub const SPELL_MANA_COST: u32 = 10;
pub const FIREBALL_MANA_COST: u32 = 30;
pub const FIREBALL_BONUS: u32 = 10;

pub const ARCHER_ARROWS: u32 = 30;
pub const ARCHER_PRECISION: u32 = 75;
pub const PRECISE_SHOT_BONUS: u32 = 10;
pub const VOLLEY_ARROWS: u32 = 3;

pub const XP_PER_ENEMY_LEVEL: u32 = 50;

/// Per-class resources and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassState {
    Warrior { crit_chance: u32, fury: bool },
    Mage { mana: u32, max_mana: u32, magic_power: u32 },
    Archer { arrows: u32, precision: u32 },
    Enemy { xp_reward: u32, kind: String },
}

impl ClassState {
    /// Fresh class resources for a hero of `class` at `level`.
    pub fn for_hero(class: HeroClass, level: u32) -> ClassState {
        match class {
            HeroClass::Warrior => ClassState::Warrior {
                crit_chance: WARRIOR_CRIT_CHANCE,
                fury: false,
            },
            HeroClass::Mage => {
                let max_mana = max_mana_at(level);
                ClassState::Mage {
                    mana: max_mana,
                    max_mana,
                    magic_power: MAGE_MAGIC_POWER,
                }
            },
            HeroClass::Archer => ClassState::Archer {
                arrows: ARCHER_ARROWS,
                precision: ARCHER_PRECISION,
            },
        }
    }

    /// Enemy class state; the XP reward scales with level.
    pub fn enemy(level: u32, kind: impl Into<String>) -> ClassState {
        ClassState::Enemy {
            xp_reward: level.saturating_mul(XP_PER_ENEMY_LEVEL),
            kind: kind.into(),
        }
    }

    /// The hero class this state belongs to, or `None` for enemies.
    pub fn hero_class(&self) -> Option<HeroClass> {
        match self {
            ClassState::Warrior { .. } => Some(HeroClass::Warrior),
            ClassState::Mage { .. } => Some(HeroClass::Mage),
            ClassState::Archer { .. } => Some(HeroClass::Archer),
            ClassState::Enemy { .. } => None,
        }
    }

    /// Class name for heroes, kind for enemies.
    pub fn label(&self) -> String {
        match self {
            ClassState::Enemy { kind, .. } => kind.clone(),
            hero => hero.hero_class().map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Apply the class damage modifier to an already computed base hit.
    ///
    /// Resources are only spent once every roll the modifier needs has succeeded.
    ///
    /// # Errors
    /// Propagates roller failures.
    pub fn modify_damage(&mut self, base: u32, dice: &mut dyn Roller) -> Result<Strike, GameError> {
        let mut strike = Strike::plain(base);
        match self {
            ClassState::Warrior { crit_chance, fury } => {
                if dice.chance(*crit_chance)? {
                    strike.amount = strike.amount.saturating_mul(2);
                    strike.flourishes.push(Flourish::Critical);
                }
                if *fury {
                    strike.amount = strike.amount.saturating_mul(3) / 2;
                    strike.flourishes.push(Flourish::Fury);
                }
            },
            ClassState::Mage {
                mana, magic_power, ..
            } => {
                if *mana >= SPELL_MANA_COST {
                    *mana -= SPELL_MANA_COST;
                    strike.amount = strike.amount.saturating_add(*magic_power);
                    strike.flourishes.push(Flourish::Spell { bonus: *magic_power });
                }
            },
            ClassState::Archer { arrows, precision } => {
                if *arrows == 0 {
                    strike.amount /= 2;
                    strike.flourishes.push(Flourish::OutOfArrows);
                } else {
                    let precise = dice.chance(*precision)?;
                    *arrows -= 1;
                    if precise {
                        strike.amount = strike.amount.saturating_add(PRECISE_SHOT_BONUS);
                        strike.flourishes.push(Flourish::PreciseShot);
                    }
                }
            },
            ClassState::Enemy { .. } => {},
        }
        debug!("{} strike: base {base} -> {}", self.label(), strike.amount);
        Ok(strike)
    }

    /// End fury. Returns true if the warrior was furious.
    pub(crate) fn clear_fury(&mut self) -> bool {
        match self {
            ClassState::Warrior { fury, .. } if *fury => {
                *fury = false;
                true
            },
            _ => false,
        }
    }

    /// Extra status text shown after the common stats.
    pub fn status_suffix(&self) -> String {
        match self {
            ClassState::Warrior { fury: true, .. } => " | FURY".to_string(),
            ClassState::Mage { mana, max_mana, .. } => format!(" | Mana: {mana}/{max_mana}"),
            ClassState::Archer { arrows, .. } => format!(" | Arrows: {arrows}"),
            _ => String::new(),
        }
    }
}

/// Maximum mana for a mage of `level`.
pub fn max_mana_at(level: u32) -> u32 {
    50u32.saturating_add(level.saturating_mul(10))
}

/// A computed hit, before the target's defense is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strike {
    pub amount: u32,
    pub flourishes: Vec<Flourish>,
}

impl Strike {
    pub fn plain(amount: u32) -> Strike {
        Strike {
            amount,
            flourishes: Vec::new(),
        }
    }
}

/// Class effects that changed a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flourish {
    Critical,
    Fury,
    Spell { bonus: u32 },
    PreciseShot,
    OutOfArrows,
}

impl Display for Flourish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flourish::Critical => write!(f, "CRITICAL HIT!"),
            Flourish::Fury => write!(f, "Fury fuels the blow!"),
            Flourish::Spell { bonus } => write!(f, "Spell empowered (+{bonus})"),
            Flourish::PreciseShot => write!(f, "Precise shot!"),
            Flourish::OutOfArrows => write!(f, "No arrows left! Half damage."),
        }
    }
}

/// Result of a special ability.
///
/// Abilities that could not be paid for are ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialOutcome {
    FuryEntered { defense: u32 },
    AlreadyFurious,
    Fireball { roll: u32, damage: u32, taken: u32 },
    InsufficientMana { mana: u32, needed: u32 },
    ArrowVolley { rolls: [u32; 3], damage: u32, taken: u32 },
    InsufficientArrows { arrows: u32, needed: u32 },
    Taunt { name: String },
}

impl SpecialOutcome {
    /// True when the ability actually did something.
    pub fn succeeded(&self) -> bool {
        !matches!(
            self,
            SpecialOutcome::AlreadyFurious
                | SpecialOutcome::InsufficientMana { .. }
                | SpecialOutcome::InsufficientArrows { .. }
        )
    }
}

impl Display for SpecialOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecialOutcome::FuryEntered { defense } => {
                write!(f, "You enter a FURY! Attack is amplified, defense drops to {defense}.")
            },
            SpecialOutcome::AlreadyFurious => write!(f, "You are already furious."),
            SpecialOutcome::Fireball { roll, damage, taken } => write!(
                f,
                "FIREBALL! (rolled {roll}) {damage} damage unleashed, {taken} got through."
            ),
            SpecialOutcome::InsufficientMana { mana, needed } => {
                write!(f, "Not enough mana! ({mana}/{needed})")
            },
            SpecialOutcome::ArrowVolley { rolls, damage, taken } => write!(
                f,
                "ARROW VOLLEY! (rolled {}, {}, {}) {damage} damage, {taken} got through.",
                rolls[0], rolls[1], rolls[2]
            ),
            SpecialOutcome::InsufficientArrows { arrows, needed } => {
                write!(f, "Not enough arrows! ({arrows}/{needed})")
            },
            SpecialOutcome::Taunt { name } => write!(f, "{name} uses a special attack!"),
        }
    }
}
