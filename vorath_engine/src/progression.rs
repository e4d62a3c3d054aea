//! Experience, leveling and story position.

use log::info;

use crate::combatant::Combatant;

pub const FIRST_LEVEL_XP: u32 = 100;
pub const LEVEL_HP_GAIN: u32 = 20;
pub const LEVEL_ATTACK_GAIN: u32 = 3;
pub const LEVEL_DEFENSE_GAIN: u32 = 2;

/// Session progress that is saved alongside the hero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub xp: u32,
    pub xp_to_next: u32,
    pub chapter: u32,
    pub explorations: u32,
    pub boss_defeated: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Progress::new(FIRST_LEVEL_XP)
    }
}

impl Progress {
    /// Start of a new game with the given first level-up threshold.
    pub fn new(first_level_xp: u32) -> Progress {
        Progress {
            xp: 0,
            xp_to_next: first_level_xp.max(1),
            chapter: 1,
            explorations: 0,
            boss_defeated: false,
        }
    }
}

/// What changed on a level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

/// Add XP and level up as many times as it pays for.
pub fn award_xp(player: &mut Combatant, progress: &mut Progress, amount: u32) -> Vec<LevelUp> {
    progress.xp = progress.xp.saturating_add(amount);
    let mut gained = Vec::new();
    while progress.xp >= progress.xp_to_next {
        gained.push(level_up(player, progress));
    }
    gained
}

/// Spend one threshold's worth of XP on a level.
///
/// The next threshold grows by half (rounded down), and by at least one. The
/// hero gains max HP, heals fully and improves attack and defense.
pub fn level_up(player: &mut Combatant, progress: &mut Progress) -> LevelUp {
    progress.xp = progress.xp.saturating_sub(progress.xp_to_next);
    let next = progress.xp_to_next;
    progress.xp_to_next = (next.saturating_mul(3) / 2).max(next.saturating_add(1));

    player.set_level(player.level().saturating_add(1));
    player.raise_max_hp(LEVEL_HP_GAIN);
    player.restore_hp();
    player.set_attack(player.attack().saturating_add(LEVEL_ATTACK_GAIN));
    player.set_defense(player.defense().saturating_add(LEVEL_DEFENSE_GAIN));

    let result = LevelUp {
        level: player.level(),
        max_hp: player.max_hp(),
        attack: player.attack(),
        defense: player.defense(),
    };
    info!("level up: {result:?}, next at {} xp", progress.xp_to_next);
    result
}
