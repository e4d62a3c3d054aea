//! Enemy construction: the random encounter table, the final boss and the
//! loot they carry.

use log::info;

use crate::class::ClassState;
use crate::combatant::{BaseStats, Combatant};
use crate::dice::Roller;
use crate::error::GameError;
use crate::item::{Item, catalog};

pub const BOSS_NAME: &str = "Vorath, the Eternal";

/// Build an enemy and stock it with random loot.
///
/// # Errors
/// Propagates construction and roller failures.
pub fn enemy(name: &str, stats: BaseStats, kind: &str, dice: &mut dyn Roller) -> Result<Combatant, GameError> {
    let mut foe = Combatant::new(name, stats, ClassState::enemy(stats.level, kind))?;
    for item in roll_loot(dice)? {
        foe.inventory_mut().add(&item)?;
    }
    Ok(foe)
}

/// One to three random drops from the common loot table.
///
/// # Errors
/// Propagates roller failures.
pub fn roll_loot(dice: &mut dyn Roller) -> Result<Vec<Item>, GameError> {
    let count = dice.roll(3)?;
    let mut loot = Vec::new();
    for _ in 0..count {
        let item = match dice.roll(4)? {
            1 => catalog::health_potion(1),
            2 => catalog::strength_potion(1),
            3 => catalog::defense_potion(1),
            _ => catalog::bomb(1),
        };
        loot.push(item);
    }
    Ok(loot)
}

/// A random enemy scaled around `player_level`.
///
/// The enemy level is `player_level + d3 - 2`, never below 1.
///
/// # Errors
/// Propagates roller failures.
pub fn random_enemy(player_level: u32, dice: &mut dyn Roller) -> Result<Combatant, GameError> {
    let level = player_level.saturating_add(dice.roll(3)?).saturating_sub(2).max(1);
    let (name, stats, kind) = match dice.roll(5)? {
        1 => ("Goblin", scaled(level, (40, 10), (6, 2), (2, 1)), "Common"),
        2 => ("Orc", scaled(level, (60, 15), (8, 3), (4, 1)), "Strong"),
        3 => ("Skeleton", scaled(level, (35, 8), (7, 2), (3, 1)), "Undead"),
        4 => ("Wild Wolf", scaled(level, (45, 12), (9, 2), (2, 1)), "Beast"),
        _ => ("Young Dragon", scaled(level, (80, 20), (10, 4), (6, 2)), "Boss"),
    };
    let foe = enemy(name, stats, kind, dice)?;
    info!("spawned {name} (level {level}) for player level {player_level}");
    Ok(foe)
}

/// The final boss, scaled to the player and carrying its fixed treasure on
/// top of random loot.
///
/// # Errors
/// Propagates roller failures.
pub fn final_boss(player_level: u32, dice: &mut dyn Roller) -> Result<Combatant, GameError> {
    let stats = BaseStats {
        max_hp: player_level.saturating_mul(20).saturating_add(200),
        attack: player_level.saturating_mul(2).saturating_add(20),
        defense: player_level.saturating_add(15),
        level: player_level.saturating_add(2),
    };
    let mut boss = enemy(BOSS_NAME, stats, "Final Boss", dice)?;
    boss.inventory_mut().add(&catalog::legendary_elixir(2))?;
    boss.inventory_mut().add(&catalog::essence_of_darkness(1))?;
    info!("final boss ready at level {}", stats.level);
    Ok(boss)
}

/// `base + per_level * level` for hp, attack and defense.
fn scaled(level: u32, hp: (u32, u32), attack: (u32, u32), defense: (u32, u32)) -> BaseStats {
    let at = |(base, per): (u32, u32)| per.saturating_mul(level).saturating_add(base);
    BaseStats {
        max_hp: at(hp),
        attack: at(attack),
        defense: at(defense),
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Attackable;
    use crate::dice::LoadedDice;

    #[test]
    fn loot_table() {
        let loot = roll_loot(&mut LoadedDice::new([3, 1, 4, 4])).unwrap();
        let names: Vec<&str> = loot.iter().map(Item::name).collect();
        assert_eq!(names, ["Health Potion", "Bomb", "Bomb"]);
    }

    #[test]
    fn goblin_at_player_level_one() {
        // level roll 1 -> max(1, 1 + 1 - 2) = 1; type 1; one loot item
        let goblin = random_enemy(1, &mut LoadedDice::new([1, 1, 1, 2])).unwrap();
        assert_eq!(goblin.name(), "Goblin");
        assert_eq!((goblin.max_hp(), goblin.attack(), goblin.defense(), goblin.level()), (50, 8, 3, 1));
        assert_eq!(goblin.xp_reward(), 50);
        assert_eq!(goblin.inventory().find_by_index(0).unwrap().name(), "Strength Potion");
    }

    #[test]
    fn dragon_scales_with_level() {
        // level roll 3 -> 4 + 3 - 2 = 5
        let dragon = random_enemy(4, &mut LoadedDice::new([3, 5, 1, 3])).unwrap();
        assert_eq!(dragon.level(), 5);
        assert_eq!((dragon.max_hp(), dragon.attack(), dragon.defense()), (180, 30, 16));
        assert_eq!(dragon.class().label(), "Boss");
        assert_eq!(dragon.xp_reward(), 250);
    }

    #[test]
    fn boss_carries_treasure() {
        let boss = final_boss(3, &mut LoadedDice::new([1, 4])).unwrap();
        assert_eq!(boss.name(), BOSS_NAME);
        assert_eq!((boss.max_hp(), boss.attack(), boss.defense(), boss.level()), (260, 26, 18, 5));
        let inv = boss.inventory();
        assert_eq!(inv.find_by_name("Legendary Elixir").unwrap().quantity, 2);
        assert_eq!(inv.find_by_name("Essence of Darkness").unwrap().quantity, 1);
        assert_eq!(inv.find_by_name("Bomb").unwrap().quantity, 1);
    }

    #[test]
    fn huge_levels_saturate() {
        let boss = final_boss(300_000_000, &mut LoadedDice::new([1, 4])).unwrap();
        assert_eq!(boss.max_hp(), u32::MAX);
        assert_eq!(boss.level(), 300_000_002);

        let dragon = random_enemy(u32::MAX, &mut LoadedDice::new([3, 5, 1, 3])).unwrap();
        assert_eq!(dragon.level(), u32::MAX - 2);
        assert_eq!((dragon.max_hp(), dragon.attack(), dragon.defense()), (u32::MAX, u32::MAX, u32::MAX));
    }
}
