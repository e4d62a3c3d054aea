//! Using consumables from the hero's inventory.

use std::cmp;
use std::fmt::Display;

use log::info;

use crate::combatant::{Attackable, Combatant};
use crate::dice::Roller;
use crate::error::GameError;
use crate::health::LivingEntity;
use crate::item::EffectKind;

/// What happened when an item was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUse {
    Healed { item: String, restored: u32 },
    AttackRaised { item: String, by: u32, now: u32 },
    DefenseRaised { item: String, by: u32, now: u32 },
    Damaged { item: String, target: String, damage: u32, taken: u32 },
    Special { item: String },
    /// Nothing happened and nothing was consumed.
    Refused(String),
}

impl ItemUse {
    /// True when a unit of the item was used up.
    pub fn consumed(&self) -> bool {
        !matches!(self, ItemUse::Refused(_))
    }
}

impl Display for ItemUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemUse::Healed { item, restored } => write!(f, "{item} used! You recovered {restored} HP."),
            ItemUse::AttackRaised { item, by, now } => {
                write!(f, "{item} used! Your attack rose by {by} (now {now}).")
            },
            ItemUse::DefenseRaised { item, by, now } => {
                write!(f, "{item} used! Your defense rose by {by} (now {now}).")
            },
            ItemUse::Damaged {
                item,
                target,
                damage,
                taken,
            } => write!(f, "You used {item} on {target} for {damage} damage ({taken} taken)."),
            ItemUse::Special { item } => write!(f, "{item} used! A special effect takes hold."),
            ItemUse::Refused(reason) => write!(f, "{reason}"),
        }
    }
}

/// Use one unit of the item at `index` (sorted inventory order).
///
/// Damage items need a `target` and are refused without one.
///
/// # Errors
/// Propagates roller failures; nothing is consumed when a roll fails.
pub fn use_item(
    user: &mut Combatant,
    index: usize,
    target: Option<&mut dyn Attackable>,
    dice: &mut dyn Roller,
) -> Result<ItemUse, GameError> {
    let Some(item) = user.inventory().find_by_index(index).cloned() else {
        return Ok(ItemUse::Refused("Invalid item!".to_string()));
    };
    let name = item.name().to_string();
    let value = item.effect_value();

    let outcome = match item.effect() {
        EffectKind::Heal => ItemUse::Healed {
            restored: user.heal(value),
            item: name,
        },
        EffectKind::AttackBuff => {
            user.set_attack(user.attack().saturating_add(value));
            ItemUse::AttackRaised {
                item: name,
                by: value,
                now: user.attack(),
            }
        },
        EffectKind::DefenseBuff => {
            user.set_defense(user.defense().saturating_add(value));
            ItemUse::DefenseRaised {
                item: name,
                by: value,
                now: user.defense(),
            }
        },
        EffectKind::Damage => match target {
            None => ItemUse::Refused(format!("{name} can only be used in combat!")),
            Some(target) => {
                let swing = i64::from(dice.roll_d6()?) - 3;
                let damage = cmp::max(1, i64::from(value) + swing);
                let damage = u32::try_from(damage).unwrap_or(u32::MAX);
                let taken = target.receive_damage(damage);
                ItemUse::Damaged {
                    item: name,
                    target: target.name().to_string(),
                    damage,
                    taken,
                }
            },
        },
        EffectKind::Other => ItemUse::Special { item: name },
    };

    if outcome.consumed() {
        user.inventory_mut().remove_stack(&item, 1)?;
        info!("{} used {}", user.name(), item.name());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassState;
    use crate::combatant::BaseStats;
    use crate::dice::LoadedDice;
    use crate::item::{Item, catalog};
    use vorath_data::HeroClass;

    fn hero_with(items: &[Item]) -> Combatant {
        let mut hero = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        hero.inventory_mut().clear();
        for item in items {
            hero.inventory_mut().add(item).unwrap();
        }
        hero
    }

    fn target() -> Combatant {
        Combatant::new(
            "Orc",
            BaseStats {
                max_hp: 80,
                attack: 9,
                defense: 5,
                level: 1,
            },
            ClassState::enemy(1, "Strong"),
        )
        .unwrap()
    }

    #[test]
    fn heal_reports_restored_hp() {
        let mut hero = hero_with(&[catalog::health_potion(2)]);
        hero.damage(20);
        let outcome = use_item(&mut hero, 0, None, &mut LoadedDice::default()).unwrap();
        assert_eq!(outcome, ItemUse::Healed {
            item: "Health Potion".into(),
            restored: 20
        });
        assert_eq!(hero.inventory().find_by_index(0).unwrap().quantity, 1);
    }

    #[test]
    fn buffs_are_permanent() {
        let mut hero = hero_with(&[catalog::strength_potion(1), catalog::defense_potion(1)]);
        // sorted: Defense Potion, Strength Potion
        use_item(&mut hero, 0, None, &mut LoadedDice::default()).unwrap();
        use_item(&mut hero, 0, None, &mut LoadedDice::default()).unwrap();
        assert_eq!((hero.attack(), hero.defense()), (20, 15));
        assert!(hero.inventory().is_empty());
    }

    #[test]
    fn bomb_needs_a_target() {
        let mut hero = hero_with(&[catalog::bomb(1)]);
        let outcome = use_item(&mut hero, 0, None, &mut LoadedDice::default()).unwrap();
        assert!(!outcome.consumed());
        assert_eq!(hero.inventory().len(), 1);

        let mut orc = target();
        let outcome = use_item(&mut hero, 0, Some(&mut orc), &mut LoadedDice::new([6])).unwrap();
        assert_eq!(outcome, ItemUse::Damaged {
            item: "Bomb".into(),
            target: "Orc".into(),
            damage: 28,
            taken: 23
        });
        assert_eq!(orc.hp(), 57);
        assert!(hero.inventory().is_empty());
    }

    #[test]
    fn weak_damage_item_deals_at_least_one() {
        let dud = Item::new("Dud", "fizzles", EffectKind::Damage, 0, 1).unwrap();
        let mut hero = hero_with(&[dud]);
        let mut orc = target();
        let outcome = use_item(&mut hero, 0, Some(&mut orc), &mut LoadedDice::new([1])).unwrap();
        assert!(matches!(outcome, ItemUse::Damaged { damage: 1, .. }));
    }

    #[test]
    fn other_effect_is_consumed() {
        let charm = Item::new("Charm", "glows", EffectKind::Other, 0, 1).unwrap();
        let mut hero = hero_with(&[charm]);
        let outcome = use_item(&mut hero, 0, None, &mut LoadedDice::default()).unwrap();
        assert_eq!(outcome, ItemUse::Special { item: "Charm".into() });
        assert!(hero.inventory().is_empty());
    }

    #[test]
    fn bad_index_is_refused() {
        let mut hero = hero_with(&[]);
        let outcome = use_item(&mut hero, 4, None, &mut LoadedDice::default()).unwrap();
        assert!(matches!(outcome, ItemUse::Refused(_)));
    }
}
