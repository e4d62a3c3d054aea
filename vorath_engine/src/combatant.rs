//! Combatant Module
//!
//! Heroes and enemies share one concrete type. What differs between them
//! lives in [`ClassState`]; everything here is common: the attributes, the
//! base damage formula and taking hits.

use log::{debug, info};
use vorath_data::HeroClass;

use crate::class::{ClassState, FIREBALL_BONUS, FIREBALL_MANA_COST, FURY_DEFENSE_PENALTY, SpecialOutcome, Strike, VOLLEY_ARROWS};
use crate::dice::Roller;
use crate::error::GameError;
use crate::health::{HealthState, LifeState, LivingEntity};
use crate::inventory::Inventory;

pub const DEFAULT_INVENTORY_CAPACITY: usize = 20;

/// Anything that can strike and be struck.
pub trait Attackable {
    /// Damage this combatant deals for a given die roll, class modifiers included.
    ///
    /// # Errors
    /// Propagates roller failures.
    fn compute_damage(&mut self, roll: u32, dice: &mut dyn Roller) -> Result<Strike, GameError>;
    /// Take a raw hit; defense is subtracted first. Returns the HP actually lost.
    fn receive_damage(&mut self, raw: u32) -> u32;
    fn is_alive(&self) -> bool;
    fn name(&self) -> &str;
}

/// Starting attributes for [`Combatant::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub level: u32,
}

impl BaseStats {
    /// Level 1 attributes of each hero class.
    pub fn for_hero(class: HeroClass) -> BaseStats {
        let (max_hp, attack, defense) = match class {
            HeroClass::Warrior => (120, 15, 10),
            HeroClass::Mage => (80, 10, 5),
            HeroClass::Archer => (100, 12, 7),
        };
        BaseStats {
            max_hp,
            attack,
            defense,
            level: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combatant {
    name: String,
    health: HealthState,
    attack: u32,
    defense: u32,
    level: u32,
    inventory: Inventory,
    class: ClassState,
}

impl Combatant {
    /// Create a combatant with a default-sized inventory.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the name is blank, max HP is zero or level is zero
    pub fn new(name: impl Into<String>, stats: BaseStats, class: ClassState) -> Result<Combatant, GameError> {
        Combatant::with_capacity(name, stats, class, DEFAULT_INVENTORY_CAPACITY)
    }

    /// Create a combatant whose inventory holds `capacity` stacks.
    ///
    /// # Errors
    /// As [`Combatant::new`], plus a zero `capacity`.
    pub fn with_capacity(
        name: impl Into<String>,
        stats: BaseStats,
        class: ClassState,
        capacity: usize,
    ) -> Result<Combatant, GameError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument("name cannot be empty".to_string()));
        }
        if stats.max_hp == 0 {
            return Err(GameError::InvalidArgument(format!("{name}: max HP must be positive")));
        }
        if stats.level == 0 {
            return Err(GameError::InvalidArgument(format!("{name}: level must be at least 1")));
        }
        Ok(Combatant {
            name,
            health: HealthState::new_at_max(stats.max_hp),
            attack: stats.attack,
            defense: stats.defense,
            level: stats.level,
            inventory: Inventory::new(capacity)?,
            class,
        })
    }

    /// A level 1 hero of `class` carrying the starter kit.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] for a blank name or zero capacity
    pub fn new_hero(class: HeroClass, name: impl Into<String>, capacity: usize) -> Result<Combatant, GameError> {
        let mut hero = Combatant::with_capacity(name, BaseStats::for_hero(class), ClassState::for_hero(class, 1), capacity)?;
        for item in crate::item::catalog::starter_kit() {
            hero.inventory.add(&item)?;
        }
        info!("new {class} '{}' created", hero.name);
        Ok(hero)
    }

    /// Rebuild a hero from a stored record. The inventory starts empty.
    ///
    /// # Errors
    /// As [`Combatant::with_capacity`].
    pub fn from_record(record: &CharacterRecord, capacity: usize) -> Result<Combatant, GameError> {
        let stats = BaseStats {
            max_hp: record.max_hp,
            attack: record.attack,
            defense: record.defense,
            level: record.level,
        };
        let mut hero = Combatant::with_capacity(
            record.name.clone(),
            stats,
            ClassState::for_hero(record.class, record.level),
            capacity,
        )?;
        hero.set_hp(record.current_hp);
        Ok(hero)
    }

    /// The stored form of a hero; `None` for enemies.
    pub fn to_record(&self) -> Option<CharacterRecord> {
        Some(CharacterRecord {
            class: self.class.hero_class()?,
            name: self.name.clone(),
            level: self.level,
            current_hp: self.health.current_hp(),
            max_hp: self.health.max_hp(),
            attack: self.attack,
            defense: self.defense,
        })
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn hp(&self) -> u32 {
        self.health.current_hp()
    }

    pub fn max_hp(&self) -> u32 {
        self.health.max_hp()
    }

    pub fn class(&self) -> &ClassState {
        &self.class
    }

    pub fn class_mut(&mut self) -> &mut ClassState {
        &mut self.class
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// XP granted for defeating this combatant; zero for heroes.
    pub fn xp_reward(&self) -> u32 {
        match &self.class {
            ClassState::Enemy { xp_reward, .. } => *xp_reward,
            _ => 0,
        }
    }

    pub fn set_attack(&mut self, attack: u32) {
        self.attack = attack;
    }

    pub fn set_defense(&mut self, defense: u32) {
        self.defense = defense;
    }

    /// Levels below 1 are raised to 1.
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    /// Set current HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.health.set_current(hp);
    }

    /// # Errors
    /// - [`GameError::InvalidArgument`] if `max_hp` is zero
    pub fn set_max_hp(&mut self, max_hp: u32) -> Result<(), GameError> {
        if max_hp == 0 {
            return Err(GameError::InvalidArgument("max HP must be positive".to_string()));
        }
        self.health.set_max(max_hp);
        Ok(())
    }

    pub fn restore_hp(&mut self) {
        self.health.restore();
    }

    /// Raise max HP by `gain`; current HP is left as is.
    pub fn raise_max_hp(&mut self, gain: u32) {
        self.health.set_max(self.health.max_hp().saturating_add(gain));
    }

    /// The unmodified damage formula every class builds on.
    pub fn base_damage(&self, roll: u32) -> u32 {
        self.attack.saturating_add(roll)
    }

    /// Trigger the class special ability against `target`.
    ///
    /// # Errors
    /// Propagates roller failures; nothing is spent when a roll fails.
    pub fn use_special(&mut self, target: &mut dyn Attackable, dice: &mut dyn Roller) -> Result<SpecialOutcome, GameError> {
        let attack = self.attack;
        let outcome = match &mut self.class {
            ClassState::Warrior { fury, .. } => {
                if *fury {
                    SpecialOutcome::AlreadyFurious
                } else {
                    *fury = true;
                    self.defense = self.defense.saturating_sub(FURY_DEFENSE_PENALTY);
                    SpecialOutcome::FuryEntered { defense: self.defense }
                }
            },
            ClassState::Mage { mana, magic_power, .. } => {
                if *mana >= FIREBALL_MANA_COST {
                    let roll = dice.roll_d6()?;
                    *mana -= FIREBALL_MANA_COST;
                    let damage = magic_power.saturating_add(FIREBALL_BONUS).saturating_add(roll);
                    let taken = target.receive_damage(damage);
                    SpecialOutcome::Fireball { roll, damage, taken }
                } else {
                    SpecialOutcome::InsufficientMana {
                        mana: *mana,
                        needed: FIREBALL_MANA_COST,
                    }
                }
            },
            ClassState::Archer { arrows, .. } => {
                if *arrows >= VOLLEY_ARROWS {
                    let rolls = [dice.roll_d6()?, dice.roll_d6()?, dice.roll_d6()?];
                    *arrows -= VOLLEY_ARROWS;
                    let damage = rolls
                        .iter()
                        .fold(0u32, |sum, roll| sum.saturating_add(attack.saturating_add(*roll)));
                    let taken = target.receive_damage(damage);
                    SpecialOutcome::ArrowVolley { rolls, damage, taken }
                } else {
                    SpecialOutcome::InsufficientArrows {
                        arrows: *arrows,
                        needed: VOLLEY_ARROWS,
                    }
                }
            },
            ClassState::Enemy { .. } => SpecialOutcome::Taunt { name: self.name.clone() },
        };
        info!("{} special: {outcome:?}", self.name);
        Ok(outcome)
    }

    /// Leave fury, restoring the defense it cost. Returns true if fury was active.
    pub fn calm_down(&mut self) -> bool {
        if self.class.clear_fury() {
            self.defense = self.defense.saturating_add(FURY_DEFENSE_PENALTY);
            debug!("{} calms down", self.name);
            true
        } else {
            false
        }
    }

    /// One-line summary: name, level, HP, attack, defense and class resources.
    pub fn status_line(&self) -> String {
        format!(
            "{} (Level {}) - HP: {}/{} | ATK: {} | DEF: {}{}",
            self.name,
            self.level,
            self.hp(),
            self.max_hp(),
            self.attack,
            self.defense,
            self.class.status_suffix()
        )
    }
}

impl Attackable for Combatant {
    fn compute_damage(&mut self, roll: u32, dice: &mut dyn Roller) -> Result<Strike, GameError> {
        let base = self.base_damage(roll);
        self.class.modify_damage(base, dice)
    }

    fn receive_damage(&mut self, raw: u32) -> u32 {
        let taken = raw.saturating_sub(self.defense);
        let before = self.health.current_hp();
        self.health.damage(taken);
        debug!("{} takes {taken} (raw {raw}), hp {before} -> {}", self.name, self.health.current_hp());
        before - self.health.current_hp()
    }

    fn is_alive(&self) -> bool {
        self.health.life_state() == LifeState::Alive
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl LivingEntity for Combatant {
    fn max_hp(&self) -> u32 {
        self.health.max_hp()
    }

    fn current_hp(&self) -> u32 {
        self.health.current_hp()
    }

    fn damage(&mut self, amount: u32) {
        self.health.damage(amount);
    }

    /// Healing zero is a no-op.
    fn heal(&mut self, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        self.health.heal(amount)
    }

    fn life_state(&self) -> LifeState {
        self.health.life_state()
    }
}

/// The persistent attributes of a hero, independent of any live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    pub class: HeroClass,
    pub name: String,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Flourish;
    use crate::dice::LoadedDice;
    use crate::item::catalog;

    fn dummy(defense: u32) -> Combatant {
        Combatant::new(
            "Dummy",
            BaseStats {
                max_hp: 100,
                attack: 5,
                defense,
                level: 1,
            },
            ClassState::enemy(1, "Common"),
        )
        .unwrap()
    }

    #[test]
    fn construction_is_validated() {
        let stats = BaseStats::for_hero(HeroClass::Warrior);
        assert!(Combatant::new(" ", stats, ClassState::enemy(1, "x")).is_err());
        let zero_hp = BaseStats { max_hp: 0, ..stats };
        assert!(Combatant::new("A", zero_hp, ClassState::enemy(1, "x")).is_err());
        assert!(Combatant::with_capacity("A", stats, ClassState::enemy(1, "x"), 0).is_err());
    }

    #[test]
    fn new_hero_presets_and_kit() {
        let mage = Combatant::new_hero(HeroClass::Mage, "Lia", 20).unwrap();
        assert_eq!((mage.max_hp(), mage.attack(), mage.defense(), mage.level()), (80, 10, 5, 1));
        assert_eq!(mage.inventory().find_by_name("Health Potion").unwrap().quantity, 3);
        assert_eq!(mage.inventory().find_by_name("Strength Potion").unwrap().quantity, 1);
        assert_eq!(mage.status_line(), "Lia (Level 1) - HP: 80/80 | ATK: 10 | DEF: 5 | Mana: 60/60");
    }

    #[test]
    fn receive_damage_subtracts_defense() {
        let mut target = dummy(3);
        assert_eq!(target.receive_damage(19), 16);
        assert_eq!(target.hp(), 84);
        assert_eq!(target.receive_damage(2), 0);
        assert_eq!(target.hp(), 84);
        assert_eq!(target.receive_damage(500), 84);
        assert_eq!(target.hp(), 0);
        assert!(!target.is_alive());
    }

    #[test]
    fn heal_caps_and_zero_is_noop() {
        let mut hero = Combatant::new_hero(HeroClass::Archer, "Rook", 20).unwrap();
        hero.damage(30);
        assert_eq!(hero.heal(0), 0);
        assert_eq!(hero.heal(50), 30);
        assert_eq!(hero.hp(), 100);
    }

    #[test]
    fn setters_clamp() {
        let mut hero = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        hero.set_level(0);
        assert_eq!(hero.level(), 1);
        assert!(hero.set_max_hp(0).is_err());
        hero.set_max_hp(50).unwrap();
        assert_eq!(hero.hp(), 50);
        hero.set_hp(500);
        assert_eq!(hero.hp(), 50);
    }

    #[test]
    fn warrior_fury_cycle() {
        let mut warrior = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        let mut target = dummy(0);
        let mut dice = LoadedDice::default();
        let outcome = warrior.use_special(&mut target, &mut dice).unwrap();
        assert_eq!(outcome, SpecialOutcome::FuryEntered { defense: 7 });
        assert_eq!(warrior.use_special(&mut target, &mut dice).unwrap(), SpecialOutcome::AlreadyFurious);
        assert_eq!(warrior.defense(), 7);

        dice.push([100]);
        let strike = warrior.compute_damage(4, &mut dice).unwrap();
        assert_eq!(strike.amount, 28);
        assert_eq!(strike.flourishes, vec![Flourish::Fury]);

        assert!(warrior.calm_down());
        assert!(!warrior.calm_down());
        assert_eq!(warrior.defense(), 10);
    }

    #[test]
    fn fury_penalty_saturates() {
        let mut warrior = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        warrior.set_defense(1);
        warrior.use_special(&mut dummy(0), &mut LoadedDice::default()).unwrap();
        assert_eq!(warrior.defense(), 0);
    }

    #[test]
    fn fireball_costs_thirty_mana() {
        let mut mage = Combatant::new_hero(HeroClass::Mage, "Lia", 20).unwrap();
        let mut target = dummy(4);
        let outcome = mage.use_special(&mut target, &mut LoadedDice::new([6])).unwrap();
        assert_eq!(outcome, SpecialOutcome::Fireball {
            roll: 6,
            damage: 36,
            taken: 32
        });
        assert_eq!(target.hp(), 68);
        assert!(matches!(mage.class(), ClassState::Mage { mana: 30, .. }));
    }

    #[test]
    fn mage_with_five_mana() {
        let mut mage = Combatant::new_hero(HeroClass::Mage, "Lia", 20).unwrap();
        if let ClassState::Mage { mana, .. } = mage.class_mut() {
            *mana = 5;
        }
        let mut target = dummy(0);
        let outcome = mage.use_special(&mut target, &mut LoadedDice::default()).unwrap();
        assert_eq!(outcome, SpecialOutcome::InsufficientMana { mana: 5, needed: 30 });
        assert!(!outcome.succeeded());
        assert_eq!(target.hp(), 100);

        let strike = mage.compute_damage(3, &mut LoadedDice::default()).unwrap();
        assert_eq!(strike.amount, 13);
        assert!(matches!(mage.class(), ClassState::Mage { mana: 5, .. }));
    }

    #[test]
    fn arrow_volley() {
        let mut archer = Combatant::new_hero(HeroClass::Archer, "Rook", 20).unwrap();
        let mut target = dummy(10);
        let outcome = archer.use_special(&mut target, &mut LoadedDice::new([1, 2, 3])).unwrap();
        assert_eq!(outcome, SpecialOutcome::ArrowVolley {
            rolls: [1, 2, 3],
            damage: 42,
            taken: 32
        });
        assert!(matches!(archer.class(), ClassState::Archer { arrows: 27, .. }));

        if let ClassState::Archer { arrows, .. } = archer.class_mut() {
            *arrows = 2;
        }
        let outcome = archer.use_special(&mut target, &mut LoadedDice::default()).unwrap();
        assert_eq!(outcome, SpecialOutcome::InsufficientArrows { arrows: 2, needed: 3 });
    }

    #[test]
    fn enemy_special_is_flavor_only() {
        let mut enemy = dummy(0);
        let mut hero = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        let outcome = enemy.use_special(&mut hero, &mut LoadedDice::default()).unwrap();
        assert_eq!(outcome.to_string(), "Dummy uses a special attack!");
        assert_eq!(hero.hp(), 120);
    }

    #[test]
    fn clone_is_deep() {
        let original = Combatant::new_hero(HeroClass::Warrior, "Aria", 20).unwrap();
        let mut copy = original.clone();
        copy.inventory_mut().add(&catalog::bomb(1)).unwrap();
        copy.inventory_mut().remove("Health Potion", 3).unwrap();
        assert_eq!(original.inventory().len(), 2);
        assert_eq!(original.inventory().find_by_name("Health Potion").unwrap().quantity, 3);
    }

    #[test]
    fn record_round_trip() {
        let mut hero = Combatant::new_hero(HeroClass::Archer, "Rook", 20).unwrap();
        hero.damage(15);
        hero.set_attack(14);
        let record = hero.to_record().unwrap();
        let rebuilt = Combatant::from_record(&record, 20).unwrap();
        assert_eq!(rebuilt.to_record().unwrap(), record);
        assert!(rebuilt.inventory().is_empty());
        assert!(dummy(0).to_record().is_none());
    }
}
