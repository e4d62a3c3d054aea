//! The state of one playthrough: the hero plus story progress.

use log::warn;
use vorath_data::{HeroClass, SaveDef, validate_save};

use crate::combatant::{Attackable, CharacterRecord, Combatant};
use crate::error::GameError;
use crate::item::Item;
use crate::progression::Progress;

#[derive(Debug, Clone)]
pub struct GameSession {
    pub player: Combatant,
    pub progress: Progress,
}

/// A session rebuilt from a save, with notes about items that were dropped.
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub session: GameSession,
    pub skipped_items: Vec<String>,
}

impl GameSession {
    /// A brand new game for a hero of `class`.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] for a blank name or zero capacity
    pub fn new(class: HeroClass, name: &str, capacity: usize, first_level_xp: u32) -> Result<GameSession, GameError> {
        Ok(GameSession {
            player: Combatant::new_hero(class, name.trim(), capacity)?,
            progress: Progress::new(first_level_xp),
        })
    }

    /// The save-file form of this session.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the player is not a hero
    pub fn to_save_def(&self) -> Result<SaveDef, GameError> {
        let record = self
            .player
            .to_record()
            .ok_or_else(|| GameError::InvalidArgument("only heroes can be saved".to_string()))?;
        Ok(SaveDef {
            class: record.class,
            name: record.name,
            level: record.level,
            current_hp: record.current_hp,
            max_hp: record.max_hp,
            attack: record.attack,
            defense: record.defense,
            xp: self.progress.xp,
            xp_next: self.progress.xp_to_next,
            chapter: self.progress.chapter,
            explorations: self.progress.explorations,
            boss_defeated: self.progress.boss_defeated,
            items: self.player.inventory().list_sorted().iter().map(Item::to_def).collect(),
        })
    }

    /// Rebuild a session from a parsed save.
    ///
    /// Current HP above the maximum is clamped. Items that cannot be restored
    /// (for instance because the inventory is smaller than the saved one) are
    /// skipped and listed in the result.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the record fails validation
    pub fn from_save_def(def: &SaveDef, capacity: usize) -> Result<RestoredSession, GameError> {
        let problems = validate_save(def);
        if !problems.is_empty() {
            let joined = problems.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            return Err(GameError::InvalidArgument(format!("unplayable save: {joined}")));
        }

        let record = CharacterRecord {
            class: def.class,
            name: def.name.trim().to_string(),
            level: def.level,
            current_hp: def.current_hp,
            max_hp: def.max_hp,
            attack: def.attack,
            defense: def.defense,
        };
        let mut player = Combatant::from_record(&record, capacity)?;

        let mut skipped_items = Vec::new();
        for item_def in &def.items {
            let restored = Item::from_def(item_def).and_then(|item| player.inventory_mut().add(&item));
            if let Err(e) = restored {
                warn!("skipping saved item '{}': {e}", item_def.name);
                skipped_items.push(format!("{} ({e})", item_def.name));
            }
        }

        let progress = Progress {
            xp: def.xp,
            xp_to_next: def.xp_next,
            chapter: def.chapter,
            explorations: def.explorations,
            boss_defeated: def.boss_defeated,
        };
        Ok(RestoredSession {
            session: GameSession { player, progress },
            skipped_items,
        })
    }

    /// True once the hero has died or the final boss has fallen.
    pub fn is_over(&self) -> bool {
        !self.player.is_alive() || self.progress.boss_defeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::LivingEntity;
    use crate::item::catalog;

    #[test]
    fn save_def_carries_everything() {
        let mut session = GameSession::new(HeroClass::Archer, " Rook ", 20, 100).unwrap();
        session.player.damage(10);
        session.progress.chapter = 3;
        let def = session.to_save_def().unwrap();
        assert_eq!(def.name, "Rook");
        assert_eq!(def.current_hp, 90);
        assert_eq!(def.chapter, 3);
        assert_eq!(def.items.len(), 2);
        assert_eq!(def.items[0].name, "Health Potion");

        let restored = GameSession::from_save_def(&def, 20).unwrap();
        assert!(restored.skipped_items.is_empty());
        assert_eq!(restored.session.to_save_def().unwrap(), def);
    }

    #[test]
    fn hp_is_clamped_on_restore() {
        let mut def = SaveDef::with_class(HeroClass::Warrior);
        def.name = "Aria".into();
        def.max_hp = 100;
        def.current_hp = 250;
        let restored = GameSession::from_save_def(&def, 20).unwrap();
        assert_eq!(restored.session.player.hp(), 100);
    }

    #[test]
    fn items_beyond_capacity_are_skipped() {
        let mut session = GameSession::new(HeroClass::Mage, "Lia", 20, 100).unwrap();
        session.player.inventory_mut().add(&catalog::bomb(1)).unwrap();
        let def = session.to_save_def().unwrap();
        let restored = GameSession::from_save_def(&def, 2).unwrap();
        assert_eq!(restored.session.player.inventory().len(), 2);
        assert_eq!(restored.skipped_items.len(), 1);
        assert!(restored.skipped_items[0].starts_with("Strength Potion"));
    }

    #[test]
    fn invalid_records_are_refused() {
        let def = SaveDef::with_class(HeroClass::Mage);
        let err = GameSession::from_save_def(&def, 20).unwrap_err();
        assert!(err.to_string().contains("unplayable save"));
    }

    #[test]
    fn over_when_dead_or_victorious() {
        let mut session = GameSession::new(HeroClass::Warrior, "Aria", 20, 100).unwrap();
        assert!(!session.is_over());
        session.progress.boss_defeated = true;
        assert!(session.is_over());
        session.progress.boss_defeated = false;
        session.player.damage(1000);
        assert!(session.is_over());
    }
}
