//! Item types and related helpers.
//!
//! An `Item` is a stack of identical consumables. Two stacks are the same item
//! when their names and effect kinds match; description, effect value and
//! quantity play no part in identity.

use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
};

use vorath_data::ItemDef;

pub use vorath_data::EffectKind;

use crate::error::GameError;

#[derive(Debug, Clone)]
pub struct Item {
    name: String,
    description: String,
    effect: EffectKind,
    effect_value: u32,
    /// Number of units in this stack.
    pub quantity: u32,
}

impl Item {
    /// Build an item stack.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the name is blank
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        effect: EffectKind,
        effect_value: u32,
        quantity: u32,
    ) -> Result<Item, GameError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument("item name cannot be blank".to_string()));
        }
        Ok(Item {
            name,
            description: description.into(),
            effect,
            effect_value,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn effect_value(&self) -> u32 {
        self.effect_value
    }

    /// True if `name` refers to this item (trimmed, case-insensitive).
    pub fn answers_to(&self, name: &str) -> bool {
        self.folded_name() == fold_name(name)
    }

    /// The name as compared for lookups and stacking.
    pub fn folded_name(&self) -> String {
        fold_name(&self.name)
    }

    /// Convert to the save-file representation.
    pub fn to_def(&self) -> ItemDef {
        ItemDef {
            name: self.name.clone(),
            description: self.description.clone(),
            effect: self.effect,
            quantity: self.quantity,
            value: self.effect_value,
        }
    }

    /// Build from the save-file representation.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the stored name is blank
    pub fn from_def(def: &ItemDef) -> Result<Item, GameError> {
        Item::new(
            def.name.clone(),
            def.description.clone(),
            def.effect,
            def.value,
            def.quantity,
        )
    }
}

fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.effect == other.effect
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.effect.hash(state);
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then(self.effect.cmp(&other.effect))
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (x{}) - {} [{}: {}]",
            self.name, self.quantity, self.description, self.effect, self.effect_value
        )
    }
}

/// The fixed set of consumables that appear in the game.
pub mod catalog {
    use super::{EffectKind, Item};

    fn stock(name: &str, description: &str, effect: EffectKind, value: u32, quantity: u32) -> Item {
        Item {
            name: name.to_string(),
            description: description.to_string(),
            effect,
            effect_value: value,
            quantity,
        }
    }

    pub fn health_potion(quantity: u32) -> Item {
        stock("Health Potion", "Restores 30 HP", EffectKind::Heal, 30, quantity)
    }

    pub fn strength_potion(quantity: u32) -> Item {
        stock("Strength Potion", "Raises attack by 5", EffectKind::AttackBuff, 5, quantity)
    }

    pub fn defense_potion(quantity: u32) -> Item {
        stock("Defense Potion", "Raises defense by 5", EffectKind::DefenseBuff, 5, quantity)
    }

    pub fn bomb(quantity: u32) -> Item {
        stock("Bomb", "Explodes for heavy damage", EffectKind::Damage, 25, quantity)
    }

    pub fn rare_elixir(quantity: u32) -> Item {
        stock("Rare Elixir", "Restores 50 HP", EffectKind::Heal, 50, quantity)
    }

    pub fn legendary_elixir(quantity: u32) -> Item {
        stock("Legendary Elixir", "Restores 100 HP", EffectKind::Heal, 100, quantity)
    }

    pub fn essence_of_darkness(quantity: u32) -> Item {
        stock(
            "Essence of Darkness",
            "Dark power that raises attack by 10",
            EffectKind::AttackBuff,
            10,
            quantity,
        )
    }

    /// Starting kit for every new hero.
    pub fn starter_kit() -> Vec<Item> {
        vec![health_potion(3), strength_potion(1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_value_description_and_quantity() {
        let a = Item::new("Tonic", "one", EffectKind::Heal, 10, 1).unwrap();
        let b = Item::new("Tonic", "two", EffectKind::Heal, 99, 7).unwrap();
        let c = Item::new("Tonic", "one", EffectKind::AttackBuff, 10, 1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Item> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ordering_is_name_then_effect() {
        let mut items = vec![
            Item::new("Bomb", "", EffectKind::Other, 1, 1).unwrap(),
            Item::new("Arrow", "", EffectKind::Damage, 1, 1).unwrap(),
            Item::new("Bomb", "", EffectKind::Damage, 1, 1).unwrap(),
        ];
        items.sort();
        let order: Vec<(&str, EffectKind)> = items.iter().map(|i| (i.name(), i.effect())).collect();
        assert_eq!(
            order,
            vec![
                ("Arrow", EffectKind::Damage),
                ("Bomb", EffectKind::Damage),
                ("Bomb", EffectKind::Other)
            ]
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            Item::new("   ", "x", EffectKind::Heal, 1, 1),
            Err(GameError::InvalidArgument(_))
        ));
    }

    #[test]
    fn display_shows_stack_and_effect() {
        let potion = catalog::health_potion(3);
        assert_eq!(potion.to_string(), "Health Potion (x3) - Restores 30 HP [Heal: 30]");
        assert!(potion.answers_to("  health POTION "));
    }

    #[test]
    fn lookup_folds_non_ascii_case() {
        let potion = Item::new("Poção de Vida", "Cura", EffectKind::Heal, 30, 1).unwrap();
        assert!(potion.answers_to("POÇÃO DE VIDA"));
        assert!(!potion.answers_to("Pocao de Vida"));
    }

    #[test]
    fn def_conversion_keeps_every_field() {
        let bomb = catalog::bomb(2);
        let back = Item::from_def(&bomb.to_def()).unwrap();
        assert_eq!(back, bomb);
        assert_eq!(back.quantity, 2);
        assert_eq!(back.effect_value(), 25);
        assert_eq!(back.description(), bomb.description());
    }
}
