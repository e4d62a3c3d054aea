//! Inventory Module
//!
//! A capacity-bounded bag of item stacks. Stacks are keyed by lower-cased
//! name plus effect kind, so picking up another "health potion" merges with
//! an existing "Health Potion" stack instead of taking a new slot.

use std::collections::HashMap;

use log::debug;

use crate::error::GameError;
use crate::item::{EffectKind, Item};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    name: String,
    effect: EffectKind,
}

impl ItemKey {
    fn of(item: &Item) -> ItemKey {
        ItemKey {
            name: item.folded_name(),
            effect: item.effect(),
        }
    }
}

/// Stacks of items with a maximum number of distinct slots.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: HashMap<ItemKey, Item>,
    capacity: usize,
}

impl Inventory {
    /// Create an empty inventory.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Inventory, GameError> {
        if capacity == 0 {
            return Err(GameError::InvalidArgument(
                "inventory capacity must be positive".to_string(),
            ));
        }
        Ok(Inventory {
            slots: HashMap::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of distinct stacks held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Add a copy of `item`, merging quantities with a matching stack.
    ///
    /// Merging never needs a free slot; a new stack does.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if the item has a blank name or zero quantity
    /// - [`GameError::CapacityExceeded`] if a new stack is needed and every slot is taken
    pub fn add(&mut self, item: &Item) -> Result<(), GameError> {
        if item.name().trim().is_empty() {
            return Err(GameError::InvalidArgument("cannot store an unnamed item".to_string()));
        }
        if item.quantity == 0 {
            return Err(GameError::InvalidArgument(format!(
                "cannot store zero '{}'",
                item.name()
            )));
        }

        let key = ItemKey::of(item);
        if let Some(stack) = self.slots.get_mut(&key) {
            stack.quantity = stack.quantity.saturating_add(item.quantity);
            debug!("merged {} x{} (now {})", item.name(), item.quantity, stack.quantity);
            return Ok(());
        }
        if self.slots.len() >= self.capacity {
            return Err(GameError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        debug!("new stack {} x{}", item.name(), item.quantity);
        self.slots.insert(key, item.clone());
        Ok(())
    }

    /// Remove `quantity` units of the item called `name`.
    ///
    /// Returns `false` and leaves the inventory untouched if there is no such
    /// item or not enough of it. A stack reaching zero is dropped.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if `quantity` is zero
    pub fn remove(&mut self, name: &str, quantity: u32) -> Result<bool, GameError> {
        let Some(found) = self.find_by_name(name).cloned() else {
            if quantity == 0 {
                return Err(zero_removal());
            }
            return Ok(false);
        };
        self.remove_stack(&found, quantity)
    }

    /// Remove `quantity` units from the stack matching `item`'s identity.
    ///
    /// # Errors
    /// - [`GameError::InvalidArgument`] if `quantity` is zero
    pub fn remove_stack(&mut self, item: &Item, quantity: u32) -> Result<bool, GameError> {
        if quantity == 0 {
            return Err(zero_removal());
        }
        let key = ItemKey::of(item);
        let Some(stack) = self.slots.get_mut(&key) else {
            return Ok(false);
        };
        if stack.quantity < quantity {
            return Ok(false);
        }
        stack.quantity -= quantity;
        if stack.quantity == 0 {
            self.slots.remove(&key);
        }
        Ok(true)
    }

    /// Look up a stack by name (trimmed, case-insensitive).
    ///
    /// When stacks with different effects share the name, the first in sorted
    /// order is returned.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.slots.values().filter(|item| item.answers_to(name)).min()
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Item> {
        let key = self.find_by_name(name).map(ItemKey::of)?;
        self.slots.get_mut(&key)
    }

    /// Look up a stack by its zero-based position in [`Inventory::list_sorted`].
    pub fn find_by_index(&self, index: usize) -> Option<&Item> {
        let mut stacks: Vec<&Item> = self.slots.values().collect();
        stacks.sort();
        stacks.get(index).copied()
    }

    pub fn find_by_index_mut(&mut self, index: usize) -> Option<&mut Item> {
        let key = self.find_by_index(index).map(ItemKey::of)?;
        self.slots.get_mut(&key)
    }

    /// Copies of every stack, ordered by name then effect kind.
    pub fn list_sorted(&self) -> Vec<Item> {
        let mut stacks: Vec<Item> = self.slots.values().cloned().collect();
        stacks.sort();
        stacks
    }
}

fn zero_removal() -> GameError {
    GameError::InvalidArgument("removal quantity must be positive".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::catalog;

    fn potion(quantity: u32) -> Item {
        Item::new("Potion", "Restores HP", EffectKind::Heal, 30, quantity).unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(Inventory::new(0), Err(GameError::InvalidArgument(_))));
    }

    #[test]
    fn merging_ignores_capacity() {
        let mut inv = Inventory::new(1).unwrap();
        inv.add(&potion(2)).unwrap();
        inv.add(&potion(3)).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.find_by_name("Potion").unwrap().quantity, 5);

        let bomb = Item::new("Bomb", "Boom", EffectKind::Damage, 25, 1).unwrap();
        assert_eq!(inv.add(&bomb), Err(GameError::CapacityExceeded { capacity: 1 }));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn merge_key_ignores_case() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&potion(1)).unwrap();
        inv.add(&Item::new("POTION", "other", EffectKind::Heal, 10, 2).unwrap()).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.find_by_index(0).unwrap().quantity, 3);
    }

    #[test]
    fn accented_names_merge_and_resolve() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&Item::new("Poção de Vida", "Cura 30", EffectKind::Heal, 30, 1).unwrap()).unwrap();
        inv.add(&Item::new("POÇÃO DE VIDA", "Cura 30", EffectKind::Heal, 30, 2).unwrap()).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.find_by_name("POÇÃO DE VIDA").unwrap().quantity, 3);
        assert!(inv.remove("poção de vida", 3).unwrap());
        assert!(inv.is_empty());
    }

    #[test]
    fn same_name_different_effect_takes_two_slots() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&potion(1)).unwrap();
        inv.add(&Item::new("Potion", "", EffectKind::AttackBuff, 5, 1).unwrap()).unwrap();
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.find_by_name("potion").unwrap().effect(), EffectKind::Heal);
    }

    #[test]
    fn add_rejects_empty_stack() {
        let mut inv = Inventory::new(5).unwrap();
        assert!(matches!(inv.add(&potion(0)), Err(GameError::InvalidArgument(_))));
        assert!(inv.is_empty());
    }

    #[test]
    fn add_stores_a_copy() {
        let mut inv = Inventory::new(5).unwrap();
        let mut original = potion(2);
        inv.add(&original).unwrap();
        original.quantity = 99;
        assert_eq!(inv.find_by_name("potion").unwrap().quantity, 2);
    }

    #[test]
    fn remove_decrements_and_drops_empty_stacks() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&potion(3)).unwrap();
        assert!(inv.remove("  potion ", 2).unwrap());
        assert_eq!(inv.find_by_name("Potion").unwrap().quantity, 1);
        assert!(!inv.remove("Potion", 2).unwrap());
        assert_eq!(inv.find_by_name("Potion").unwrap().quantity, 1);
        assert!(inv.remove("Potion", 1).unwrap());
        assert!(inv.find_by_name("Potion").is_none());
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_missing_or_zero() {
        let mut inv = Inventory::new(5).unwrap();
        assert!(!inv.remove("ghost", 1).unwrap());
        inv.add(&potion(1)).unwrap();
        assert!(inv.remove("Potion", 0).is_err());
        assert!(inv.remove("ghost", 0).is_err());
    }

    #[test]
    fn index_follows_sorted_order() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&catalog::strength_potion(1)).unwrap();
        inv.add(&catalog::bomb(1)).unwrap();
        inv.add(&catalog::health_potion(1)).unwrap();
        let names: Vec<String> = inv.list_sorted().iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, ["Bomb", "Health Potion", "Strength Potion"]);
        assert_eq!(inv.find_by_index(1).unwrap().name(), "Health Potion");
        assert!(inv.find_by_index(3).is_none());
    }

    #[test]
    fn mutable_lookups_edit_in_place() {
        let mut inv = Inventory::new(5).unwrap();
        inv.add(&catalog::bomb(1)).unwrap();
        inv.add(&catalog::health_potion(1)).unwrap();
        inv.find_by_index_mut(0).unwrap().quantity = 4;
        inv.find_by_name_mut("health potion").unwrap().quantity += 1;
        assert_eq!(inv.find_by_name("Bomb").unwrap().quantity, 4);
        assert_eq!(inv.find_by_name("Health Potion").unwrap().quantity, 2);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut inv = Inventory::new(2).unwrap();
        inv.add(&catalog::bomb(1)).unwrap();
        inv.clear();
        assert!(inv.is_empty());
        assert_eq!(inv.capacity(), 2);
    }
}
