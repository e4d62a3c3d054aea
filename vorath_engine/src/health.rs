//! Health Module
//!
//! Hit point bookkeeping shared by heroes and enemies.
use std::cmp;

/// Current and maximum hit points of a living entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthState {
    max_hp: u32,
    current_hp: u32,
}
impl HealthState {
    /// Create a `HealthState` at full health.
    pub fn new_at_max(max_hp: u32) -> HealthState {
        HealthState {
            max_hp,
            current_hp: max_hp,
        }
    }

    /// Get the maximum HP for this entity
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Get the current HP for this entity
    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn life_state(&self) -> LifeState {
        if self.current_hp > 0 {
            LifeState::Alive
        } else {
            LifeState::Dead
        }
    }

    /// Do damage to health. Saturates at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Heal the character. Saturates at max health.
    ///
    /// Returns the number of hit points actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = cmp::min(self.max_hp, self.current_hp.saturating_add(amount));
        self.current_hp - before
    }

    /// Restore to full health.
    pub fn restore(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Set current HP, clamped to `0..=max_hp`.
    pub fn set_current(&mut self, hp: u32) {
        self.current_hp = cmp::min(hp, self.max_hp);
    }

    /// Set maximum HP. Current HP is lowered if it would exceed the new maximum.
    pub fn set_max(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.current_hp = cmp::min(self.current_hp, max_hp);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead,
}

/// Things that have health and can be harmed or healed.
pub trait LivingEntity {
    fn max_hp(&self) -> u32;
    fn current_hp(&self) -> u32;
    fn damage(&mut self, amount: u32);
    fn heal(&mut self, amount: u32) -> u32;
    fn life_state(&self) -> LifeState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_saturates_at_max_hp() {
        let mut state = HealthState::new_at_max(10);
        state.damage(5);
        assert_eq!(state.heal(3), 3);
        assert_eq!(state.current_hp, 8);

        assert_eq!(state.heal(10), 2);
        assert_eq!(state.current_hp, 10);
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut state = HealthState::new_at_max(10);
        state.damage(25);
        assert_eq!(state.current_hp(), 0);
        assert_eq!(state.life_state(), LifeState::Dead);
    }

    #[test]
    fn lowering_max_clamps_current() {
        let mut state = HealthState::new_at_max(50);
        state.set_max(20);
        assert_eq!(state.current_hp(), 20);
        state.set_current(99);
        assert_eq!(state.current_hp(), 20);
        state.set_max(40);
        assert_eq!(state.current_hp(), 20);
        state.restore();
        assert_eq!(state.current_hp(), 40);
    }
}
