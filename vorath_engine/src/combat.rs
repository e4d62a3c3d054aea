//! Combat resolution.
//!
//! A fight alternates a player turn and an opponent turn until one side
//! falls or the player escapes. The single-step functions ([`player_attack`],
//! [`opponent_attack`], [`attempt_flee`], [`claim_victory`]) carry the rules;
//! [`fight`] strings them together and reports each step to the view.

use log::{info, warn};

use crate::class::Strike;
use crate::combatant::{Attackable, Combatant};
use crate::dice::Roller;
use crate::error::GameError;
use crate::input::Prompt;
use crate::item::Item;
use crate::item_use::{ItemUse, use_item};
use crate::progression::{LevelUp, award_xp};
use crate::session::GameSession;
use crate::spinners::{FlavorText, SpinnerType};
use crate::view::{View, ViewItem};

/// A d20 at or above this escapes a skirmish.
pub const FLEE_DIFFICULTY: u32 = 12;
/// A d10 at or above this turns a boss hit into a Shadow Strike.
pub const SHADOW_STRIKE_THRESHOLD: u32 = 7;
pub const BOSS_XP_MULTIPLIER: u32 = 3;

/// Everything a turn needs besides the combatants themselves.
pub struct TurnContext<'a> {
    pub dice: &'a mut dyn Roller,
    pub prompt: &'a mut dyn Prompt,
    pub view: &'a mut View,
    pub flavor: &'a FlavorText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    Skirmish,
    BossFight,
}

impl Encounter {
    /// Actions offered to the player, in menu order.
    pub fn actions(self) -> &'static [CombatAction] {
        match self {
            Encounter::Skirmish => &[
                CombatAction::Attack,
                CombatAction::UseItem,
                CombatAction::Flee,
                CombatAction::Special,
            ],
            Encounter::BossFight => &[CombatAction::Attack, CombatAction::UseItem, CombatAction::Special],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatAction {
    Attack,
    UseItem,
    Flee,
    Special,
}

impl CombatAction {
    pub fn label(self) -> &'static str {
        match self {
            CombatAction::Attack => "Attack",
            CombatAction::UseItem => "Use item",
            CombatAction::Flee => "Try to flee",
            CombatAction::Special => "Special ability",
        }
    }
}

/// One resolved hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub roll: u32,
    pub strike: Strike,
    pub taken: u32,
    pub shadow_strike: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VictoryReport {
    pub xp_gained: u32,
    pub level_ups: Vec<LevelUp>,
    /// Items moved into the player's inventory.
    pub looted: Vec<Item>,
    /// Items left behind for lack of space.
    pub dropped: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory(VictoryReport),
    Defeat,
    Fled,
}

/// The player rolls a d6 and strikes.
///
/// # Errors
/// Propagates roller failures.
pub fn player_attack(
    player: &mut Combatant,
    foe: &mut Combatant,
    dice: &mut dyn Roller,
) -> Result<AttackReport, GameError> {
    let roll = dice.roll_d6()?;
    let strike = player.compute_damage(roll, dice)?;
    let taken = foe.receive_damage(strike.amount);
    Ok(AttackReport {
        roll,
        strike,
        taken,
        shadow_strike: false,
    })
}

/// The opponent rolls a d6 and strikes back. In a boss fight a d10 may
/// double the blow.
///
/// # Errors
/// Propagates roller failures.
pub fn opponent_attack(
    foe: &mut Combatant,
    player: &mut Combatant,
    encounter: Encounter,
    dice: &mut dyn Roller,
) -> Result<AttackReport, GameError> {
    let roll = dice.roll_d6()?;
    let mut strike = foe.compute_damage(roll, dice)?;
    let shadow_strike = encounter == Encounter::BossFight && dice.roll(10)? >= SHADOW_STRIKE_THRESHOLD;
    if shadow_strike {
        strike.amount = strike.amount.saturating_mul(2);
    }
    let taken = player.receive_damage(strike.amount);
    Ok(AttackReport {
        roll,
        strike,
        taken,
        shadow_strike,
    })
}

/// # Errors
/// Propagates roller failures.
pub fn attempt_flee(dice: &mut dyn Roller) -> Result<bool, GameError> {
    Ok(dice.roll_d20()? >= FLEE_DIFFICULTY)
}

/// Award XP, level up and move the defeated foe's items to the player.
///
/// Boss kills are worth triple XP and mark the boss as defeated.
pub fn claim_victory(session: &mut GameSession, foe: &Combatant, encounter: Encounter) -> VictoryReport {
    let xp_gained = match encounter {
        Encounter::Skirmish => foe.xp_reward(),
        Encounter::BossFight => {
            session.progress.boss_defeated = true;
            foe.xp_reward().saturating_mul(BOSS_XP_MULTIPLIER)
        },
    };
    let level_ups = award_xp(&mut session.player, &mut session.progress, xp_gained);

    let mut looted = Vec::new();
    let mut dropped = Vec::new();
    for item in foe.inventory().list_sorted() {
        match session.player.inventory_mut().add(&item) {
            Ok(()) => looted.push(item),
            Err(e) => {
                warn!("left {} behind: {e}", item.name());
                dropped.push(item);
            },
        }
    }
    info!(
        "{} defeated: +{xp_gained} xp, {} level-up(s), {} looted, {} dropped",
        foe.name(),
        level_ups.len(),
        looted.len(),
        dropped.len()
    );
    VictoryReport {
        xp_gained,
        level_ups,
        looted,
        dropped,
    }
}

/// Run a fight to its end.
///
/// Using an item never costs the player the turn; every other action does.
/// A furious warrior calms down when the fight ends, however it ends.
///
/// # Errors
/// Returns an error if input closes or a roll fails.
pub fn fight(
    session: &mut GameSession,
    foe: &mut Combatant,
    encounter: Encounter,
    ctx: &mut TurnContext<'_>,
) -> anyhow::Result<CombatOutcome> {
    info!("combat start: {} vs {} ({encounter:?})", session.player.name(), foe.name());
    let banner = match encounter {
        Encounter::Skirmish => "COMBAT BEGINS!",
        Encounter::BossFight => "FINAL BATTLE!",
    };
    ctx.view.push(ViewItem::Banner(banner.to_string()));
    push_status(ctx.view, foe, false);

    let outcome = loop {
        let actions = encounter.actions();
        ctx.view.push(ViewItem::Menu {
            title: "Your turn".to_string(),
            options: actions.iter().map(|a| a.label().to_string()).collect(),
            cancel: None,
        });
        let max = u32::try_from(actions.len()).unwrap_or(u32::MAX);
        let choice = ctx.prompt.choose(ctx.view, 1, max)?;
        let action = actions.get(choice as usize - 1).copied().unwrap_or(CombatAction::Attack);

        match action {
            CombatAction::Attack => {
                let report = player_attack(&mut session.player, foe, ctx.dice)?;
                push_attack(ctx.view, session.player.name(), foe.name(), &report);
                push_status(ctx.view, foe, false);
            },
            CombatAction::UseItem => {
                item_turn(&mut session.player, Some(&mut *foe as &mut dyn Attackable), ctx)?;
                if foe.is_alive() {
                    continue;
                }
            },
            CombatAction::Flee => {
                if attempt_flee(ctx.dice)? {
                    ctx.view.push(ViewItem::ActionSuccess("You escaped!".to_string()));
                    break CombatOutcome::Fled;
                }
                let line = ctx.flavor.spin(SpinnerType::FleeFailed, "You couldn't get away!");
                ctx.view.push(ViewItem::ActionFailure(line));
            },
            CombatAction::Special => {
                let outcome = session.player.use_special(foe, ctx.dice)?;
                ctx.view.push(ViewItem::SpecialUsed(outcome.to_string()));
                push_status(ctx.view, foe, false);
            },
        }

        if !foe.is_alive() {
            let report = claim_victory(session, foe, encounter);
            push_victory(ctx.view, foe.name(), encounter, &report);
            break CombatOutcome::Victory(report);
        }

        let report = opponent_attack(foe, &mut session.player, encounter, ctx.dice)?;
        if report.shadow_strike {
            ctx.view
                .push(ViewItem::SpecialUsed(format!("{} unleashes a SHADOW STRIKE!", foe.name())));
        }
        push_attack(ctx.view, foe.name(), session.player.name(), &report);
        push_status(ctx.view, &session.player, true);

        if !session.player.is_alive() {
            break CombatOutcome::Defeat;
        }
        ctx.prompt.pause(ctx.view)?;
    };

    if session.player.calm_down() {
        ctx.view.push(ViewItem::EngineMessage("Your fury subsides.".to_string()));
    }
    info!("combat end: {}", match &outcome {
        CombatOutcome::Victory(_) => "victory",
        CombatOutcome::Defeat => "defeat",
        CombatOutcome::Fled => "fled",
    });
    Ok(outcome)
}

/// Let the player pick an item and use it. Returns `None` if nothing was chosen.
///
/// # Errors
/// Returns an error if input closes or a roll fails.
pub fn item_turn(
    player: &mut Combatant,
    target: Option<&mut dyn Attackable>,
    ctx: &mut TurnContext<'_>,
) -> anyhow::Result<Option<ItemUse>> {
    if player.inventory().is_empty() {
        ctx.view
            .push(ViewItem::ActionFailure("Your inventory is empty!".to_string()));
        return Ok(None);
    }
    let stacks = player.inventory().list_sorted();
    ctx.view.push(ViewItem::Menu {
        title: "Choose an item".to_string(),
        options: stacks.iter().map(ToString::to_string).collect(),
        cancel: Some("Cancel".to_string()),
    });
    let max = u32::try_from(stacks.len()).unwrap_or(u32::MAX);
    let choice = ctx.prompt.choose(ctx.view, 0, max)?;
    if choice == 0 {
        return Ok(None);
    }

    let outcome = use_item(player, choice as usize - 1, target, ctx.dice)?;
    let message = outcome.to_string();
    if outcome.consumed() {
        ctx.view.push(ViewItem::ItemUsed(message));
    } else {
        ctx.view.push(ViewItem::ActionFailure(message));
    }
    Ok(Some(outcome))
}

fn push_status(view: &mut View, who: &Combatant, is_player: bool) {
    view.push(ViewItem::CombatantStatus {
        line: who.status_line(),
        is_player,
    });
}

fn push_attack(view: &mut View, attacker: &str, target: &str, report: &AttackReport) {
    view.push(ViewItem::DiceRolled {
        roller: attacker.to_string(),
        faces: 6,
        value: report.roll,
    });
    view.push(ViewItem::StrikeLanded {
        attacker: attacker.to_string(),
        target: target.to_string(),
        damage: report.strike.amount,
        taken: report.taken,
        flourishes: report.strike.flourishes.iter().map(ToString::to_string).collect(),
    });
}

fn push_victory(view: &mut View, foe_name: &str, encounter: Encounter, report: &VictoryReport) {
    let banner = match encounter {
        Encounter::Skirmish => "VICTORY!",
        Encounter::BossFight => "EPIC VICTORY!",
    };
    view.push(ViewItem::Banner(banner.to_string()));
    view.push(ViewItem::Narration(format!("You defeated {foe_name}!")));
    if encounter == Encounter::BossFight {
        view.push(ViewItem::Narration(
            "The castle begins to crumble. The darkness lifts.".to_string(),
        ));
    }
    view.push(ViewItem::XpGained(report.xp_gained));
    for up in &report.level_ups {
        view.push(ViewItem::LevelUp(*up));
    }
    if report.looted.is_empty() && report.dropped.is_empty() {
        view.push(ViewItem::Narration("The enemy carried nothing.".to_string()));
    }
    if !report.looted.is_empty() {
        view.push(ViewItem::LootFound(
            report
                .looted
                .iter()
                .map(|item| format!("{} (x{})", item.name(), item.quantity))
                .collect(),
        ));
    }
    for item in &report.dropped {
        view.push(ViewItem::ActionFailure(format!(
            "Inventory full! You cannot carry: {}",
            item.name()
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassState;
    use crate::combatant::BaseStats;
    use crate::dice::LoadedDice;
    use crate::health::LivingEntity;
    use crate::item::catalog;
    use vorath_data::HeroClass;

    fn goblin() -> Combatant {
        Combatant::new(
            "Goblin",
            BaseStats {
                max_hp: 50,
                attack: 8,
                defense: 3,
                level: 1,
            },
            ClassState::enemy(1, "Common"),
        )
        .unwrap()
    }

    fn session(class: HeroClass) -> GameSession {
        GameSession::new(class, "Aria", 20, 100).unwrap()
    }

    #[test]
    fn warrior_attack_without_crit() {
        let mut s = session(HeroClass::Warrior);
        let mut foe = goblin();
        let report = player_attack(&mut s.player, &mut foe, &mut LoadedDice::new([4, 50])).unwrap();
        assert_eq!(report.strike.amount, 19);
        assert_eq!(report.taken, 16);
        assert_eq!(foe.hp(), 34);
    }

    #[test]
    fn shadow_strike_doubles_boss_damage() {
        let mut s = session(HeroClass::Warrior);
        let mut boss = goblin();
        // d6 = 2 -> 10 raw, d10 = 7 -> 20 raw, minus defense 10
        let report = opponent_attack(&mut boss, &mut s.player, Encounter::BossFight, &mut LoadedDice::new([2, 7]))
            .unwrap();
        assert!(report.shadow_strike);
        assert_eq!(report.taken, 10);

        let report = opponent_attack(&mut boss, &mut s.player, Encounter::BossFight, &mut LoadedDice::new([2, 6]))
            .unwrap();
        assert!(!report.shadow_strike);
        assert_eq!(report.taken, 0);
    }

    #[test]
    fn skirmish_opponent_never_rolls_d10() {
        let mut s = session(HeroClass::Mage);
        let mut foe = goblin();
        let mut dice = LoadedDice::new([6]);
        let report = opponent_attack(&mut foe, &mut s.player, Encounter::Skirmish, &mut dice).unwrap();
        assert_eq!(report.taken, 9);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn flee_threshold() {
        assert!(attempt_flee(&mut LoadedDice::new([12])).unwrap());
        assert!(!attempt_flee(&mut LoadedDice::new([11])).unwrap());
    }

    #[test]
    fn victory_moves_loot_and_drops_overflow() {
        let mut s = GameSession::new(HeroClass::Archer, "Rook", 3, 100).unwrap();
        let mut foe = goblin();
        foe.inventory_mut().add(&catalog::health_potion(1)).unwrap();
        foe.inventory_mut().add(&catalog::bomb(2)).unwrap();
        foe.inventory_mut().add(&catalog::defense_potion(1)).unwrap();

        let report = claim_victory(&mut s, &foe, Encounter::Skirmish);
        assert_eq!(report.xp_gained, 50);
        // Bomb takes the last free slot, Defense Potion does not fit, potions merge
        let looted: Vec<&str> = report.looted.iter().map(Item::name).collect();
        assert_eq!(looted, ["Bomb", "Health Potion"]);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].name(), "Defense Potion");
        assert_eq!(s.player.inventory().find_by_name("Health Potion").unwrap().quantity, 4);
    }

    #[test]
    fn boss_victory_triples_xp_and_levels() {
        let mut s = session(HeroClass::Mage);
        let foe = goblin();
        let report = claim_victory(&mut s, &foe, Encounter::BossFight);
        assert_eq!(report.xp_gained, 150);
        assert_eq!(report.level_ups.len(), 1);
        assert!(s.progress.boss_defeated);
    }

    #[test]
    fn full_fight_with_fury_calms_down() {
        let mut s = session(HeroClass::Warrior);
        let mut foe = goblin();
        foe.set_hp(20);
        let flavor = FlavorText::new();
        let mut view = View::new();
        // special (fury), goblin hits: d6 4
        // attack: d6 6, crit d100 10 -> (21*2)*3/2 = 63
        let mut dice = LoadedDice::new([4, 6, 10]);
        let mut prompt = crate::input::ScriptedInput::new(["4", "1"]);
        let mut ctx = TurnContext {
            dice: &mut dice,
            prompt: &mut prompt,
            view: &mut view,
            flavor: &flavor,
        };
        let outcome = fight(&mut s, &mut foe, Encounter::Skirmish, &mut ctx).unwrap();
        assert!(matches!(outcome, CombatOutcome::Victory(_)));
        assert_eq!(s.player.defense(), 10);
        // goblin hit 12 raw against defense 7
        assert_eq!(s.player.hp(), 115);
        assert!(view.pending().any(ViewItem::is_engine_message));
    }

    #[test]
    fn item_use_keeps_the_turn() {
        let mut s = session(HeroClass::Archer);
        s.player.damage(40);
        let mut foe = goblin();
        let flavor = FlavorText::new();
        let mut view = View::new();
        // use item 1 (Health Potion), then flee on 12
        let mut dice = LoadedDice::new([12]);
        let mut prompt = crate::input::ScriptedInput::new(["2", "1", "3"]);
        let mut ctx = TurnContext {
            dice: &mut dice,
            prompt: &mut prompt,
            view: &mut view,
            flavor: &flavor,
        };
        let outcome = fight(&mut s, &mut foe, Encounter::Skirmish, &mut ctx).unwrap();
        assert_eq!(outcome, CombatOutcome::Fled);
        assert_eq!(s.player.hp(), 90);
    }

    #[test]
    fn bomb_kill_still_counts_as_victory() {
        let mut s = session(HeroClass::Mage);
        s.player.inventory_mut().add(&catalog::bomb(1)).unwrap();
        let mut foe = goblin();
        foe.set_hp(5);
        let flavor = FlavorText::new();
        let mut view = View::new();
        let mut dice = LoadedDice::new([3]);
        // sorted inventory: Bomb, Health Potion, Strength Potion
        let mut prompt = crate::input::ScriptedInput::new(["2", "1"]);
        let mut ctx = TurnContext {
            dice: &mut dice,
            prompt: &mut prompt,
            view: &mut view,
            flavor: &flavor,
        };
        let outcome = fight(&mut s, &mut foe, Encounter::Skirmish, &mut ctx).unwrap();
        assert!(matches!(outcome, CombatOutcome::Victory(ref r) if r.xp_gained == 50));
    }
}
