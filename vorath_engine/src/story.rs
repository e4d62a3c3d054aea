//! The story track and exploration events.
//!
//! Every second exploration moves the story forward one chapter. The others
//! roll for an event: a fight, a find, a trap, or nothing at all. Reaching
//! [`FINAL_CHAPTER`] starts the fight with the final boss.

use log::{debug, info};

use crate::bestiary;
use crate::combatant::Combatant;
use crate::dice::Roller;
use crate::error::GameError;
use crate::item::{Item, catalog};
use crate::progression::Progress;

pub const FINAL_CHAPTER: u32 = 6;
/// Faces of the trap damage die.
pub const TRAP_DIE: u32 = 15;

/// Title and lines of a chapter card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

pub const INTRO: Chapter = Chapter {
    title: "CHAPTER 1: THE AWAKENING",
    lines: &[
        "You wake in a dark forest...",
        "You don't remember how you got here.",
        "In the distance, you see the ruins of an ancient castle.",
        "They say a powerful being dwells there...",
        "Your journey begins now!",
    ],
};

const CHAPTERS: [Chapter; 4] = [
    Chapter {
        title: "CHAPTER 2: THE ABANDONED VILLAGE",
        lines: &[
            "You come upon an abandoned village.",
            "Signs of battle are everywhere.",
            "On the walls, written in blood: 'He comes at night'.",
            "You sense you are getting closer to the castle...",
        ],
    },
    Chapter {
        title: "CHAPTER 3: THE CURSED GRAVEYARD",
        lines: &[
            "A graveyard rises before you.",
            "The undead wander among the tombstones.",
            "A dark energy seeps from the ground.",
            "The castle is closer than ever...",
        ],
    },
    Chapter {
        title: "CHAPTER 4: THE BROKEN BRIDGE",
        lines: &[
            "You reach a bridge over a chasm.",
            "On the far side, the castle looms.",
            "Creatures guard the crossing.",
            "You are almost there...",
        ],
    },
    Chapter {
        title: "CHAPTER 5: THE CASTLE GATES",
        lines: &[
            "At last, you reach the castle gates.",
            "They creak slowly open.",
            "A voice echoes: 'Welcome, adventurer...'",
            "Prepare for the final confrontation!",
        ],
    },
];

pub const FINAL_CHAPTER_TITLE: &str = "FINAL CHAPTER: VORATH THE ETERNAL";
pub const ENDING_TITLE: &str = "ENDING: THE LIGHT RETURNS";

/// Narrative chapter card for `chapter`, if it has one.
pub fn chapter(chapter: u32) -> Option<Chapter> {
    match chapter {
        1 => Some(INTRO),
        2..=5 => CHAPTERS.get(chapter as usize - 2).copied(),
        _ => None,
    }
}

/// Lines shown as the hero enters the throne room.
pub fn boss_intro(hero_name: &str) -> Vec<String> {
    vec![
        "You enter the great hall of the castle.".to_string(),
        "On the throne, a shadowy figure rises.".to_string(),
        format!("'You have come far, {hero_name}...'"),
        "'But your journey ends here!'".to_string(),
    ]
}

/// Lines shown once the final boss has fallen.
pub fn ending(hero_name: &str) -> Vec<String> {
    vec![
        format!("With {} defeated,", bestiary::BOSS_NAME),
        "peace returns to the land.".to_string(),
        "You are hailed as a hero!".to_string(),
        format!("Congratulations, {hero_name}!"),
    ]
}

/// The intro is shown only to a hero who has not set out yet.
pub fn is_fresh_start(progress: &Progress) -> bool {
    progress.chapter <= 1 && progress.explorations == 0 && !progress.boss_defeated
}

/// What one exploration turned up.
#[derive(Debug, Clone)]
pub enum Exploration {
    ChapterReached(Chapter),
    FinalBattle,
    Encounter(Combatant),
    FoundItem(Item),
    /// Raw trap damage, before defense.
    Trap(u32),
    Quiet,
}

/// Explore once, advancing the counters in `progress`.
///
/// # Errors
/// Propagates roller failures.
pub fn explore(progress: &mut Progress, player_level: u32, dice: &mut dyn Roller) -> Result<Exploration, GameError> {
    progress.explorations = progress.explorations.saturating_add(1);

    if progress.explorations % 2 == 0 {
        progress.chapter = progress.chapter.saturating_add(1);
        info!("story advances to chapter {}", progress.chapter);
        return Ok(match chapter(progress.chapter) {
            Some(card) if progress.chapter < FINAL_CHAPTER => Exploration::ChapterReached(card),
            _ => Exploration::FinalBattle,
        });
    }

    let event = dice.roll(10)?;
    debug!("exploration {} event roll {event}", progress.explorations);
    let outcome = match event {
        1..=5 => Exploration::Encounter(bestiary::random_enemy(player_level, dice)?),
        6 | 7 => Exploration::FoundItem(found_item(dice)?),
        8 => Exploration::Trap(dice.roll(TRAP_DIE)?),
        _ => Exploration::Quiet,
    };
    Ok(outcome)
}

/// Roll a d4 on the found-item table.
///
/// # Errors
/// Propagates roller failures.
pub fn found_item(dice: &mut dyn Roller) -> Result<Item, GameError> {
    Ok(match dice.roll(4)? {
        1 => catalog::health_potion(1),
        2 => catalog::strength_potion(1),
        3 => catalog::defense_potion(1),
        _ => catalog::rare_elixir(1),
    })
}
