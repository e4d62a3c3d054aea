//! The game loop and its menu handlers.
//!
//! [`run_game`] shows the title menu, starts or loads a session and then runs
//! the main menu until the hero dies, the final boss falls or the player
//! quits. Each menu entry has a handler here; the rules themselves live in
//! [`crate::combat`], [`crate::story`] and friends.

use anyhow::Result;
use log::{info, warn};
use vorath_data::HeroClass;

use crate::bestiary;
use crate::combat::{CombatOutcome, Encounter, TurnContext, fight, item_turn};
use crate::combatant::Attackable;
use crate::config::GameConfig;
use crate::error::InputClosed;
use crate::save_files::{collect_save_slots, load_save_file, write_save};
use crate::session::GameSession;
use crate::spinners::SpinnerType;
use crate::story::{self, ENDING_TITLE, Exploration, FINAL_CHAPTER_TITLE, INTRO};
use crate::view::ViewItem;

pub const GAME_TITLE: &str = "VORATH: A TEXT ADVENTURE";

/// How a run of the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Victory,
    Defeat,
    /// The player left from a menu, or input closed.
    Quit,
}

/// Control flow signal used by handlers to leave the main loop.
pub enum MenuControl {
    Continue,
    Quit,
}

const MAIN_MENU: [&str; 6] = [
    "Explore",
    "Use item",
    "View inventory",
    "View status",
    "Save game",
    "Quit game",
];

/// Run the game from the title menu to an ending.
///
/// Closing the input (end of file or Ctrl-C) ends the game like quitting does.
///
/// # Errors
/// Returns an error if a roll or a read fails for any other reason.
pub fn run_game(config: &GameConfig, ctx: &mut TurnContext<'_>) -> Result<GameEnd> {
    let end = match play(config, ctx) {
        Ok(end) => end,
        Err(e) if e.is::<InputClosed>() => {
            info!("input closed, leaving the game");
            GameEnd::Quit
        },
        Err(e) => return Err(e),
    };
    if end == GameEnd::Quit {
        let farewell = ctx.flavor.spin(SpinnerType::Farewell, "Thanks for playing!");
        ctx.view.push(ViewItem::EngineMessage(farewell));
    }
    info!("game ended: {end:?}");
    Ok(end)
}

fn play(config: &GameConfig, ctx: &mut TurnContext<'_>) -> Result<GameEnd> {
    let Some(mut session) = title_menu(config, ctx)? else {
        return Ok(GameEnd::Quit);
    };

    if story::is_fresh_start(&session.progress) {
        push_chapter(ctx, INTRO.title, INTRO.lines.iter().map(ToString::to_string).collect());
        ctx.prompt.pause(ctx.view)?;
    }

    while !session.is_over() {
        ctx.view.push(ViewItem::Menu {
            title: format!(
                "Chapter {} | Explorations: {}\nWhat will you do?",
                session.progress.chapter, session.progress.explorations
            ),
            options: MAIN_MENU.iter().map(ToString::to_string).collect(),
            cancel: None,
        });
        let control = match ctx.prompt.choose(ctx.view, 1, 6)? {
            1 => explore_handler(&mut session, ctx)?,
            2 => use_item_handler(&mut session, ctx)?,
            3 => inventory_handler(&session, ctx),
            4 => status_handler(&session, ctx),
            5 => save_handler(config, &session, ctx)?,
            _ => quit_handler(ctx)?,
        };
        if let MenuControl::Quit = control {
            return Ok(GameEnd::Quit);
        }
    }

    if session.player.is_alive() {
        victory_ending(&session, ctx);
        Ok(GameEnd::Victory)
    } else {
        game_over(&session, ctx);
        Ok(GameEnd::Defeat)
    }
}

/// New game, load game or quit. Returns `None` when the player quits.
///
/// # Errors
/// Returns an error if input fails.
pub fn title_menu(config: &GameConfig, ctx: &mut TurnContext<'_>) -> Result<Option<GameSession>> {
    loop {
        ctx.view.push(ViewItem::Banner(GAME_TITLE.to_string()));
        ctx.view.push(ViewItem::Menu {
            title: "Main menu".to_string(),
            options: vec!["New game".to_string(), "Load game".to_string(), "Quit".to_string()],
            cancel: None,
        });
        match ctx.prompt.choose(ctx.view, 1, 3)? {
            1 => return new_game(config, ctx).map(Some),
            2 => {
                if let Some(session) = load_handler(config, ctx)? {
                    return Ok(Some(session));
                }
            },
            _ => return Ok(None),
        }
    }
}

/// Class selection and naming.
///
/// # Errors
/// Returns an error if input fails.
pub fn new_game(config: &GameConfig, ctx: &mut TurnContext<'_>) -> Result<GameSession> {
    let classes = HeroClass::ALL;
    ctx.view.push(ViewItem::Menu {
        title: "Choose your class".to_string(),
        options: classes
            .iter()
            .map(|class| format!("{class} - {}", class_blurb(*class)))
            .collect(),
        cancel: None,
    });
    let class = classes
        .get(ctx.prompt.choose(ctx.view, 1, 3)? as usize - 1)
        .copied()
        .unwrap_or(HeroClass::Warrior);

    let name = loop {
        let name = ctx.prompt.text(ctx.view, "Name your hero: ")?;
        if !name.is_empty() {
            break name;
        }
        ctx.view.push(ViewItem::Error("Your hero needs a name!".to_string()));
    };

    let session = GameSession::new(class, &name, config.inventory_capacity, config.first_level_xp)?;
    info!("new game: {name} the {class}");
    ctx.view
        .push(ViewItem::ActionSuccess("Character created!".to_string()));
    ctx.view.push(ViewItem::CombatantStatus {
        line: session.player.status_line(),
        is_player: true,
    });
    Ok(session)
}

fn class_blurb(class: HeroClass) -> &'static str {
    match class {
        HeroClass::Warrior => "Strong in melee, tough",
        HeroClass::Mage => "Powerful spells, fragile",
        HeroClass::Archer => "Precise ranged attacks",
    }
}

/// List the save slots and load the chosen one. Returns `None` if nothing was loaded.
///
/// # Errors
/// Returns an error if input fails.
pub fn load_handler(config: &GameConfig, ctx: &mut TurnContext<'_>) -> Result<Option<GameSession>> {
    let slots = match collect_save_slots(&config.save_dir) {
        Ok(slots) => slots,
        Err(e) => {
            warn!("could not list saves: {e:#}");
            ctx.view.push(ViewItem::Error(format!("Could not list saved games: {e}")));
            return Ok(None);
        },
    };
    if slots.is_empty() {
        ctx.view
            .push(ViewItem::ActionFailure("No saved games found.".to_string()));
        return Ok(None);
    }

    let max = u32::try_from(slots.len()).unwrap_or(u32::MAX);
    ctx.view.push(ViewItem::SavedGamesList {
        directory: config.save_dir.display().to_string(),
        slots: slots.clone(),
    });
    let choice = ctx.prompt.choose(ctx.view, 0, max)?;
    let Some(slot) = (choice as usize).checked_sub(1).and_then(|i| slots.get(i)) else {
        return Ok(None);
    };

    match load_save_file(&slot.path, config.inventory_capacity) {
        Ok(restored) => {
            ctx.view.push(ViewItem::GameLoaded {
                slot: slot.slot.clone(),
                path: slot.path.display().to_string(),
            });
            for item in &restored.skipped_items {
                ctx.view
                    .push(ViewItem::ActionFailure(format!("Could not restore item: {item}")));
            }
            let session = restored.session;
            ctx.view.push(ViewItem::CombatantStatus {
                line: session.player.status_line(),
                is_player: true,
            });
            ctx.view.push(progress_summary(&session));
            Ok(Some(session))
        },
        Err(e) => {
            warn!("load of slot '{}' failed: {e:#}", slot.slot);
            ctx.view.push(ViewItem::Error(format!("Error loading game: {e:#}")));
            Ok(None)
        },
    }
}

/// Explore once and play out whatever turns up.
///
/// # Errors
/// Returns an error if input or a roll fails.
pub fn explore_handler(session: &mut GameSession, ctx: &mut TurnContext<'_>) -> Result<MenuControl> {
    ctx.view.push(ViewItem::Narration("Exploring...".to_string()));
    match story::explore(&mut session.progress, session.player.level(), ctx.dice)? {
        Exploration::ChapterReached(card) => {
            push_chapter(ctx, card.title, card.lines.iter().map(ToString::to_string).collect());
            ctx.prompt.pause(ctx.view)?;
        },
        Exploration::FinalBattle => boss_battle(session, ctx)?,
        Exploration::Encounter(mut foe) => {
            let appears = ctx.flavor.spin(SpinnerType::EnemyAppears, "blocks your path!");
            ctx.view
                .push(ViewItem::Narration(format!("A {} {appears}", foe.name())));
            fight(session, &mut foe, Encounter::Skirmish, ctx)?;
        },
        Exploration::FoundItem(item) => match session.player.inventory_mut().add(&item) {
            Ok(()) => ctx.view.push(ViewItem::ItemFound(format!("You found: {}!", item.name()))),
            Err(e) => {
                info!("found item {} not kept: {e}", item.name());
                ctx.view.push(ViewItem::ActionFailure(format!(
                    "You found {}, but your inventory is full!",
                    item.name()
                )));
            },
        },
        Exploration::Trap(raw) => {
            ctx.view
                .push(ViewItem::Narration("You fell into a trap!".to_string()));
            let taken = session.player.receive_damage(raw);
            ctx.view.push(ViewItem::CharacterHarmed {
                name: session.player.name().to_string(),
                cause: "a trap".to_string(),
                amount: taken,
            });
            ctx.view.push(ViewItem::CombatantStatus {
                line: session.player.status_line(),
                is_player: true,
            });
        },
        Exploration::Quiet => {
            let line = ctx.flavor.spin(
                SpinnerType::QuietExploration,
                "You explore the area but find nothing of interest.",
            );
            ctx.view.push(ViewItem::Narration(line));
        },
    }
    Ok(MenuControl::Continue)
}

fn boss_battle(session: &mut GameSession, ctx: &mut TurnContext<'_>) -> Result<()> {
    push_chapter(ctx, FINAL_CHAPTER_TITLE, story::boss_intro(session.player.name()));
    ctx.prompt.pause(ctx.view)?;

    let mut boss = bestiary::final_boss(session.player.level(), ctx.dice)?;
    ctx.view.push(ViewItem::CombatantStatus {
        line: boss.status_line(),
        is_player: false,
    });
    ctx.prompt.pause(ctx.view)?;

    if let CombatOutcome::Defeat = fight(session, &mut boss, Encounter::BossFight, ctx)? {
        info!("{} fell to {}", session.player.name(), boss.name());
    }
    Ok(())
}

/// Use an item outside combat.
///
/// # Errors
/// Returns an error if input or a roll fails.
pub fn use_item_handler(session: &mut GameSession, ctx: &mut TurnContext<'_>) -> Result<MenuControl> {
    item_turn(&mut session.player, None, ctx)?;
    Ok(MenuControl::Continue)
}

pub fn inventory_handler(session: &GameSession, ctx: &mut TurnContext<'_>) -> MenuControl {
    let inventory = session.player.inventory();
    let lines = inventory
        .list_sorted()
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect();
    ctx.view.push(ViewItem::Inventory {
        lines,
        used: inventory.len(),
        capacity: inventory.capacity(),
    });
    MenuControl::Continue
}

pub fn status_handler(session: &GameSession, ctx: &mut TurnContext<'_>) -> MenuControl {
    ctx.view.push(ViewItem::CombatantStatus {
        line: session.player.status_line(),
        is_player: true,
    });
    ctx.view.push(progress_summary(session));
    MenuControl::Continue
}

/// Ask for a slot name and save there.
///
/// # Errors
/// Returns an error if input fails. Failed writes are reported, not returned.
pub fn save_handler(config: &GameConfig, session: &GameSession, ctx: &mut TurnContext<'_>) -> Result<MenuControl> {
    let slot = ctx.prompt.text(ctx.view, "Save name: ")?;
    if slot.is_empty() {
        ctx.view.push(ViewItem::ActionFailure("Invalid save name!".to_string()));
        return Ok(MenuControl::Continue);
    }
    match write_save(&config.save_dir, &slot, session) {
        Ok(path) => ctx.view.push(ViewItem::GameSaved {
            slot,
            path: path.display().to_string(),
        }),
        Err(e) => {
            warn!("save to slot '{slot}' failed: {e:#}");
            ctx.view.push(ViewItem::Error(format!("Error saving game: {e:#}")));
        },
    }
    Ok(MenuControl::Continue)
}

/// Leave the game after confirmation.
///
/// # Errors
/// Returns an error if input fails.
pub fn quit_handler(ctx: &mut TurnContext<'_>) -> Result<MenuControl> {
    if ctx.prompt.confirm(ctx.view, "Are you sure you want to quit?")? {
        Ok(MenuControl::Quit)
    } else {
        Ok(MenuControl::Continue)
    }
}

fn game_over(session: &GameSession, ctx: &mut TurnContext<'_>) {
    info!("game over at level {}", session.player.level());
    ctx.view.push(ViewItem::FinalStats {
        title: "GAME OVER".to_string(),
        lines: vec![
            "You have been defeated...".to_string(),
            format!("Level reached: {}", session.player.level()),
            format!("Total XP: {}", session.progress.xp),
            format!("Chapter reached: {}", session.progress.chapter),
        ],
    });
}

fn victory_ending(session: &GameSession, ctx: &mut TurnContext<'_>) {
    info!("victory at level {}", session.player.level());
    let mut lines = story::ending(session.player.name());
    lines.extend([
        "Final stats:".to_string(),
        format!("Level reached: {}", session.player.level()),
        format!("Total XP: {}", session.progress.xp),
        format!("Explorations made: {}", session.progress.explorations),
    ]);
    ctx.view.push(ViewItem::FinalStats {
        title: ENDING_TITLE.to_string(),
        lines,
    });
}

fn push_chapter(ctx: &mut TurnContext<'_>, title: &str, lines: Vec<String>) {
    ctx.view.push(ViewItem::ChapterText {
        title: title.to_string(),
        lines,
    });
}

fn progress_summary(session: &GameSession) -> ViewItem {
    ViewItem::ProgressSummary {
        xp: session.progress.xp,
        xp_to_next: session.progress.xp_to_next,
        chapter: session.progress.chapter,
        explorations: session.progress.explorations,
    }
}
