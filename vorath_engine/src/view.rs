//! View module.
//!
//! Game logic never prints. Handlers push [`ViewItem`]s onto the [`View`],
//! which styles and displays them when flushed, just before the next prompt.
//! Entries are shown in the order they were pushed, with a small section
//! marker whenever the kind of output changes (story, combat, results, game).

use colored::Colorize;
use log::info;
use textwrap::{fill, termwidth};
use variantly::Variantly;

use crate::progression::LevelUp;
use crate::save_files::{SaveSlot, format_modified};
use crate::style::{GameStyle, indented_block, normal_block};

const ICON_SUCCESS: &str = "\u{2611}"; // ✔
const ICON_FAILURE: &str = "\u{274C}"; // ✖
const ICON_ERROR: &str = "⚠︎"; // U+26A0 U+FE0E
const ICON_ENGINE: &str = "⚙";
const ICON_DICE: &str = "⚄";
const ICON_STRIKE: &str = "⚔";
const ICON_HARMED: &str = "\u{2623}"; // biohazard sign
const ICON_CELEBRATE: &str = "🎉"; // U+1F389
const ICON_STATUS: &str = "⚕";

/// Buffer of pending output for the current step.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewEntry>,
    pub sequence: usize,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
            sequence: 0,
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(ViewEntry {
            section: item.section(),
            view_item: item,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    /// Iterate the pending items in push order.
    pub fn pending(&self) -> impl Iterator<Item = &ViewItem> {
        self.items.iter().map(|entry| &entry.view_item)
    }

    /// Drop everything pending without displaying it.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Display and clear every pending item.
    pub fn flush(&mut self) {
        // re-check terminal width in case it's been resized
        self.width = termwidth();

        let mut current: Option<Section> = None;
        for entry in &self.items {
            if entry.section.has_marker() && current != Some(entry.section) {
                println!("{:.>width$}\n", entry.section.label().section_style(), width = self.width);
            }
            current = Some(entry.section);
            render(&entry.view_item);
        }
        self.items.clear();
    }
}

/// A queued view item plus its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub section: Section,
    pub view_item: ViewItem,
    pub sequence: usize,
}

/// Broad kind of output, used for the section markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Story,
    Combat,
    Results,
    System,
    Prompt,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Story => "story",
            Section::Combat => "combat",
            Section::Results => "results",
            Section::System => "game",
            Section::Prompt => "",
        }
    }

    fn has_marker(self) -> bool {
        self != Section::Prompt
    }
}

/// Everything the game can show the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    Banner(String),
    ChapterText {
        title: String,
        lines: Vec<String>,
    },
    CharacterHarmed {
        name: String,
        cause: String,
        amount: u32,
    },
    CombatantStatus {
        line: String,
        is_player: bool,
    },
    DiceRolled {
        roller: String,
        faces: u32,
        value: u32,
    },
    EngineMessage(String),
    Error(String),
    FinalStats {
        title: String,
        lines: Vec<String>,
    },
    GameLoaded {
        slot: String,
        path: String,
    },
    GameSaved {
        slot: String,
        path: String,
    },
    Inventory {
        lines: Vec<String>,
        used: usize,
        capacity: usize,
    },
    ItemFound(String),
    ItemUsed(String),
    LevelUp(LevelUp),
    LootFound(Vec<String>),
    Menu {
        title: String,
        options: Vec<String>,
        cancel: Option<String>,
    },
    Narration(String),
    ProgressSummary {
        xp: u32,
        xp_to_next: u32,
        chapter: u32,
        explorations: u32,
    },
    SavedGamesList {
        directory: String,
        slots: Vec<SaveSlot>,
    },
    SpecialUsed(String),
    StrikeLanded {
        attacker: String,
        target: String,
        damage: u32,
        taken: u32,
        flourishes: Vec<String>,
    },
    XpGained(u32),
}

impl ViewItem {
    pub fn section(&self) -> Section {
        match self {
            ViewItem::Banner(_) | ViewItem::ChapterText { .. } | ViewItem::Narration(_) => Section::Story,
            ViewItem::CharacterHarmed { .. }
            | ViewItem::CombatantStatus { .. }
            | ViewItem::DiceRolled { .. }
            | ViewItem::SpecialUsed(_)
            | ViewItem::StrikeLanded { .. } => Section::Combat,
            ViewItem::ActionFailure(_)
            | ViewItem::ActionSuccess(_)
            | ViewItem::Error(_)
            | ViewItem::Inventory { .. }
            | ViewItem::ItemFound(_)
            | ViewItem::ItemUsed(_)
            | ViewItem::LevelUp(_)
            | ViewItem::LootFound(_)
            | ViewItem::ProgressSummary { .. }
            | ViewItem::XpGained(_) => Section::Results,
            ViewItem::EngineMessage(_)
            | ViewItem::FinalStats { .. }
            | ViewItem::GameLoaded { .. }
            | ViewItem::GameSaved { .. }
            | ViewItem::SavedGamesList { .. } => Section::System,
            ViewItem::Menu { .. } => Section::Prompt,
        }
    }
}

fn render(item: &ViewItem) {
    match item {
        ViewItem::Banner(text) => {
            let rule = "=".repeat(50);
            println!("{rule}\n{}\n{rule}\n", text.banner_style());
        },
        ViewItem::ChapterText { title, lines } => {
            println!("{}\n", title.chapter_style());
            for line in lines {
                println!("{}", fill(line, indented_block()).narrative_style());
            }
            println!();
        },
        ViewItem::Narration(text) => println!("{}\n", fill(text, normal_block()).narrative_style()),
        ViewItem::DiceRolled { roller, faces, value } => {
            println!("{:<4}{}", ICON_DICE.dice_style(), format!("{roller} rolled d{faces}: {value}").dice_style());
        },
        ViewItem::StrikeLanded {
            attacker,
            target,
            damage,
            taken,
            flourishes,
        } => {
            for note in flourishes {
                println!("{:<4}{}", "", note.flourish_style());
            }
            println!(
                "{:<4}{attacker} strikes {target} for {} ({} taken)",
                ICON_STRIKE.damage_style(),
                damage.to_string().damage_style(),
                taken
            );
        },
        ViewItem::SpecialUsed(text) => println!("{:<4}{}", ICON_STRIKE.flourish_style(), text.flourish_style()),
        ViewItem::CharacterHarmed { name, cause, amount } => {
            println!(
                "{:<4}{name} is hurt by {cause} (-{} hp)",
                ICON_HARMED.damage_style(),
                amount.to_string().damage_style()
            );
        },
        ViewItem::CombatantStatus { line, is_player } => {
            let styled = if *is_player { line.hero_style() } else { line.enemy_style() };
            println!("{:<4}{styled}\n", ICON_STATUS.status_style());
        },
        ViewItem::ActionSuccess(msg) | ViewItem::ItemUsed(msg) | ViewItem::ItemFound(msg) => {
            println!("{}", fill(format!("{ICON_SUCCESS:<4}{msg}").as_str(), normal_block()).green());
        },
        ViewItem::ActionFailure(msg) => {
            println!("{}", fill(format!("{ICON_FAILURE:<4}{}", msg.denied_style()).as_str(), normal_block()));
        },
        ViewItem::Error(msg) => {
            println!("{}", fill(format!("{ICON_ERROR:<4}{}", msg.error_style()).as_str(), normal_block()));
        },
        ViewItem::XpGained(amount) => println!("{:<4}{}", ICON_CELEBRATE, format!("+{amount} XP").bright_blue()),
        ViewItem::LevelUp(up) => {
            println!(
                "{:<4}{} You are now level {}. Max HP {}, ATK {}, DEF {}.",
                ICON_CELEBRATE,
                "LEVEL UP!".banner_style(),
                up.level,
                up.max_hp.to_string().heal_style(),
                up.attack,
                up.defense
            );
        },
        ViewItem::LootFound(lines) => {
            println!("{}", "Items found:".subheading_style());
            for line in lines {
                println!("  - {}", line.item_style());
            }
        },
        ViewItem::Inventory { lines, used, capacity } => {
            println!("{} ({used}/{capacity})", "Inventory".subheading_style());
            if lines.is_empty() {
                println!("    {}", "(empty)".italic().dimmed());
            }
            for line in lines {
                println!("    {}", line.item_style());
            }
            println!();
        },
        ViewItem::ProgressSummary {
            xp,
            xp_to_next,
            chapter,
            explorations,
        } => {
            println!("    XP: {xp}/{xp_to_next}\n    Chapter: {chapter}\n    Explorations: {explorations}\n");
        },
        ViewItem::Menu { title, options, cancel } => {
            println!("{}", title.subheading_style());
            for (number, option) in options.iter().enumerate() {
                println!("  {}. {}", number + 1, option.menu_style());
            }
            if let Some(cancel) = cancel {
                println!("  0. {}", cancel.menu_style());
            }
        },
        ViewItem::EngineMessage(msg) => println!("{}", fill(format!("{ICON_ENGINE:<4}{msg}").as_str(), normal_block())),
        ViewItem::GameSaved { slot, path } => {
            println!("{:<4}Game saved to slot '{}' ({path}).", ICON_SUCCESS, slot.item_style());
        },
        ViewItem::GameLoaded { slot, path } => {
            println!("{:<4}Loaded slot '{}' ({path}).", ICON_SUCCESS, slot.item_style());
        },
        ViewItem::SavedGamesList { directory, slots } => saved_games(directory, slots),
        ViewItem::FinalStats { title, lines } => {
            println!("{}", title.banner_style());
            for line in lines {
                println!("    {line}");
            }
            println!();
        },
    }
}

fn saved_games(directory: &str, slots: &[SaveSlot]) {
    info!("listing {} save slot(s) in {directory}", slots.len());
    println!("{}", format!("Saved games in {directory}").subheading_style());
    if slots.is_empty() {
        println!("    {}", "No saved games found.".italic().dimmed());
    }
    for (number, slot) in slots.iter().enumerate() {
        let modified = slot.modified.map(format_modified).unwrap_or_else(|| "unknown".to_string());
        println!("  {}. {} {}", number + 1, slot.slot.item_style(), format!("(saved {modified})").dimmed());
    }
    if !slots.is_empty() {
        println!("  0. {}", "Back".menu_style());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_sequence() {
        let mut view = View::new();
        view.push(ViewItem::Narration("a".into()));
        view.push(ViewItem::XpGained(5));
        assert_eq!(view.items[0].sequence, 0);
        assert_eq!(view.items[1].sequence, 1);
        assert_eq!(view.items[1].section, Section::Results);
        assert!(view.pending().any(ViewItem::is_xp_gained));
    }

    #[test]
    fn flush_and_clear_empty_the_buffer() {
        let mut view = View::new();
        view.push(ViewItem::Error("oops".into()));
        view.push(ViewItem::Menu {
            title: "Pick".into(),
            options: vec!["One".into()],
            cancel: Some("Back".into()),
        });
        view.flush();
        assert!(view.items.is_empty());
        view.push(ViewItem::Banner("x".into()));
        view.clear();
        assert_eq!(view.pending().count(), 0);
        assert_eq!(view.sequence, 3);
    }

    #[test]
    fn sections_group_related_output() {
        assert_eq!(ViewItem::SpecialUsed("x".into()).section(), Section::Combat);
        assert_eq!(ViewItem::Banner("x".into()).section(), Section::Story);
        assert_eq!(
            ViewItem::GameSaved {
                slot: "a".into(),
                path: "b".into()
            }
            .section(),
            Section::System
        );
    }
}
