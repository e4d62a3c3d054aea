//! Flat `KEY=value` save-file codec.
//!
//! A save file is a list of scalar lines followed by an item section framed
//! by [`ITEMS_BEGIN`] and [`ITEMS_END`]. Each item line has five `;`-separated
//! fields: `name;description;EFFECT;quantity;value`.
//!
//! Parsing is tolerant: unknown keys, unparsable scalar values and malformed
//! item lines are skipped. The only fatal condition is a missing or
//! unrecognized class tag.

use std::fmt::Write as _;

use thiserror::Error;

use crate::defs::{EffectKind, HeroClass, ItemDef, SaveDef};

pub const KEY_CLASS: &str = "CLASSE";
pub const KEY_NAME: &str = "NOME";
pub const KEY_LEVEL: &str = "NIVEL";
pub const KEY_CURRENT_HP: &str = "HP_ATUAL";
pub const KEY_MAX_HP: &str = "HP_MAX";
pub const KEY_ATTACK: &str = "ATAQUE";
pub const KEY_DEFENSE: &str = "DEFESA";
pub const KEY_XP: &str = "XP_ATUAL";
pub const KEY_XP_NEXT: &str = "XP_PROX";
pub const KEY_CHAPTER: &str = "CAPITULO";
pub const KEY_EXPLORATIONS: &str = "EXPLORACOES";
pub const KEY_BOSS_DEFEATED: &str = "BOSS_DERROTADO";
pub const ITEMS_BEGIN: &str = "ITENS_INICIO";
pub const ITEMS_END: &str = "ITENS_FIM";

const ITEM_FIELDS: usize = 5;

/// Reasons a save file cannot be turned into a [`SaveDef`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("save file has no {KEY_CLASS}= line")]
    MissingClass,
    #[error("unrecognized class tag '{0}'")]
    UnknownClass(String),
}

/// Render a save record in the flat text format.
pub fn to_save_text(def: &SaveDef) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: &dyn std::fmt::Display| {
        // writing into a String cannot fail
        let _ = writeln!(out, "{key}={value}");
    };
    line(KEY_CLASS, &def.class.tag());
    line(KEY_NAME, &clean_scalar(&def.name));
    line(KEY_LEVEL, &def.level);
    line(KEY_CURRENT_HP, &def.current_hp);
    line(KEY_MAX_HP, &def.max_hp);
    line(KEY_ATTACK, &def.attack);
    line(KEY_DEFENSE, &def.defense);
    line(KEY_XP, &def.xp);
    line(KEY_XP_NEXT, &def.xp_next);
    line(KEY_CHAPTER, &def.chapter);
    line(KEY_EXPLORATIONS, &def.explorations);
    line(KEY_BOSS_DEFEATED, &def.boss_defeated);

    out.push_str(ITEMS_BEGIN);
    out.push('\n');
    for item in &def.items {
        let _ = writeln!(
            out,
            "{};{};{};{};{}",
            clean_field(&item.name),
            clean_field(&item.description),
            item.effect.symbol(),
            item.quantity,
            item.value
        );
    }
    out.push_str(ITEMS_END);
    out.push('\n');
    out
}

/// Parse the flat text format into a save record.
///
/// # Errors
/// - [`SaveError::MissingClass`] if no class line is present
/// - [`SaveError::UnknownClass`] if the class tag is not recognized
pub fn parse_save(text: &str) -> Result<SaveDef, SaveError> {
    let mut class_tag: Option<String> = None;
    let mut scratch = SaveDef::with_class(HeroClass::Warrior);
    let mut in_items = false;

    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        if line.trim() == ITEMS_BEGIN {
            in_items = true;
            continue;
        }
        if line.trim() == ITEMS_END {
            in_items = false;
            continue;
        }

        if in_items {
            if let Some(item) = parse_item_line(line) {
                scratch.items.push(item);
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            KEY_CLASS => class_tag = Some(value.to_string()),
            KEY_NAME => scratch.name = value.to_string(),
            KEY_LEVEL => set_number(&mut scratch.level, value),
            KEY_CURRENT_HP => set_number(&mut scratch.current_hp, value),
            KEY_MAX_HP => set_number(&mut scratch.max_hp, value),
            KEY_ATTACK => set_number(&mut scratch.attack, value),
            KEY_DEFENSE => set_number(&mut scratch.defense, value),
            KEY_XP => set_number(&mut scratch.xp, value),
            KEY_XP_NEXT => set_number(&mut scratch.xp_next, value),
            KEY_CHAPTER => set_number(&mut scratch.chapter, value),
            KEY_EXPLORATIONS => set_number(&mut scratch.explorations, value),
            KEY_BOSS_DEFEATED => scratch.boss_defeated = value.eq_ignore_ascii_case("true"),
            _ => {},
        }
    }

    let tag = class_tag.ok_or(SaveError::MissingClass)?;
    scratch.class = HeroClass::from_tag(&tag).ok_or(SaveError::UnknownClass(tag))?;
    Ok(scratch)
}

/// Parse one item line; `None` if the line is malformed in any way.
pub fn parse_item_line(line: &str) -> Option<ItemDef> {
    let parts: Vec<&str> = line.split(';').collect();
    if parts.len() != ITEM_FIELDS {
        return None;
    }
    Some(ItemDef {
        name: parts[0].to_string(),
        description: parts[1].to_string(),
        effect: EffectKind::from_symbol(parts[2])?,
        quantity: parts[3].trim().parse().ok()?,
        value: parts[4].trim().parse().ok()?,
    })
}

/// Leaves `slot` untouched when `value` does not parse.
fn set_number(slot: &mut u32, value: &str) {
    if let Ok(parsed) = value.parse() {
        *slot = parsed;
    }
}

fn clean_scalar(raw: &str) -> String {
    raw.replace(['\n', '\r'], " ")
}

fn clean_field(raw: &str) -> String {
    raw.replace(['\n', '\r'], " ").replace(';', ",")
}
