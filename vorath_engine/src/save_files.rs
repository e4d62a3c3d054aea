//! Save-game discovery and serialization helpers.
//!
//! Each slot is one `<slot>.txt` file in the save directory, written in the
//! flat format defined by `vorath_data`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use vorath_data::{parse_save, to_save_text};

use crate::session::{GameSession, RestoredSession};
use crate::slug::sanitize_slot_name;

pub const SAVE_DIR: &str = "saved_games";
pub const SAVE_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub slot: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

/// List the save slots in `dir`, sorted by name ignoring case.
///
/// A missing directory simply has no slots.
///
/// # Errors
/// Returns an error if the directory exists but cannot be read.
pub fn collect_save_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| {
        a.slot
            .to_lowercase()
            .cmp(&b.slot.to_lowercase())
            .then_with(|| a.slot.cmp(&b.slot))
    });
    Ok(slots)
}

/// Path of the file backing `slot_name` in `dir`.
///
/// # Errors
/// Returns an error if the name has no usable characters.
pub fn slot_path(dir: &Path, slot_name: &str) -> Result<PathBuf> {
    let slug = sanitize_slot_name(slot_name).ok_or_else(|| anyhow!("invalid save name '{}'", slot_name.trim()))?;
    Ok(dir.join(format!("{slug}.{SAVE_EXTENSION}")))
}

/// Write `session` to the slot called `slot_name`, creating `dir` if needed.
///
/// # Errors
/// Returns an error if the name is unusable, the session cannot be saved or
/// the file cannot be written.
pub fn write_save(dir: &Path, slot_name: &str, session: &GameSession) -> Result<PathBuf> {
    let path = slot_path(dir, slot_name)?;
    let def = session.to_save_def()?;
    fs::create_dir_all(dir).with_context(|| format!("creating save directory {}", dir.display()))?;
    fs::write(&path, to_save_text(&def)).with_context(|| format!("writing save file {}", path.display()))?;
    info!("saved '{}' to {}", def.name, path.display());
    Ok(path)
}

/// Read and rebuild a session from a save file.
///
/// # Errors
/// Returns an error if the file cannot be read, lacks a valid class tag or
/// describes an unplayable character.
pub fn load_save_file(path: &Path, capacity: usize) -> Result<RestoredSession> {
    let text = fs::read_to_string(path).with_context(|| format!("reading save file {}", path.display()))?;
    let def = parse_save(&text).with_context(|| format!("parsing save file {}", path.display()))?;
    let restored =
        GameSession::from_save_def(&def, capacity).with_context(|| format!("restoring save file {}", path.display()))?;
    if !restored.skipped_items.is_empty() {
        warn!(
            "{} item stack(s) skipped while loading {}",
            restored.skipped_items.len(),
            path.display()
        );
    }
    info!("loaded '{}' from {}", def.name, path.display());
    Ok(restored)
}

/// Human friendly age of a save file.
pub fn format_modified(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(delta) => format_duration(delta),
        Err(_) => "in the future".to_string(),
    }
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_EXTENSION) {
        return None;
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?.to_string();
    let slot = path.file_stem().and_then(|stem| stem.to_str())?.to_string();
    if slot.is_empty() {
        return None;
    }
    let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
    Some(SaveSlot {
        slot,
        path,
        file_name,
        modified,
    })
}

/// Coarsest unit first; each entry is (seconds per unit, suffix).
const AGE_UNITS: [(u64, &str); 7] = [
    (365 * 86_400, "y"),
    (30 * 86_400, "mo"),
    (7 * 86_400, "w"),
    (86_400, "d"),
    (3_600, "h"),
    (60, "m"),
    (1, "s"),
];

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 30 {
        return "just now".to_string();
    }
    AGE_UNITS
        .iter()
        .find(|(unit, _)| secs >= *unit)
        .map_or_else(|| "just now".to_string(), |(unit, suffix)| format!("{}{suffix} ago", secs / unit))
}
