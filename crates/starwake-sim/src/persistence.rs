//! JSON save files. One file per slot in a caller-chosen directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use starwake_core::state::SaveState;

use crate::error::SimError;

/// Lightweight metadata for listing saves without keeping full state around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMetadata {
    pub slot_name: String,
    pub location: String,
    pub earth_years: f64,
    pub relative_years: f64,
}

pub fn to_json(state: &SaveState) -> Result<String, SimError> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn from_json(json: &str) -> Result<SaveState, SimError> {
    Ok(serde_json::from_str(json)?)
}

pub fn save_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}.json"))
}

pub fn save_to_file(dir: &Path, slot: &str, state: &SaveState) -> Result<PathBuf, SimError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, slot);
    fs::write(&path, to_json(state)?)?;
    log::info!("saved {} to {}", state.location.path(), path.display());
    Ok(path)
}

pub fn load_from_file(dir: &Path, slot: &str) -> Result<SaveState, SimError> {
    let json = fs::read_to_string(save_path(dir, slot))?;
    from_json(&json)
}

/// Saves in `dir`, most travelled first. Unreadable files are skipped.
pub fn list_saves(dir: &Path) -> Vec<SaveMetadata> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut saves = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let Some(slot) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(json) = fs::read_to_string(&path) else {
            continue;
        };
        if let Ok(state) = from_json(&json) {
            let clock = state.clock();
            saves.push(SaveMetadata {
                slot_name: slot.to_string(),
                location: state.location.path(),
                earth_years: clock.earth_years(),
                relative_years: clock.relative_years(),
            });
        }
    }
    saves.sort_by(|a, b| b.earth_years.total_cmp(&a.earth_years));
    saves
}

pub fn delete_save(dir: &Path, slot: &str) -> Result<(), SimError> {
    let path = save_path(dir, slot);
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}
