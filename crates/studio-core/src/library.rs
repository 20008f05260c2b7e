//! Reads material and comparison-card records from JSON files.
//!
//! A path may name a single file holding a JSON array, or a directory whose
//! `*.json` files are read in sorted order and concatenated. A missing path
//! reads as an empty library.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{CompareCard, HotTopic, Material};

#[derive(Debug, Clone, Default)]
pub struct Library {
    pub materials: Vec<Material>,
    pub cards: Vec<CompareCard>,
}

impl Library {
    pub fn load(materials_path: &Path, cards_path: &Path) -> Result<Self> {
        let materials = load_materials(materials_path)?;
        let cards = load_cards(cards_path)?;
        tracing::info!(materials = materials.len(), cards = cards.len(), "library loaded");
        Ok(Self { materials, cards })
    }
}

pub fn load_materials(path: &Path) -> Result<Vec<Material>> {
    load_records(path)
}

pub fn load_cards(path: &Path) -> Result<Vec<CompareCard>> {
    load_records(path)
}

pub fn load_topics(path: &Path) -> Result<Vec<HotTopic>> {
    load_records(path)
}

/// A single hot topic stored as one JSON object.
pub fn load_topic(path: &Path) -> Result<HotTopic> {
    if !path.is_file() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let content = read_file_content(path)?;
    serde_json::from_str(&content).map_err(|source| Error::Parse { path: path.to_path_buf(), source })
}

pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "library path missing, treating as empty");
        return Ok(Vec::new());
    }
    let files = if path.is_dir() { list_json_files(path) } else { vec![path.to_path_buf()] };
    let mut records = Vec::new();
    for (file_index, file_path) in files.iter().enumerate() {
        tracing::debug!(file = %file_path.display(), n = file_index + 1, of = files.len(), "reading records");
        let content = read_file_content(file_path)?;
        let batch: Vec<T> = serde_json::from_str(&content)
            .map_err(|source| Error::Parse { path: file_path.clone(), source })?;
        records.extend(batch);
    }
    tracing::debug!(path = %path.display(), files = files.len(), records = records.len(), "records loaded");
    Ok(records)
}

fn read_file_content(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path).map_err(|source| Error::Io { path: file_path.to_path_buf(), source })?;
    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut json_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .map(|e| e.path().to_path_buf())
        .collect();
    json_files.sort();
    json_files
}
