//! Persistent key-value store for the last submitted form.
//!
//! The store is a flat JSON object of string values kept in one file. The form
//! is saved under three keys (`title`, `data`, `source`) on every successful
//! submit, next to the side labels it was drawn with (`side_a`, `side_b`), and
//! read back once at start-up. No expiry, no versioning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::SideLabels;

pub const KEY_TITLE: &str = "title";
pub const KEY_DATA: &str = "data";
pub const KEY_SOURCE: &str = "source";
pub const KEY_SIDE_A: &str = "side_a";
pub const KEY_SIDE_B: &str = "side_b";

/// The three form fields, exactly as entered. `data` is the raw JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub title: String,
    pub data: String,
    pub source: String,
}

/// A JSON-file backed string map.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/pyramid-rs/state.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pyramid-rs").join("state.json"))
    }

    /// Store at [`StateStore::default_path`], falling back to the working directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_path().unwrap_or_else(|| PathBuf::from("pyramid-state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("parsing state file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => {
                Err(e).with_context(|| format!("reading state file {}", self.path.display()))
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating state directory {}", dir.display()))?;
        // Write to a sibling temp file, then rename over the old state.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        let s = serde_json::to_string_pretty(map)?;
        tmp.write_all(s.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("saving state file {}", self.path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    /// The saved form, or `None` when no title/data pair has been saved yet.
    pub fn load(&self) -> Result<Option<PersistedState>> {
        let mut map = self.read_map()?;
        let title = map.remove(KEY_TITLE).unwrap_or_default();
        let data = map.remove(KEY_DATA).unwrap_or_default();
        if title.is_empty() || data.is_empty() {
            return Ok(None);
        }
        let source = map.remove(KEY_SOURCE).unwrap_or_default();
        Ok(Some(PersistedState {
            title,
            data,
            source,
        }))
    }

    /// Side labels saved with the last chart, if both were saved.
    pub fn load_labels(&self) -> Result<Option<SideLabels>> {
        let mut map = self.read_map()?;
        match (map.remove(KEY_SIDE_A), map.remove(KEY_SIDE_B)) {
            (Some(a), Some(b)) => Ok(Some(SideLabels { a, b })),
            _ => Ok(None),
        }
    }

    /// Save all three fields in one write. Other keys in the file are kept.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        self.save_with_labels(state, None)
    }

    /// Save the form and, when given, the side labels it was drawn with.
    pub fn save_with_labels(
        &self,
        state: &PersistedState,
        labels: Option<&SideLabels>,
    ) -> Result<()> {
        let mut map = self.read_map().unwrap_or_else(|e| {
            log::warn!("discarding unreadable state: {e:#}");
            BTreeMap::new()
        });
        map.insert(KEY_TITLE.into(), state.title.clone());
        map.insert(KEY_DATA.into(), state.data.clone());
        map.insert(KEY_SOURCE.into(), state.source.clone());
        if let Some(labels) = labels {
            map.insert(KEY_SIDE_A.into(), labels.a.clone());
            map.insert(KEY_SIDE_B.into(), labels.b.clone());
        }
        self.write_map(&map)?;
        log::info!("saved chart inputs to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_means_no_state() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nope.json"));
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.get(KEY_TITLE).unwrap(), None);
    }

    #[test]
    fn single_keys_round_trip() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nested").join("state.json"));
        store.set(KEY_SOURCE, "UN").unwrap();
        assert_eq!(store.get(KEY_SOURCE).unwrap().as_deref(), Some("UN"));
        // title/data still missing
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn labels_are_kept_next_to_the_form() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let state = PersistedState {
            title: "t".into(),
            data: "[]".into(),
            source: String::new(),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load_labels().unwrap(), None);

        let labels = SideLabels {
            a: "Urban".into(),
            b: "Rural".into(),
        };
        store.save_with_labels(&state, Some(&labels)).unwrap();
        // a plain save leaves the labels in place
        store.save(&state).unwrap();
        assert_eq!(store.load_labels().unwrap(), Some(labels));
        assert_eq!(store.load().unwrap(), Some(state));
    }
}
