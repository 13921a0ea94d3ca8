//! The snapshot file: one user's profile and logged entries.
//!
//! Entries are kept newest first, the order the day view resolves ties in.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tb_core::{BlockDuration, EntryId, TimeEntry, UserProfile};

use crate::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub profile: UserProfile,
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
}

impl Snapshot {
    pub const fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            entries: Vec::new(),
        }
    }

    /// Loads a snapshot, adding any stock categories the profile lacks.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                anyhow::bail!(
                    "No snapshot found at {}. Run 'tb init' first.",
                    path.display()
                );
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let mut snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if snapshot.profile.merge_missing_defaults() {
            tracing::debug!("profile was missing stock categories");
        }
        snapshot.sort_entries();
        tracing::debug!(
            path = %path.display(),
            entries = snapshot.entries.len(),
            categories = snapshot.profile.categories.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Loads the snapshot if present.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Writes the snapshot, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create snapshot directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;

        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, json)
            .with_context(|| format!("failed to write {}", temp.display()))?;
        std::fs::rename(&temp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "saved snapshot");
        Ok(())
    }

    /// The block duration in effect: the config override, else the profile's.
    pub fn block_duration(&self, config: &Config) -> BlockDuration {
        config
            .block_duration
            .unwrap_or(self.profile.time_block_duration)
    }

    /// Inserts `entry`, replacing any entry with the same id.
    pub fn upsert(&mut self, entry: TimeEntry) {
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.sort_entries();
    }

    /// Removes the entry with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        self.entries.len() != before
    }

    fn sort_entries(&mut self) {
        self.entries
            .sort_by(|a, b| b.start_time.cmp(&a.start_time));
    }
}
