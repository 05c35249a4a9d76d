//! Track store: the recorded tracks and their result rows, persisted as one JSON file.
//!
//! Positions are never patched incrementally. After any structural change to a track's rows
//! they are re-derived from the current order by [renumber_positions].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::data::track::{ArtianMode, Element, Outcome, ResultEntry, Track, WeaponType};
use crate::error::{PlanError, StoreError};
use crate::planner::{generate_chart, Chart, ResultsByTrack};

pub const DEFAULT_STORE_PATH: &str = "data/artian.json";
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStore {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Stable-sort rows by their prior position and reassign 1..=len.
pub fn renumber_positions(rows: &mut [ResultEntry]) {
    rows.sort_by_key(|row| row.position);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.position = idx as u32 + 1;
    }
}

impl TrackStore {
    pub fn new() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            ..Self::default()
        }
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Tracks of `mode`, in creation order.
    pub fn list_tracks(&self, mode: ArtianMode) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.mode == mode).collect()
    }

    /// Rows of one track, ordered by position.
    pub fn list_results(&self, track_id: &str) -> Vec<&ResultEntry> {
        let mut rows: Vec<&ResultEntry> = self
            .results
            .iter()
            .filter(|r| r.track_id == track_id)
            .collect();
        rows.sort_by_key(|r| r.position);
        rows
    }

    pub fn add_track(
        &mut self,
        mode: ArtianMode,
        weapon: WeaponType,
        element: Element,
    ) -> Result<String, StoreError> {
        if self
            .tracks
            .iter()
            .any(|t| t.mode == mode && t.weapon == weapon && t.element == element)
        {
            return Err(StoreError::DuplicateTrack {
                mode: mode.to_string(),
                label: format!("{} {}", element.label(), weapon.label()),
            });
        }
        let track = Track {
            id: new_id(),
            mode,
            weapon,
            element,
            created_at: timestamp(),
        };
        info!(track_id = %track.id, %mode, label = %track.label(), "added track");
        let id = track.id.clone();
        self.tracks.push(track);
        Ok(id)
    }

    /// Removes the track and all of its rows; returns how many rows went with it.
    pub fn delete_track(&mut self, track_id: &str) -> Result<usize, StoreError> {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        if self.tracks.len() == before {
            return Err(StoreError::TrackNotFound(track_id.to_string()));
        }
        let rows_before = self.results.len();
        self.results.retain(|r| r.track_id != track_id);
        let removed = rows_before - self.results.len();
        info!(track_id, removed_results = removed, "deleted track");
        Ok(removed)
    }

    /// Appends a row after the track's current last position.
    pub fn add_result(
        &mut self,
        track_id: &str,
        outcome: Outcome,
        is_target: bool,
    ) -> Result<String, StoreError> {
        let mode = self
            .track(track_id)
            .map(|t| t.mode)
            .ok_or_else(|| StoreError::TrackNotFound(track_id.to_string()))?;
        let expected = mode.outcome_kind();
        if outcome.kind() != expected {
            return Err(StoreError::OutcomeMismatch {
                mode: mode.to_string(),
                expected: expected.as_str(),
                found: outcome.kind().as_str(),
            });
        }

        let position = self
            .results
            .iter()
            .filter(|r| r.track_id == track_id)
            .map(|r| r.position)
            .max()
            .unwrap_or(0)
            + 1;
        let entry = ResultEntry {
            id: new_id(),
            track_id: track_id.to_string(),
            position,
            outcome,
            is_target,
            created_at: timestamp(),
        };
        info!(track_id, result_id = %entry.id, position, is_target, "added result");
        let id = entry.id.clone();
        self.results.push(entry);
        Ok(id)
    }

    /// Appends a non-target row carrying the mode's miss outcome.
    pub fn add_miss(&mut self, track_id: &str) -> Result<String, StoreError> {
        let mode = self
            .track(track_id)
            .map(|t| t.mode)
            .ok_or_else(|| StoreError::TrackNotFound(track_id.to_string()))?;
        self.add_result(track_id, Outcome::miss(mode), false)
    }

    /// Flips the target flag and returns its new value.
    pub fn toggle_target(&mut self, result_id: &str) -> Result<bool, StoreError> {
        let entry = self
            .results
            .iter_mut()
            .find(|r| r.id == result_id)
            .ok_or_else(|| StoreError::ResultNotFound(result_id.to_string()))?;
        entry.is_target = !entry.is_target;
        info!(result_id, is_target = entry.is_target, "toggled target");
        Ok(entry.is_target)
    }

    pub fn result(&self, result_id: &str) -> Option<&ResultEntry> {
        self.results.iter().find(|r| r.id == result_id)
    }

    /// Replaces a row's outcome in place. Position and target flag are untouched.
    pub fn update_outcome(&mut self, result_id: &str, outcome: Outcome) -> Result<(), StoreError> {
        let track_id = self
            .result(result_id)
            .map(|r| r.track_id.clone())
            .ok_or_else(|| StoreError::ResultNotFound(result_id.to_string()))?;
        let mode = self
            .track(&track_id)
            .map(|t| t.mode)
            .ok_or_else(|| StoreError::TrackNotFound(track_id.clone()))?;
        let expected = mode.outcome_kind();
        if outcome.kind() != expected {
            return Err(StoreError::OutcomeMismatch {
                mode: mode.to_string(),
                expected: expected.as_str(),
                found: outcome.kind().as_str(),
            });
        }
        if let Some(entry) = self.results.iter_mut().find(|r| r.id == result_id) {
            info!(result_id, track_id = %track_id, label = %outcome.label(), "updated outcome");
            entry.outcome = outcome;
        }
        Ok(())
    }

    /// Removes one row and renumbers the rest of its track to 1..=M.
    pub fn delete_result(&mut self, result_id: &str) -> Result<(), StoreError> {
        let idx = self
            .results
            .iter()
            .position(|r| r.id == result_id)
            .ok_or_else(|| StoreError::ResultNotFound(result_id.to_string()))?;
        let removed = self.results.remove(idx);

        let (mut same_track, others): (Vec<ResultEntry>, Vec<ResultEntry>) = self
            .results
            .drain(..)
            .partition(|r| r.track_id == removed.track_id);
        renumber_positions(&mut same_track);
        self.results = others;
        self.results.extend(same_track);

        info!(
            result_id,
            track_id = %removed.track_id,
            position = removed.position,
            "deleted result"
        );
        Ok(())
    }

    /// Removes every track of `mode` with its rows; returns the number of tracks removed.
    pub fn clear_mode(&mut self, mode: ArtianMode) -> usize {
        let doomed: Vec<String> = self
            .tracks
            .iter()
            .filter(|t| t.mode == mode)
            .map(|t| t.id.clone())
            .collect();
        self.tracks.retain(|t| t.mode != mode);
        self.results.retain(|r| !doomed.contains(&r.track_id));
        info!(%mode, removed_tracks = doomed.len(), "cleared mode");
        doomed.len()
    }

    /// Owned copy of one mode's tracks and rows, in the shape the planner consumes.
    pub fn snapshot(&self, mode: ArtianMode) -> (Vec<Track>, ResultsByTrack<ResultEntry>) {
        let tracks: Vec<Track> = self.list_tracks(mode).into_iter().cloned().collect();
        let mut results = ResultsByTrack::with_capacity(tracks.len());
        for track in &tracks {
            let rows = self.list_results(&track.id).into_iter().cloned().collect();
            results.insert(track.id.clone(), rows);
        }
        (tracks, results)
    }

    pub fn chart(&self, mode: ArtianMode) -> Result<Chart, PlanError> {
        let (tracks, results) = self.snapshot(mode);
        generate_chart(&tracks, &results)
    }
}

/// Load the store from JSON. A missing file is an empty store.
pub fn load_store(path: impl AsRef<Path>) -> Result<TrackStore, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(TrackStore::new());
    }
    let raw = fs::read_to_string(path)?;
    let store: TrackStore = serde_json::from_str(&raw)?;
    Ok(store)
}

pub fn save_store(path: impl AsRef<Path>, store: &TrackStore) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(store)?;
    fs::write(path, payload)?;
    Ok(())
}
