//! Target chart planning.
//!
//! Every upgrade action advances one shared global counter, whichever track it is spent on.
//! Recorded positions are taken to be global action counts, so targets from different tracks
//! are compared position by position. The chart lists, for each action from 1 up to the last
//! target, either the track to act on or a free discard action.

pub mod conflict;
pub mod export;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::track::{ResultEntry, Track};
use crate::error::PlanError;

pub use conflict::{detect_conflicts, Conflict, ConflictEntry};

/// Label shown on discard steps.
pub const DISCARD_LABEL: &str = "Any weapon";

/// Charts longer than this are rejected rather than materialised.
pub const MAX_CHART_POSITION: u32 = 100_000;

/// Result rows keyed by owning track id.
pub type ResultsByTrack<E> = HashMap<String, Vec<E>>;

/// The projection of a result row the planner needs. Implemented for [ResultEntry];
/// any other entry shape can be planned by implementing it.
pub trait PlanEntry {
    fn position(&self) -> u32;
    fn is_target(&self) -> bool;
    fn outcome_label(&self) -> String;
}

impl PlanEntry for ResultEntry {
    fn position(&self) -> u32 {
        self.position
    }

    fn is_target(&self) -> bool {
        self.is_target
    }

    fn outcome_label(&self) -> String {
        self.outcome.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub track_id: String,
    /// Track label, e.g. "Fire Dual Blades".
    pub label: String,
    pub position: u32,
    pub outcome: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Target,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStep {
    pub position: u32,
    pub kind: StepKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub steps: Vec<ChartStep>,
    pub conflicts: Vec<Conflict>,
    pub max_index: u32,
}

impl Chart {
    /// True when every target can be collected as planned.
    pub fn is_achievable(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn target_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.kind == StepKind::Target)
            .count()
    }
}

/// Collect every target-flagged entry, tagged with its track. Tracks are visited in the given
/// order and entries in stored order; callers must not depend on that order.
pub fn extract_targets<E: PlanEntry>(tracks: &[Track], results: &ResultsByTrack<E>) -> Vec<Target> {
    let mut targets = Vec::new();
    for track in tracks {
        let Some(entries) = results.get(&track.id) else {
            continue;
        };
        let label = track.label();
        targets.extend(entries.iter().filter(|e| e.is_target()).map(|entry| Target {
            track_id: track.id.clone(),
            label: label.clone(),
            position: entry.position(),
            outcome: entry.outcome_label(),
        }));
    }
    targets
}

fn validate_positions(targets: &[Target]) -> Result<(), PlanError> {
    for target in targets {
        if target.position == 0 {
            return Err(PlanError::InvalidPosition {
                track_id: target.track_id.clone(),
            });
        }
        if target.position > MAX_CHART_POSITION {
            return Err(PlanError::PositionOutOfRange {
                track_id: target.track_id.clone(),
                position: target.position,
                max: MAX_CHART_POSITION,
            });
        }
    }
    Ok(())
}

/// Build the action chart for the given tracks.
///
/// Conflicts do not stop generation: the chart is still produced, with the first extracted
/// target shown at a contested position, and `conflicts` lists every contested position.
pub fn generate_chart<E: PlanEntry>(
    tracks: &[Track],
    results: &ResultsByTrack<E>,
) -> Result<Chart, PlanError> {
    let targets = extract_targets(tracks, results);
    validate_positions(&targets)?;
    if targets.is_empty() {
        return Ok(Chart::default());
    }

    let conflicts = detect_conflicts(&targets);
    let max_index = targets.iter().map(|t| t.position).max().unwrap_or(0);

    let mut first_at: HashMap<u32, &Target> = HashMap::with_capacity(targets.len());
    for target in &targets {
        first_at.entry(target.position).or_insert(target);
    }

    let steps = (1..=max_index)
        .map(|position| match first_at.get(&position) {
            Some(target) => ChartStep {
                position,
                kind: StepKind::Target,
                label: target.label.clone(),
                track_id: Some(target.track_id.clone()),
                outcome: Some(target.outcome.clone()),
            },
            None => ChartStep {
                position,
                kind: StepKind::Discard,
                label: DISCARD_LABEL.to_string(),
                track_id: None,
                outcome: None,
            },
        })
        .collect();

    debug!(
        targets = targets.len(),
        conflicts = conflicts.len(),
        max_index,
        "generated chart"
    );

    Ok(Chart {
        steps,
        conflicts,
        max_index,
    })
}
