use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::data::store::{load_store, TrackStore};
use crate::data::track::{ResultEntry, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Check the invariants the planner relies on: unique ids, no orphan rows, dense 1..N
/// positions per track, outcome shapes that fit the track's mode, one track per
/// weapon × element within a mode.
pub fn validate_store(store: &TrackStore) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_track_ids(&store.tracks, &mut report);

    let mut combos = HashSet::new();
    for track in &store.tracks {
        if !combos.insert((track.mode, track.weapon, track.element)) {
            report.push(
                ValidationSeverity::Warning,
                format!("track {}", track.id),
                format!("{} already tracked in mode {}", track.label(), track.mode),
            );
        }
    }

    let mut result_ids = HashSet::new();
    let mut positions: HashMap<&str, Vec<u32>> = HashMap::new();
    for row in &store.results {
        if !result_ids.insert(row.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("result {}", row.id),
                "duplicate result id",
            );
        }
        let Some(track) = store.track(&row.track_id) else {
            report.push(
                ValidationSeverity::Error,
                format!("result {}", row.id),
                format!("owning track {} does not exist", row.track_id),
            );
            continue;
        };
        let expected = track.mode.outcome_kind();
        if row.outcome.kind() != expected {
            report.push(
                ValidationSeverity::Error,
                format!("result {}", row.id),
                format!(
                    "outcome kind {} does not fit mode {} (expected {})",
                    row.outcome.kind().as_str(),
                    track.mode,
                    expected.as_str()
                ),
            );
        }
        positions.entry(row.track_id.as_str()).or_default().push(row.position);
    }

    for track in &store.tracks {
        let Some(found) = positions.get_mut(track.id.as_str()) else {
            continue;
        };
        found.sort_unstable();
        let dense = found.iter().enumerate().all(|(idx, p)| *p == idx as u32 + 1);
        if !dense {
            report.push(
                ValidationSeverity::Error,
                format!("track {}", track.id),
                format!("positions {found:?} are not exactly 1..={}", found.len()),
            );
        }
    }

    if !store.results.is_empty() && !store.results.iter().any(|r| r.is_target) {
        report.push(
            ValidationSeverity::Info,
            "results",
            "no results are marked as targets",
        );
    }

    report
}

fn check_track_ids(tracks: &[Track], report: &mut ValidationReport) {
    let mut track_ids = HashSet::new();
    for track in tracks {
        if track.id.trim().is_empty() {
            report.push(ValidationSeverity::Error, "tracks", "track with empty id");
        }
        if !track_ids.insert(track.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("track {}", track.id),
                "duplicate track id",
            );
        }
    }
}

/// Checks for a caller-supplied snapshot. Rows may be sparse (only targets, say), but a
/// repeated track id or a position recorded twice in one track would read as the track
/// conflicting with itself.
pub fn validate_snapshot(tracks: &[Track], results: &[ResultEntry]) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_track_ids(tracks, &mut report);

    let mut seen = HashSet::new();
    for row in results {
        if !seen.insert((row.track_id.as_str(), row.position)) {
            report.push(
                ValidationSeverity::Error,
                format!("track {}", row.track_id),
                format!("position {} recorded more than once", row.position),
            );
        }
    }
    report
}

/// Load a store file and validate it. Load failures are reported as a single error diagnostic.
pub fn validate_store_file(path: &str) -> ValidationReport {
    match load_store(path) {
        Ok(store) => validate_store(&store),
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationSeverity::Error, path, err.to_string());
            report
        }
    }
}
