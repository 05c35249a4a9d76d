use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::store::{load_store, save_store, TrackStore};
use crate::data::track::{ArtianMode, Element, Outcome, ResultEntry, Track, WeaponType};
use crate::data::validate::validate_snapshot;
use crate::error::{PlanError, StoreError};
use crate::planner::{generate_chart, ResultsByTrack};

/// Serialises load-mutate-save cycles on the store file.
static STORE_MTX: Mutex<()> = Mutex::new(());

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Invalid request body: {0}")]
    Body(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TrackNotFound(_) | StoreError::ResultNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::BadRequest(_) | Self::Plan(_) | Self::Body(_) => (400, "Bad Request"),
            Self::NotFound(_) => (404, "Not Found"),
            Self::Store(StoreError::DuplicateTrack { .. } | StoreError::OutcomeMismatch { .. }) => {
                (400, "Bad Request")
            }
            Self::Store(_) => (500, "Internal Server Error"),
        }
    }
}

fn with_store<T>(
    store_path: &Path,
    f: impl FnOnce(&TrackStore) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let _guard = STORE_MTX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let store = load_store(store_path)?;
    f(&store)
}

fn with_store_mut<T>(
    store_path: &Path,
    f: impl FnOnce(&mut TrackStore) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let _guard = STORE_MTX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut store = load_store(store_path)?;
    let out = f(&mut store)?;
    save_store(store_path, &store)?;
    Ok(out)
}

/// `mode=<id>` from the query string of `path`.
pub fn parse_mode_query(path: &str) -> Result<ArtianMode, ApiError> {
    let query = path.split('?').nth(1).unwrap_or("");
    let raw = query
        .split('&')
        .find_map(|pair| pair.trim().strip_prefix("mode="))
        .ok_or_else(|| ApiError::BadRequest("missing query parameter 'mode'".to_string()))?;
    raw.parse().map_err(ApiError::BadRequest)
}

pub fn health_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "artian-api",
        "version": env!("CARGO_PKG_VERSION")
    }))?)
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeListItem {
    pub id: &'static str,
    pub label: &'static str,
    pub outcome_kind: &'static str,
}

pub fn modes_payload() -> Result<String, ApiError> {
    let modes: Vec<ModeListItem> = ArtianMode::ALL
        .iter()
        .map(|mode| ModeListItem {
            id: mode.as_str(),
            label: mode.label(),
            outcome_kind: mode.outcome_kind().as_str(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "modes": modes }))?)
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    #[serde(flatten)]
    pub track: Track,
    pub label: String,
    pub results: Vec<ResultView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub entry: ResultEntry,
    pub label: String,
}

/// Tracks of one mode, each with its rows in position order.
pub fn track_views(store: &TrackStore, mode: ArtianMode) -> Vec<TrackView> {
    store
        .list_tracks(mode)
        .into_iter()
        .map(|track| TrackView {
            label: track.label(),
            results: store
                .list_results(&track.id)
                .into_iter()
                .map(|entry| ResultView {
                    label: entry.outcome.label(),
                    entry: entry.clone(),
                })
                .collect(),
            track: track.clone(),
        })
        .collect()
}

pub fn tracks_payload(store_path: &Path, path: &str) -> Result<String, ApiError> {
    let mode = parse_mode_query(path)?;
    with_store(store_path, |store| {
        let tracks = track_views(store, mode);
        Ok(serde_json::to_string_pretty(
            &serde_json::json!({ "mode": mode, "tracks": tracks }),
        )?)
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTrackRequest {
    pub mode: ArtianMode,
    pub weapon: WeaponType,
    pub element: Element,
}

pub fn add_track_payload(store_path: &Path, body: &str) -> Result<String, ApiError> {
    let request: AddTrackRequest = serde_json::from_str(body)?;
    let id = with_store_mut(store_path, |store| {
        Ok(store.add_track(request.mode, request.weapon, request.element)?)
    })?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "ok", "id": id }))?)
}

pub fn delete_track_payload(store_path: &Path, track_id: &str) -> Result<String, ApiError> {
    let removed = with_store_mut(store_path, |store| Ok(store.delete_track(track_id)?))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "removed_results": removed
    }))?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddResultRequest {
    pub outcome: Outcome,
    #[serde(default)]
    pub is_target: bool,
}

pub fn add_result_payload(store_path: &Path, track_id: &str, body: &str) -> Result<String, ApiError> {
    let request: AddResultRequest = serde_json::from_str(body)?;
    let id = with_store_mut(store_path, |store| {
        Ok(store.add_result(track_id, request.outcome, request.is_target)?)
    })?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "ok", "id": id }))?)
}

pub fn add_miss_payload(store_path: &Path, track_id: &str) -> Result<String, ApiError> {
    let id = with_store_mut(store_path, |store| Ok(store.add_miss(track_id)?))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "ok", "id": id }))?)
}

pub fn toggle_target_payload(store_path: &Path, result_id: &str) -> Result<String, ApiError> {
    let is_target = with_store_mut(store_path, |store| Ok(store.toggle_target(result_id)?))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "is_target": is_target
    }))?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOutcomeRequest {
    pub outcome: Outcome,
}

pub fn update_outcome_payload(
    store_path: &Path,
    result_id: &str,
    body: &str,
) -> Result<String, ApiError> {
    let request: UpdateOutcomeRequest = serde_json::from_str(body)?;
    with_store_mut(store_path, |store| {
        Ok(store.update_outcome(result_id, request.outcome)?)
    })?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "ok" }))?)
}

pub fn delete_result_payload(store_path: &Path, result_id: &str) -> Result<String, ApiError> {
    with_store_mut(store_path, |store| Ok(store.delete_result(result_id)?))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "ok" }))?)
}

pub fn clear_mode_payload(store_path: &Path, mode: &str) -> Result<String, ApiError> {
    let mode: ArtianMode = mode.parse().map_err(ApiError::NotFound)?;
    let removed = with_store_mut(store_path, |store| Ok(store.clear_mode(mode)))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "removed_tracks": removed
    }))?)
}

pub fn chart_payload(store_path: &Path, path: &str) -> Result<String, ApiError> {
    let mode = parse_mode_query(path)?;
    let chart = with_store(store_path, |store| Ok(store.chart(mode)?))?;
    Ok(serde_json::to_string_pretty(&chart)?)
}

/// Inline snapshot for planning without touching the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

pub fn chart_from_snapshot_payload(body: &str) -> Result<String, ApiError> {
    let request: ChartRequest = serde_json::from_str(body)?;
    let report = validate_snapshot(&request.tracks, &request.results);
    if report.has_errors() {
        let messages: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
        return Err(ApiError::BadRequest(messages.join("; ")));
    }
    let mut by_track: ResultsByTrack<ResultEntry> = ResultsByTrack::new();
    for entry in request.results {
        by_track.entry(entry.track_id.clone()).or_default().push(entry);
    }
    debug!(
        tracks = request.tracks.len(),
        with_results = by_track.len(),
        "planning inline snapshot"
    );
    let chart = generate_chart(&request.tracks, &by_track)?;
    Ok(serde_json::to_string_pretty(&chart)?)
}
