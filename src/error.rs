//! Error types for the planner, the track store and configuration loading.

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Target in track {track_id} has position 0; positions are 1-based")]
    InvalidPosition { track_id: String },

    #[error("Target in track {track_id} has position {position}, above the chart limit of {max}")]
    PositionOutOfRange {
        track_id: String,
        position: u32,
        max: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Result not found: {0}")]
    ResultNotFound(String),

    #[error("Track already exists for {label} in mode {mode}")]
    DuplicateTrack { mode: String, label: String },

    #[error("Outcome kind {found} does not fit mode {mode} (expected {expected})")]
    OutcomeMismatch {
        mode: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}
