//! Positions claimed by more than one target. One action yields one outcome on one track, so
//! two targets at the same position cannot both be collected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Target;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub track_id: String,
    pub label: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub position: u32,
    pub entries: Vec<ConflictEntry>,
}

/// Group targets by position and report every group of two or more, ascending by position.
/// Entries keep the order the targets were given in.
pub fn detect_conflicts(targets: &[Target]) -> Vec<Conflict> {
    let mut by_position: BTreeMap<u32, Vec<&Target>> = BTreeMap::new();
    for target in targets {
        by_position.entry(target.position).or_default().push(target);
    }

    by_position
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(position, group)| Conflict {
            position,
            entries: group
                .into_iter()
                .map(|t| ConflictEntry {
                    track_id: t.track_id.clone(),
                    label: t.label.clone(),
                    outcome: t.outcome.clone(),
                })
                .collect(),
        })
        .collect()
}
