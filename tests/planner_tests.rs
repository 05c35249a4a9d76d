use artian::data::track::{ArtianMode, Element, Outcome, ResultEntry, Track, WeaponType};
use artian::data::TrackStore;
use artian::planner::{
    detect_conflicts, extract_targets, generate_chart, Chart, ResultsByTrack, StepKind,
    DISCARD_LABEL,
};

const MODE: ArtianMode = ArtianMode::GogmaRestore;

/// Add a track whose only target sits at `position`, preceded by misses.
fn track_with_target(store: &mut TrackStore, weapon: WeaponType, element: Element, position: u32) -> String {
    let track = store.add_track(MODE, weapon, element).expect("track should be added");
    for _ in 1..position {
        store.add_miss(&track).expect("miss should be added");
    }
    store
        .add_result(&track, Outcome::for_mode(MODE, "Attack", "EX"), true)
        .expect("target should be added");
    track
}

fn chart(store: &TrackStore) -> Chart {
    store.chart(MODE).expect("chart should build")
}

#[test]
fn no_targets_yields_empty_chart() {
    let mut store = TrackStore::new();
    let track = store
        .add_track(MODE, WeaponType::Hammer, Element::Water)
        .expect("track should be added");
    for _ in 0..5 {
        store.add_miss(&track).expect("miss should be added");
    }

    let chart = chart(&store);
    assert_eq!(chart, Chart::default());
    assert!(chart.steps.is_empty());
    assert!(chart.conflicts.is_empty());
    assert_eq!(chart.max_index, 0);
}

#[test]
fn empty_input_yields_empty_chart() {
    let results: ResultsByTrack<ResultEntry> = ResultsByTrack::new();
    let chart = generate_chart(&[], &results).expect("chart should build");
    assert_eq!(chart.max_index, 0);
    assert!(chart.steps.is_empty());
}

#[test]
fn separate_positions_plan_without_conflicts() {
    let mut store = TrackStore::new();
    let a = track_with_target(&mut store, WeaponType::DualBlades, Element::Fire, 4);
    let b = track_with_target(&mut store, WeaponType::Bow, Element::Ice, 6);

    let chart = chart(&store);
    assert_eq!(chart.max_index, 6);
    assert_eq!(chart.steps.len(), 6);
    assert!(chart.conflicts.is_empty());
    assert!(chart.is_achievable());

    for idx in [0, 1, 2, 4] {
        assert_eq!(chart.steps[idx].kind, StepKind::Discard);
        assert_eq!(chart.steps[idx].label, DISCARD_LABEL);
        assert!(chart.steps[idx].track_id.is_none());
    }
    assert_eq!(chart.steps[3].kind, StepKind::Target);
    assert_eq!(chart.steps[3].track_id.as_deref(), Some(a.as_str()));
    assert_eq!(chart.steps[3].label, "Fire Dual Blades");
    assert_eq!(chart.steps[3].outcome.as_deref(), Some("Attack EX"));
    assert_eq!(chart.steps[5].kind, StepKind::Target);
    assert_eq!(chart.steps[5].track_id.as_deref(), Some(b.as_str()));
    assert_eq!(chart.steps[5].label, "Ice Bow");
}

#[test]
fn shared_position_is_reported_and_still_planned() {
    let mut store = TrackStore::new();
    let a = track_with_target(&mut store, WeaponType::Lance, Element::Thunder, 4);
    let b = track_with_target(&mut store, WeaponType::Gunlance, Element::Dragon, 4);

    let chart = chart(&store);
    assert_eq!(chart.max_index, 4);
    assert_eq!(chart.conflicts.len(), 1);
    let conflict = &chart.conflicts[0];
    assert_eq!(conflict.position, 4);
    let labels: Vec<&str> = conflict.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Thunder Lance", "Dragon Gunlance"]);
    assert_eq!(conflict.entries[0].track_id, a);
    assert_eq!(conflict.entries[1].track_id, b);

    assert_eq!(chart.steps[3].kind, StepKind::Target);
    assert_eq!(chart.steps[3].track_id.as_deref(), Some(a.as_str()));
}

#[test]
fn conflict_detection_is_exact() {
    let mut store = TrackStore::new();
    track_with_target(&mut store, WeaponType::Hammer, Element::Fire, 3);
    track_with_target(&mut store, WeaponType::Bow, Element::Fire, 3);
    track_with_target(&mut store, WeaponType::Lance, Element::Fire, 5);

    let (tracks, results) = store.snapshot(MODE);
    let targets = extract_targets(&tracks, &results);
    let mut positions: Vec<u32> = targets.iter().map(|t| t.position).collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![3, 3, 5]);

    let conflicts = detect_conflicts(&targets);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].position, 3);
    assert_eq!(conflicts[0].entries.len(), 2);
}

#[test]
fn steps_are_dense_and_one_based() {
    let mut store = TrackStore::new();
    track_with_target(&mut store, WeaponType::ChargeBlade, Element::Paralysis, 2);
    track_with_target(&mut store, WeaponType::SwitchAxe, Element::Raw, 9);
    track_with_target(&mut store, WeaponType::HuntingHorn, Element::Water, 7);

    let chart = chart(&store);
    assert_eq!(chart.steps.len(), chart.max_index as usize);
    for (idx, step) in chart.steps.iter().enumerate() {
        assert_eq!(step.position, idx as u32 + 1);
    }
    assert_eq!(chart.target_count(), 3);
}

#[test]
fn every_target_position_carries_its_target() {
    let mut store = TrackStore::new();
    let track = store
        .add_track(MODE, WeaponType::InsectGlaive, Element::Ice)
        .expect("track should be added");
    for (value, is_target) in [("Lv1", false), ("Lv2", true), ("Lv3", false), ("EX", true)] {
        store
            .add_result(&track, Outcome::for_mode(MODE, "Element", value), is_target)
            .expect("result should be added");
    }

    let chart = chart(&store);
    assert!(chart.conflicts.is_empty());
    assert_eq!(chart.steps[1].outcome.as_deref(), Some("Element Lv2"));
    assert_eq!(chart.steps[3].outcome.as_deref(), Some("Element EX"));
    assert_eq!(chart.steps[2].kind, StepKind::Discard);
}

#[test]
fn repeated_generation_is_identical() {
    let mut store = TrackStore::new();
    track_with_target(&mut store, WeaponType::GreatSword, Element::Fire, 5);
    track_with_target(&mut store, WeaponType::LongSword, Element::Fire, 5);
    track_with_target(&mut store, WeaponType::Bow, Element::Fire, 2);

    let first = chart(&store);
    let second = chart(&store);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("chart should serialize"),
        serde_json::to_string(&second).expect("chart should serialize")
    );
}

#[test]
fn positions_are_compared_across_tracks_as_global_counts() {
    // Track-local positions are taken at face value, even when other tracks were used in between.
    let track = |id: &str, weapon| Track {
        id: id.to_string(),
        mode: MODE,
        weapon,
        element: Element::Water,
        created_at: String::new(),
    };
    let entry = |id: &str, track_id: &str, position| ResultEntry {
        id: id.to_string(),
        track_id: track_id.to_string(),
        position,
        outcome: Outcome::for_mode(MODE, "Affinity", "Lv3"),
        is_target: true,
        created_at: String::new(),
    };
    let tracks = vec![track("a", WeaponType::Bow), track("b", WeaponType::Lance)];
    let mut results = ResultsByTrack::new();
    results.insert("a".to_string(), vec![entry("r1", "a", 1)]);
    results.insert("b".to_string(), vec![entry("r2", "b", 1)]);

    let chart = generate_chart(&tracks, &results).expect("chart should build");
    assert_eq!(chart.max_index, 1);
    assert_eq!(chart.conflicts.len(), 1);
}
