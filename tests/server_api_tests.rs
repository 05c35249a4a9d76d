use std::fs;
use std::path::PathBuf;

use artian::server::routes::route_request;

fn unique_store_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("artian-api-{name}-{}.json", uuid::Uuid::new_v4()))
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let store = unique_store_path("health");
    let response = route_request("GET", "/api/health", "", &store);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn modes_endpoint_lists_all_modes() {
    let store = unique_store_path("modes");
    let response = route_request("GET", "/api/modes", "", &store);
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let ids: Vec<&str> = payload["modes"]
        .as_array()
        .expect("modes should be an array")
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["normal_restore", "gogma_skill", "gogma_restore"]);
}

#[test]
fn track_lifecycle_through_api_builds_chart() {
    let store = unique_store_path("lifecycle");

    let created = route_request(
        "POST",
        "/api/tracks",
        r#"{"mode":"normal_restore","weapon":"dual_blades","element":"fire"}"#,
        &store,
    );
    assert_eq!(created.status_code, 200, "{}", created.body);
    let track_id = json(&created.body)["id"]
        .as_str()
        .expect("id should be returned")
        .to_string();

    for _ in 0..2 {
        let miss = route_request("POST", &format!("/api/tracks/{track_id}/miss"), "", &store);
        assert_eq!(miss.status_code, 200, "{}", miss.body);
    }
    let added = route_request(
        "POST",
        &format!("/api/tracks/{track_id}/results"),
        r#"{"outcome":{"kind":"bonus","bonus_type":"Attack","bonus_value":"EX"},"is_target":true}"#,
        &store,
    );
    assert_eq!(added.status_code, 200, "{}", added.body);

    let listed = route_request("GET", "/api/tracks?mode=normal_restore", "", &store);
    assert_eq!(listed.status_code, 200);
    let listed = json(&listed.body);
    let results = listed["tracks"][0]["results"]
        .as_array()
        .expect("results should be an array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[2]["position"], 3);
    assert_eq!(results[2]["label"], "Attack EX");
    assert_eq!(listed["tracks"][0]["label"], "Fire Dual Blades");

    let chart = route_request("GET", "/api/chart?mode=normal_restore", "", &store);
    assert_eq!(chart.status_code, 200);
    let chart = json(&chart.body);
    assert_eq!(chart["max_index"], 3);
    assert_eq!(chart["steps"][0]["kind"], "discard");
    assert_eq!(chart["steps"][2]["kind"], "target");
    assert_eq!(chart["steps"][2]["track_id"], track_id.as_str());

    let first_miss = results[0]["id"].as_str().expect("result id").to_string();
    let deleted = route_request("DELETE", &format!("/api/results/{first_miss}"), "", &store);
    assert_eq!(deleted.status_code, 200);
    let chart = json(&route_request("GET", "/api/chart?mode=normal_restore", "", &store).body);
    assert_eq!(chart["max_index"], 2);

    let target_id = results[2]["id"].as_str().expect("result id").to_string();
    let toggled = route_request("POST", &format!("/api/results/{target_id}/toggle"), "", &store);
    assert_eq!(json(&toggled.body)["is_target"], false);

    let removed = route_request("DELETE", &format!("/api/tracks/{track_id}"), "", &store);
    assert_eq!(json(&removed.body)["removed_results"], 2);

    let _ = fs::remove_file(store);
}

#[test]
fn inline_snapshot_reports_conflicts() {
    let store = unique_store_path("snapshot");
    let body = r#"{
        "tracks": [
            {"id":"a","mode":"gogma_skill","weapon":"lance","element":"ice","created_at":""},
            {"id":"b","mode":"gogma_skill","weapon":"bow","element":"fire","created_at":""}
        ],
        "results": [
            {"id":"r1","track_id":"a","position":4,"outcome":{"kind":"skill_pair","series_skill":"S","group_skill":"-"},"is_target":true,"created_at":""},
            {"id":"r2","track_id":"b","position":4,"outcome":{"kind":"skill_pair","series_skill":"T","group_skill":"G"},"is_target":true,"created_at":""}
        ]
    }"#;
    let response = route_request("POST", "/api/chart", body, &store);
    assert_eq!(response.status_code, 200, "{}", response.body);
    let chart = json(&response.body);
    assert_eq!(chart["max_index"], 4);
    assert_eq!(chart["conflicts"][0]["position"], 4);
    assert_eq!(chart["conflicts"][0]["entries"][0]["label"], "Ice Lance");
    assert_eq!(chart["conflicts"][0]["entries"][1]["outcome"], "T / G");
    assert_eq!(chart["steps"][3]["kind"], "target");
    assert!(!store.exists(), "inline planning must not write the store");
}

#[test]
fn zero_position_in_snapshot_is_bad_request() {
    let store = unique_store_path("zero");
    let body = r#"{
        "tracks": [{"id":"a","mode":"normal_restore","weapon":"lance","element":"ice","created_at":""}],
        "results": [{"id":"r1","track_id":"a","position":0,"outcome":{"kind":"bonus","bonus_type":"Attack","bonus_value":"Lv1"},"is_target":true,"created_at":""}]
    }"#;
    let response = route_request("POST", "/api/chart", body, &store);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("\"status\": \"error\""));
}

#[test]
fn bad_requests_and_unknown_ids_map_to_status_codes() {
    let store = unique_store_path("errors");

    let missing_mode = route_request("GET", "/api/chart", "", &store);
    assert_eq!(missing_mode.status_code, 400);

    let bad_mode = route_request("GET", "/api/tracks?mode=hyper", "", &store);
    assert_eq!(bad_mode.status_code, 400);

    let bad_body = route_request("POST", "/api/tracks", "{not json", &store);
    assert_eq!(bad_body.status_code, 400);

    let unknown_track = route_request("POST", "/api/tracks/nope/miss", "", &store);
    assert_eq!(unknown_track.status_code, 404);

    let unknown_result = route_request("DELETE", "/api/results/nope", "", &store);
    assert_eq!(unknown_result.status_code, 404);

    let unknown_route = route_request("GET", "/api/nothing", "", &store);
    assert_eq!(unknown_route.status_code, 404);

    let body = r#"{"mode":"gogma_skill","weapon":"bow","element":"ice"}"#;
    assert_eq!(route_request("POST", "/api/tracks", body, &store).status_code, 200);
    let duplicate = route_request("POST", "/api/tracks", body, &store);
    assert_eq!(duplicate.status_code, 400);

    let track_id = json(&route_request("GET", "/api/tracks?mode=gogma_skill", "", &store).body)
        ["tracks"][0]["id"]
        .as_str()
        .expect("track id")
        .to_string();
    let mismatch = route_request(
        "POST",
        &format!("/api/tracks/{track_id}/results"),
        r#"{"outcome":{"kind":"bonus","bonus_type":"Attack","bonus_value":"EX"}}"#,
        &store,
    );
    assert_eq!(mismatch.status_code, 400);

    let cleared = route_request("DELETE", "/api/modes/gogma_skill", "", &store);
    assert_eq!(json(&cleared.body)["removed_tracks"], 1);

    let _ = fs::remove_file(store);
}

#[test]
fn put_result_rewrites_outcome_in_place() {
    let store = unique_store_path("edit");
    let body = r#"{"mode":"normal_restore","weapon":"lance","element":"thunder"}"#;
    let track_id = json(&route_request("POST", "/api/tracks", body, &store).body)["id"]
        .as_str()
        .expect("track id")
        .to_string();
    assert_eq!(
        route_request("POST", &format!("/api/tracks/{track_id}/miss"), "", &store).status_code,
        200
    );
    let added = route_request(
        "POST",
        &format!("/api/tracks/{track_id}/results"),
        r#"{"outcome":{"kind":"bonus","bonus_type":"Attack","bonus_value":"Lv1"},"is_target":true}"#,
        &store,
    );
    let result_id = json(&added.body)["id"].as_str().expect("result id").to_string();

    let edited = route_request(
        "PUT",
        &format!("/api/results/{result_id}"),
        r#"{"outcome":{"kind":"bonus","bonus_type":"Affinity","bonus_value":"EX"}}"#,
        &store,
    );
    assert_eq!(edited.status_code, 200, "{}", edited.body);
    assert_eq!(json(&edited.body)["status"], "ok");

    let listed = json(&route_request("GET", "/api/tracks?mode=normal_restore", "", &store).body);
    let row = &listed["tracks"][0]["results"][1];
    assert_eq!(row["id"], result_id.as_str());
    assert_eq!(row["position"], 2);
    assert_eq!(row["is_target"], true);
    assert_eq!(row["label"], "Affinity EX");

    let wrong_shape = route_request(
        "PUT",
        &format!("/api/results/{result_id}"),
        r#"{"outcome":{"kind":"skill_pair","series_skill":"S","group_skill":"G"}}"#,
        &store,
    );
    assert_eq!(wrong_shape.status_code, 400);

    let unknown = route_request(
        "PUT",
        "/api/results/nope",
        r#"{"outcome":{"kind":"bonus","bonus_type":"Attack","bonus_value":"Lv1"}}"#,
        &store,
    );
    assert_eq!(unknown.status_code, 404);

    let chart = json(&route_request("GET", "/api/chart?mode=normal_restore", "", &store).body);
    assert_eq!(chart["steps"][1]["outcome"], "Affinity EX");

    let _ = fs::remove_file(store);
}

#[test]
fn snapshot_with_repeated_ids_or_positions_is_bad_request() {
    let store = unique_store_path("snapshot-dupes");
    let track = r#"{"id":"a","mode":"normal_restore","weapon":"lance","element":"ice","created_at":""}"#;
    let row = |id: &str, position: u32| {
        format!(
            r#"{{"id":"{id}","track_id":"a","position":{position},"outcome":{{"kind":"bonus","bonus_type":"Attack","bonus_value":"Lv1"}},"is_target":true,"created_at":""}}"#
        )
    };

    let doubled_track = format!(r#"{{"tracks":[{track},{track}],"results":[{}]}}"#, row("r1", 3));
    let response = route_request("POST", "/api/chart", &doubled_track, &store);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("duplicate track id"));

    let doubled_position = format!(
        r#"{{"tracks":[{track}],"results":[{},{}]}}"#,
        row("r1", 3),
        row("r2", 3)
    );
    let response = route_request("POST", "/api/chart", &doubled_position, &store);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("position 3 recorded more than once"));

    let sparse = format!(
        r#"{{"tracks":[{track}],"results":[{},{}]}}"#,
        row("r1", 3),
        row("r2", 7)
    );
    let response = route_request("POST", "/api/chart", &sparse, &store);
    assert_eq!(response.status_code, 200, "{}", response.body);
    assert_eq!(json(&response.body)["max_index"], 7);
}
