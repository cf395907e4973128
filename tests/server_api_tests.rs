mod common;

use common::registry;
use illuvilytics::server::routes::route_request;

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request("GET", "/api/health", "", &registry());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn illuvials_endpoint_lists_catalog_with_labels() {
    let response = route_request("GET", "/api/illuvials", "", &registry());
    assert_eq!(response.status_code, 200);

    let payload = json(&response.body);
    let list = payload["illuvials"].as_array().expect("illuvials should be an array");
    assert_eq!(list.len(), 12);
    let tide = list
        .iter()
        .find(|item| item["id"] == "tide")
        .expect("tide should be listed");
    assert_eq!(tide["affinity_label"], "Water + Air");
    assert_eq!(tide["class_label"], "Psion + Rogue");
    let myst = list.iter().find(|item| item["id"] == "myst").unwrap();
    assert_eq!(myst["affinity_label"], "Unknown");
}

#[test]
fn label_endpoint_resolves_by_display_name() {
    let response = route_request("GET", "/api/label?name=Steamback", "", &registry());
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["found"], true);
    assert_eq!(payload["affinity_label"], "Fire + Water");
    assert_eq!(payload["class_label"], "Bulwark");

    let unknown = json(&route_request("GET", "/api/label?name=Nobody", "", &registry()).body);
    assert_eq!(unknown["found"], false);
    assert_eq!(unknown["affinity_label"], "Unknown");
}

#[test]
fn label_endpoint_requires_name() {
    let response = route_request("GET", "/api/label", "", &registry());
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("'name' is required"));
}

#[test]
fn breakdown_endpoint_counts_team_coverage() {
    let body = r#"{"team":["steam","ember","myst","steam","ghost"]}"#;
    let response = route_request("POST", "/api/breakdown", body, &registry());
    assert_eq!(response.status_code, 200);

    let payload = json(&response.body);
    assert_eq!(payload["team"], serde_json::json!(["steam", "ember", "myst"]));
    assert_eq!(payload["capacity"], 10);
    assert_eq!(payload["breakdown"]["affinities"]["Fire"], 2);
    assert_eq!(payload["breakdown"]["affinities"]["Water"], 1);
    assert_eq!(payload["breakdown"]["classes"]["Bulwark"], 1);
    assert!(payload["breakdown"]["affinities"].get("Unknown").is_none());
    assert_eq!(payload["breakdown"]["unresolved"], serde_json::json!(["Mystery"]));
}

#[test]
fn breakdown_endpoint_can_count_unknown() {
    let body = r#"{"team":["myst"],"count_unknown":true}"#;
    let payload = json(&route_request("POST", "/api/breakdown", body, &registry()).body);
    assert_eq!(payload["breakdown"]["affinities"]["Unknown"], 1);
    assert_eq!(payload["breakdown"]["classes"]["Unknown"], 1);
}

#[test]
fn breakdown_endpoint_with_empty_team() {
    let payload = json(&route_request("POST", "/api/breakdown", "{}", &registry()).body);
    assert_eq!(payload["breakdown"]["affinities"], serde_json::json!({}));
    assert_eq!(payload["breakdown"]["classes"], serde_json::json!({}));
    assert_eq!(payload["breakdown"]["members"], 0);
}

#[test]
fn team_add_reports_outcomes() {
    let registry = registry();
    let added = json(
        &route_request("POST", "/api/team/add", r#"{"team":["steam"],"id":"ember"}"#, &registry).body,
    );
    assert_eq!(added["outcome"], "added");
    assert_eq!(added["team"], serde_json::json!(["steam", "ember"]));
    assert_eq!(added["open_slots"], 8);

    let duplicate = json(
        &route_request("POST", "/api/team/add", r#"{"team":["steam"],"id":"steam"}"#, &registry).body,
    );
    assert_eq!(duplicate["outcome"], "already_present");
    assert_eq!(duplicate["team"], serde_json::json!(["steam"]));
}

#[test]
fn team_add_on_full_team_is_a_no_op() {
    let team: Vec<String> = (0..8)
        .map(|n| format!("filler-{n}"))
        .chain(["steam".to_string(), "ember".to_string()])
        .collect();
    let body = serde_json::json!({ "team": team, "id": "tide" }).to_string();
    let payload = json(&route_request("POST", "/api/team/add", &body, &registry()).body);
    assert_eq!(payload["outcome"], "full");
    assert_eq!(payload["team"].as_array().map(Vec::len), Some(10));
    assert_eq!(payload["open_slots"], 0);
}

#[test]
fn team_add_rejects_unknown_id() {
    let response = route_request("POST", "/api/team/add", r#"{"team":[],"id":"ghost"}"#, &registry());
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("unknown illuvial id 'ghost'"));
}

#[test]
fn team_remove_of_non_member_is_a_no_op() {
    let registry = registry();
    let payload = json(
        &route_request("POST", "/api/team/remove", r#"{"team":["steam","tide"],"id":"ember"}"#, &registry).body,
    );
    assert_eq!(payload["removed"], false);
    assert_eq!(payload["team"], serde_json::json!(["steam", "tide"]));

    let payload = json(
        &route_request("POST", "/api/team/remove", r#"{"team":["steam","tide"],"id":"steam"}"#, &registry).body,
    );
    assert_eq!(payload["removed"], true);
    assert_eq!(payload["team"], serde_json::json!(["tide"]));
}

#[test]
fn invalid_json_is_rejected() {
    let response = route_request("POST", "/api/breakdown", "{bad json}", &registry());
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn data_version_reports_dataset_sizes() {
    let payload = json(&route_request("GET", "/api/data/version", "", &registry()).body);
    assert_eq!(payload["catalog"]["entries"], 12);
    assert_eq!(payload["synergy"]["entries"], 3);
    assert!(payload["loaded_at"].as_str().is_some());
}

#[test]
fn unknown_route_is_not_found() {
    let response = route_request("GET", "/api/officers", "", &registry());
    assert_eq!(response.status_code, 404);
}
