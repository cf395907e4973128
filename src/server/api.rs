use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::data_registry::DataRegistry;
use crate::synergy::{aggregate, Breakdown, CachedResolver, DisplayLabel, Resolve, UnknownPolicy};
use crate::team::{AddOutcome, Roster, TEAM_CAPACITY};

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Validation(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "illuvilytics-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct IlluvialListItem {
    pub id: String,
    pub display_name: String,
    pub line: String,
    pub stage: f64,
    pub tier: f64,
    pub affinity: String,
    pub class: String,
    pub image: String,
    pub affinity_label: String,
    pub class_label: String,
}

/// Catalog with full synergy labels, in catalog order.
pub fn illuvial_list(registry: &DataRegistry) -> Vec<IlluvialListItem> {
    let resolver = CachedResolver::new(registry.synergy());
    registry
        .illuvials()
        .iter()
        .map(|illuvial| {
            let label = resolver.display_label(&illuvial.display_name);
            IlluvialListItem {
                id: illuvial.id.clone(),
                display_name: illuvial.display_name.clone(),
                line: illuvial.line.clone(),
                stage: illuvial.stage,
                tier: illuvial.tier,
                affinity: illuvial.affinity.clone(),
                class: illuvial.class_name.clone(),
                image: illuvial.image.clone(),
                affinity_label: label.affinity_label,
                class_label: label.class_label,
            }
        })
        .collect()
}

pub fn illuvials_payload(registry: &DataRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "illuvials": illuvial_list(registry) }))
}

/// Value of `key` in the query string, percent-decoded.
fn query_param(path: &str, key: &str) -> Option<String> {
    let query = path.split_once('?').map(|(_, q)| q)?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelResponse {
    pub name: String,
    pub found: bool,
    #[serde(flatten)]
    pub label: DisplayLabel,
}

pub fn label_payload(registry: &DataRegistry, path: &str) -> Result<String, ApiError> {
    let name = query_param(path, "name")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("query parameter 'name' is required".to_string()))?;
    let resolved = registry.synergy().resolve(&name);
    let response = LabelResponse {
        found: resolved.found,
        label: resolved.label(),
        name,
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamChangeRequest {
    #[serde(default)]
    pub team: Vec<String>,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamAddResponse {
    pub team: Vec<String>,
    pub outcome: AddOutcome,
    pub open_slots: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamRemoveResponse {
    pub team: Vec<String>,
    pub removed: bool,
    pub open_slots: usize,
}

fn roster_from_request(registry: &DataRegistry, team: &[String]) -> Roster {
    Roster::from_ids(registry, team.iter().map(String::as_str))
}

pub fn team_add_payload(registry: &DataRegistry, body: &str) -> Result<String, ApiError> {
    let req: TeamChangeRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let illuvial = registry
        .illuvial(&req.id)
        .ok_or_else(|| ApiError::Validation(format!("unknown illuvial id '{}'", req.id)))?;

    let mut roster = roster_from_request(registry, &req.team);
    let outcome = roster.add(illuvial.clone());
    let response = TeamAddResponse {
        team: roster.ids(),
        outcome,
        open_slots: roster.open_slots(),
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

pub fn team_remove_payload(registry: &DataRegistry, body: &str) -> Result<String, ApiError> {
    let req: TeamChangeRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let mut roster = roster_from_request(registry, &req.team);
    let removed = roster.remove(&req.id);
    let response = TeamRemoveResponse {
        team: roster.ids(),
        removed,
        open_slots: roster.open_slots(),
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakdownRequest {
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub count_unknown: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownResponse {
    pub status: &'static str,
    pub team: Vec<String>,
    pub capacity: usize,
    pub breakdown: Breakdown,
}

pub fn breakdown_payload(registry: &DataRegistry, body: &str) -> Result<String, ApiError> {
    let req: BreakdownRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let roster = roster_from_request(registry, &req.team);
    let policy = if req.count_unknown {
        UnknownPolicy::Count
    } else {
        UnknownPolicy::Skip
    };
    let resolver = CachedResolver::new(registry.synergy());
    let response = BreakdownResponse {
        status: "ok",
        team: roster.ids(),
        capacity: TEAM_CAPACITY,
        breakdown: aggregate(roster.members(), &resolver, policy),
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

pub fn data_version_payload(registry: &DataRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(registry.version())
}
