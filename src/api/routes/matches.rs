use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::AggregatedMatch;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub msg: String,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        msg: "pong".to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub region: Option<String>,
    pub summoner_name: Option<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("The parameter {} is required", name)))
}

pub async fn find_match(
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<AggregatedMatch>, ApiError> {
    let region = required(params.region, "region")?;
    let summoner_name = required(params.summoner_name, "summoner_name")?;

    let aggregated = state
        .match_service
        .find_current_match(&region, &summoner_name)
        .await?;

    Ok(Json(aggregated))
}
