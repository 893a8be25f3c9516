use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error_response;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let term = params.q.unwrap_or_default();

    let results = state
        .catalog
        .search_books(&term)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "total": results.len(),
        "books": results,
    })))
}
