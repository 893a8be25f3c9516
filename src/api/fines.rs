use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error_response;
use crate::auth::Claims;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFinesQuery {
    #[serde(default)]
    pub include_paid: bool,
}

pub async fn list_fines(
    State(state): State<AppState>,
    Query(params): Query<ListFinesQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let borrowers = state
        .fine_engine
        .list_fines(params.include_paid)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "borrowers": borrowers })))
}

pub async fn refresh_fines(
    State(state): State<AppState>,
    _claims: Claims,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let summary = state
        .fine_engine
        .refresh_fines()
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": "Fines refreshed",
        "created": summary.created,
        "updated": summary.updated,
    })))
}

pub async fn borrower_fines(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Query(params): Query<ListFinesQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let summary = state
        .fine_engine
        .fines_for_borrower(&card_id, params.include_paid)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "borrower": summary })))
}

pub async fn pay_fines(
    State(state): State<AppState>,
    _claims: Claims,
    Path(card_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let receipt = state
        .fine_engine
        .pay_all_fines(&card_id)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": format!(
            "Successfully paid all fines for borrower {}. Total amount: ${}",
            receipt.card_id, receipt.total_paid
        ),
        "payment": receipt,
    })))
}
