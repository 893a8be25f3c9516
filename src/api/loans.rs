use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error_response;
use crate::auth::Claims;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_active_loans(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let term = params.q.unwrap_or_default();

    let loans = state
        .loan_service
        .find_active_loans(&term)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "total": loans.len(),
        "loans": loans,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub isbn: String,
    pub card_id: String,
    #[serde(rename = "override", default)]
    pub override_restrictions: bool,
}

pub async fn checkout(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if payload.override_restrictions && !claims.is_librarian() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Only librarians may override checkout restrictions" })),
        ));
    }

    let receipt = state
        .loan_service
        .checkout(&payload.isbn, &payload.card_id, payload.override_restrictions)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": format!(
            "Successfully checked out book '{}' (ISBN: {}). Due date: {}.",
            receipt.title, receipt.isbn, receipt.due_date
        ),
        "loan": receipt,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub loan_ids: Vec<i32>,
}

pub async fn checkin(
    State(state): State<AppState>,
    _claims: Claims,
    Json(payload): Json<CheckinRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let receipt = state
        .loan_service
        .checkin(&payload.loan_ids)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "message": format!("Successfully checked in {} book(s)", receipt.checked_in.len()),
        "checked_in": receipt.checked_in,
        "date_in": receipt.date_in,
    })))
}
