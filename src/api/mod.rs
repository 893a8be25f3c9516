pub mod auth;
pub mod books;
pub mod fines;
pub mod health;
pub mod loans;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::domain::LibraryError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        // Catalog
        .route("/books/search", get(books::search_books))
        // Circulation
        .route("/loans/search", get(loans::search_active_loans))
        .route("/loans/checkout", post(loans::checkout))
        .route("/loans/checkin", post(loans::checkin))
        // Fines
        .route("/fines", get(fines::list_fines))
        .route("/fines/refresh", post(fines::refresh_fines))
        .route("/borrowers/:card_id/fines", get(fines::borrower_fines))
        .route("/borrowers/:card_id/fines/pay", post(fines::pay_fines))
        .with_state(state)
}

/// Map a domain failure onto a status code plus a JSON body carrying the
/// identifiers the caller needs for remediation.
pub(crate) fn error_response(err: LibraryError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        LibraryError::BorrowerNotFound(_) | LibraryError::BookNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        LibraryError::InvalidBatch(_) => StatusCode::BAD_REQUEST,
        LibraryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::CONFLICT,
    };

    let mut body = json!({ "error": err.to_string() });
    match err {
        LibraryError::UnreturnedBooks { loan_ids } => {
            body["loan_ids"] = json!(loan_ids);
        }
        LibraryError::BatchPartialFailure { succeeded, errors } => {
            body["succeeded"] = json!(succeeded);
            body["failures"] = json!(errors
                .into_iter()
                .map(|(loan_id, reason)| json!({ "loan_id": loan_id, "reason": reason }))
                .collect::<Vec<_>>());
        }
        LibraryError::LoanLimitReached { limit, .. } => {
            body["limit"] = json!(limit);
        }
        _ => {}
    }

    (status, Json(body))
}
