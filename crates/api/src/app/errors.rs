use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use serde_json::json;

use invoicedash_infra::StoreError;
use invoicedash_invoicing::{Outcome, State};

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Constraint(msg) => json_error(StatusCode::CONFLICT, "constraint_violation", msg),
        StoreError::Database(msg) => {
            tracing::error!(error = %msg, "read query failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "failed to load data")
        }
    }
}

/// `Redirect` becomes `303 See Other`; a `State` carrying field errors is
/// `422`, one carrying only a message is `500`.
pub fn outcome_to_response(outcome: Outcome) -> axum::response::Response {
    match outcome {
        Outcome::Redirect(path) => Redirect::to(&path).into_response(),
        Outcome::State(state) => state_to_response(state),
    }
}

pub fn state_to_response(state: State) -> axum::response::Response {
    let status = if state.errors.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, axum::Json(state)).into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
