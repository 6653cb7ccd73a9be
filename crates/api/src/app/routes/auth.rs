use std::sync::Arc;

use axum::{
    Form, Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use invoicedash_auth::Credentials;

use crate::actions;
use crate::app::errors;
use crate::app::services::AppServices;

pub const HOME_PATH: &str = "/dashboard";

/// Email/password sign-in. Success redirects to the dashboard home.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(credentials): Form<Credentials>,
) -> axum::response::Response {
    match actions::authenticate(services.verifier.as_ref(), &credentials).await {
        Ok(None) => Redirect::to(HOME_PATH).into_response(),
        Ok(Some(message)) => (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "sign-in errored");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "auth_error", "sign-in failed")
        }
    }
}
