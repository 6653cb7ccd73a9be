use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod dashboard;
pub mod invoices;
pub mod sellers;
pub mod system;

/// Router for the sign-in form and every dashboard page.
pub fn router() -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/dashboard", get(dashboard::overview))
        .nest("/dashboard/invoices", invoices::router())
        .route("/dashboard/sellers", get(sellers::list_sellers))
}
