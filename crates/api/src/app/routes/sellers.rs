use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    response::IntoResponse,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn list_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SellerSearchQuery>,
) -> axum::response::Response {
    match services.queries.filtered_sellers(&params.query).await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(dto::SellerRowView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
