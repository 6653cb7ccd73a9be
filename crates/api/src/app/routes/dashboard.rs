use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Summary cards, revenue chart and latest invoices, loaded concurrently.
pub async fn overview(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let queries = &services.queries;
    let loaded = tokio::try_join!(queries.card_data(), queries.revenue(), queries.latest_invoices());

    match loaded {
        Ok((cards, revenue, latest)) => Json(dto::DashboardView {
            cards: cards.into(),
            revenue_chart: dto::RevenueChartView::new(revenue),
            latest_invoices: latest.into_iter().map(Into::into).collect(),
        })
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
