use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use invoicedash_core::InvoiceId;
use invoicedash_formatting::generate_pagination;
use invoicedash_infra::{CacheTag, StoreError};
use invoicedash_invoicing::{INVOICES_PATH, InvoiceForm};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", post(update_invoice))
        .route("/:id/edit", get(edit_invoice))
        .route("/:id/delete", post(delete_invoice))
}

/// One page of the invoice table. Served from the view cache until a
/// mutation invalidates the list.
pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::InvoiceListQuery>,
) -> axum::response::Response {
    let tag = CacheTag::new(INVOICES_PATH);
    let key = params.cache_key();
    if let Some(view) = services.cache.get(&tag, &key) {
        return Json(view).into_response();
    }
    // Taken before the rows are read; a mutation that lands in between makes
    // `put` discard this view.
    let generation = services.cache.generation(&tag);

    let query = params.query.trim();
    let page = params.page();
    let loaded = tokio::try_join!(
        services.queries.filtered_invoices(query, page),
        services.queries.invoice_pages(query),
    );
    let (rows, total_pages) = match loaded {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    let view = dto::InvoiceListView {
        query: query.to_string(),
        current_page: page,
        total_pages,
        pagination: generate_pagination(page, total_pages),
        invoices: rows.into_iter().map(Into::into).collect(),
    };

    match serde_json::to_value(&view) {
        Ok(json) => {
            services.cache.put(&tag, generation, key, json.clone());
            Json(json).into_response()
        }
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "serialize_error", e.to_string()),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<InvoiceForm>,
) -> axum::response::Response {
    errors::outcome_to_response(services.actions.create_invoice(&form).await)
}

/// Invoice pre-filled for editing, with the seller options.
pub async fn edit_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(invoice_id) = id.parse::<InvoiceId>() else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found");
    };

    let loaded = tokio::try_join!(
        services.queries.invoice_by_id(invoice_id),
        services.queries.sellers(),
    );
    match loaded {
        Ok((Some(invoice), sellers)) => Json(dto::EditInvoiceView {
            invoice: invoice.into(),
            sellers,
        })
        .into_response(),
        Ok((None, _)) => errors::store_error_to_response(StoreError::NotFound),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(form): Form<InvoiceForm>,
) -> axum::response::Response {
    errors::outcome_to_response(services.actions.update_invoice(&id, &form).await)
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.actions.delete_invoice(&id).await {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(state) => errors::state_to_response(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::Notify;

    use invoicedash_auth::InMemoryCredentialVerifier;
    use invoicedash_core::SellerId;
    use invoicedash_infra::queries::{
        CardData, InvoiceTableRow, LatestInvoice, Revenue, Seller, SellerField, SellerTableRow,
    };
    use invoicedash_infra::{DashboardQueries, InMemoryDashboardStore, InMemoryViewCache, ViewCache};
    use invoicedash_invoicing::{InvoiceRecord, Outcome};

    use crate::actions::InvoiceActions;

    /// Holds the first `filtered_invoices` call after it has read its rows
    /// until `release` is notified.
    struct StallingQueries {
        inner: Arc<InMemoryDashboardStore>,
        stalled: AtomicBool,
        rows_read: Notify,
        release: Notify,
    }

    #[async_trait]
    impl DashboardQueries for StallingQueries {
        async fn card_data(&self) -> Result<CardData, StoreError> {
            self.inner.card_data().await
        }

        async fn revenue(&self) -> Result<Vec<Revenue>, StoreError> {
            self.inner.revenue().await
        }

        async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, StoreError> {
            self.inner.latest_invoices().await
        }

        async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceTableRow>, StoreError> {
            let rows = self.inner.filtered_invoices(query, page).await;
            if !self.stalled.swap(true, Ordering::SeqCst) {
                self.rows_read.notify_one();
                self.release.notified().await;
            }
            rows
        }

        async fn invoice_pages(&self, query: &str) -> Result<u32, StoreError> {
            self.inner.invoice_pages(query).await
        }

        async fn invoice_by_id(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, StoreError> {
            self.inner.invoice_by_id(id).await
        }

        async fn sellers(&self) -> Result<Vec<SellerField>, StoreError> {
            self.inner.sellers().await
        }

        async fn filtered_sellers(&self, query: &str) -> Result<Vec<SellerTableRow>, StoreError> {
            self.inner.filtered_sellers(query).await
        }
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_during_an_in_flight_list_read_is_visible_next_read() {
        let store = Arc::new(InMemoryDashboardStore::new());
        let seller = SellerId::new();
        store
            .add_seller(Seller {
                id: seller,
                name: "Amy Burns".into(),
                email: "amy@burns.com".into(),
                image_url: "/sellers/amy-burns.png".into(),
            })
            .unwrap();
        store
            .add_invoice(InvoiceRecord {
                id: InvoiceId::new(),
                seller_id: seller,
                amount: invoicedash_core::Cents::new(500),
                status: invoicedash_invoicing::InvoiceStatus::Fulfilled,
                date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            })
            .unwrap();

        let queries = Arc::new(StallingQueries {
            inner: store.clone(),
            stalled: AtomicBool::new(false),
            rows_read: Notify::new(),
            release: Notify::new(),
        });
        let cache: Arc<dyn ViewCache> = Arc::new(InMemoryViewCache::new());
        let services = Arc::new(AppServices {
            actions: InvoiceActions::new(store.clone(), cache.clone()),
            queries: queries.clone(),
            cache,
            verifier: Arc::new(InMemoryCredentialVerifier::new()),
        });

        let in_flight = tokio::spawn(list_invoices(
            Extension(services.clone()),
            Query(dto::InvoiceListQuery::default()),
        ));
        queries.rows_read.notified().await;

        let outcome = services
            .actions
            .create_invoice(&InvoiceForm::new(seller.to_string(), "777.77", "awaiting"))
            .await;
        assert_eq!(outcome, Outcome::redirect_to_invoices());
        queries.release.notify_one();

        // The in-flight reader still answers with what it read.
        let stale = body_json(in_flight.await.unwrap()).await;
        assert_eq!(stale["invoices"].as_array().unwrap().len(), 1);

        let fresh = body_json(
            list_invoices(Extension(services.clone()), Query(dto::InvoiceListQuery::default())).await,
        )
        .await;
        let amounts: Vec<&str> = fresh["invoices"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["amount"].as_str().unwrap())
            .collect();
        assert_eq!(amounts, vec!["$777.77", "$5.00"]);
    }
}
