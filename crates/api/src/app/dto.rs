use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedash_core::{InvoiceId, SellerId};
use invoicedash_formatting::{
    DEFAULT_LOCALE, FormatError, Income, PageToken, YAxis, format_currency, format_date_to_local, generate_y_axis,
};
use invoicedash_infra::queries::{
    CardData, InvoiceTableRow, LatestInvoice, Revenue, SellerField, SellerTableRow,
};
use invoicedash_invoicing::{InvoiceRecord, InvoiceStatus};

// -------------------------
// Request DTOs
// -------------------------

/// `?query=&page=` on the invoice list.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
}

impl InvoiceListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Key of this view inside the invoice list cache tag.
    pub fn cache_key(&self) -> String {
        format!("query={}&page={}", self.query.trim(), self.page())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SellerSearchQuery {
    #[serde(default)]
    pub query: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsView {
    pub number_of_invoices: i64,
    pub number_of_sellers: i64,
    pub total_fulfilled: String,
    pub total_awaiting: String,
}

impl From<CardData> for CardsView {
    fn from(cards: CardData) -> Self {
        Self {
            number_of_invoices: cards.number_of_invoices,
            number_of_sellers: cards.number_of_sellers,
            total_fulfilled: format_currency(cards.total_fulfilled.value()),
            total_awaiting: format_currency(cards.total_awaiting.value()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueChartView {
    pub revenue: Vec<Revenue>,
    /// `None` when there is no revenue to chart.
    pub y_axis: Option<YAxis>,
}

impl RevenueChartView {
    pub fn new(revenue: Vec<Revenue>) -> Self {
        let series: Vec<Income> = revenue
            .iter()
            .map(|point| Income::new(point.month.clone(), point.revenue))
            .collect();
        let y_axis = match generate_y_axis(&series) {
            Ok(axis) => Some(axis),
            Err(FormatError::EmptySeries) => None,
            Err(e) => {
                tracing::warn!(error = %e, "revenue chart has no axis");
                None
            }
        };
        Self { revenue, y_axis }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestInvoiceView {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
}

impl From<LatestInvoice> for LatestInvoiceView {
    fn from(inv: LatestInvoice) -> Self {
        Self {
            id: inv.id,
            name: inv.name,
            email: inv.email,
            image_url: inv.image_url,
            amount: format_currency(inv.amount.value()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub cards: CardsView,
    pub revenue_chart: RevenueChartView,
    pub latest_invoices: Vec<LatestInvoiceView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRowView {
    pub id: InvoiceId,
    pub seller_id: SellerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: String,
    pub amount: String,
    pub status: InvoiceStatus,
}

impl From<InvoiceTableRow> for InvoiceRowView {
    fn from(row: InvoiceTableRow) -> Self {
        Self {
            id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            date: display_date(row.date),
            amount: format_currency(row.amount.value()),
            status: row.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListView {
    pub query: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub pagination: Vec<PageToken>,
    pub invoices: Vec<InvoiceRowView>,
}

/// Values the edit form is pre-filled with; `amount` is in dollars.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormView {
    pub id: InvoiceId,
    pub seller_id: SellerId,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<InvoiceRecord> for InvoiceFormView {
    fn from(record: InvoiceRecord) -> Self {
        Self {
            id: record.id,
            seller_id: record.seller_id,
            amount: record.amount.as_dollars(),
            status: record.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInvoiceView {
    pub invoice: InvoiceFormView,
    pub sellers: Vec<SellerField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRowView {
    pub id: SellerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_awaiting: String,
    pub total_fulfilled: String,
}

impl From<SellerTableRow> for SellerRowView {
    fn from(row: SellerTableRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            total_invoices: row.total_invoices,
            total_awaiting: format_currency(row.total_awaiting.value()),
            total_fulfilled: format_currency(row.total_fulfilled.value()),
        }
    }
}

fn display_date(date: NaiveDate) -> String {
    let iso = date.format("%Y-%m-%d").to_string();
    format_date_to_local(&iso, DEFAULT_LOCALE).unwrap_or(iso)
}
