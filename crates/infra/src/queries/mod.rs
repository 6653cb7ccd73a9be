//! Read side of the dashboard: card totals, revenue, invoice and seller tables.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use invoicedash_core::{Cents, Entity, InvoiceId, SellerId};
use invoicedash_invoicing::{InvoiceRecord, InvoiceStatus};

use crate::store::StoreError;

pub mod postgres;

/// Rows per page of the invoice table.
pub const ITEMS_PER_PAGE: u32 = 6;

/// Number of rows in the "latest invoices" panel.
pub const LATEST_INVOICES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl Entity for Seller {
    type Key = SellerId;

    fn key(&self) -> SellerId {
        self.id
    }
}

/// Option of the seller `<select>` on the invoice forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerField {
    pub id: SellerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestInvoice {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTableRow {
    pub id: InvoiceId,
    pub seller_id: SellerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerTableRow {
    pub id: SellerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_awaiting: Cents,
    pub total_fulfilled: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_sellers: i64,
    pub total_fulfilled: Cents,
    pub total_awaiting: Cents,
}

/// Queries consumed by the display layer.
///
/// Search strings match case-insensitively as substrings. Invoice search
/// covers seller name and email, the amount in cents, the ISO date and the
/// status; seller search covers name and email.
#[async_trait]
pub trait DashboardQueries: Send + Sync {
    async fn card_data(&self) -> Result<CardData, StoreError>;

    /// Monthly revenue series for the chart, in calendar order.
    async fn revenue(&self) -> Result<Vec<Revenue>, StoreError>;

    /// The most recent invoices, newest first.
    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, StoreError>;

    /// One page (1-based) of matching invoices, newest first.
    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceTableRow>, StoreError>;

    /// Number of pages `filtered_invoices` can return for `query`.
    async fn invoice_pages(&self, query: &str) -> Result<u32, StoreError>;

    async fn invoice_by_id(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, StoreError>;

    /// All sellers, ordered by name.
    async fn sellers(&self) -> Result<Vec<SellerField>, StoreError>;

    /// Per-seller invoice totals for matching sellers, ordered by name.
    async fn filtered_sellers(&self, query: &str) -> Result<Vec<SellerTableRow>, StoreError>;
}

/// `ceil(count / ITEMS_PER_PAGE)`.
pub fn page_count(count: u64) -> u32 {
    let pages = count.div_ceil(ITEMS_PER_PAGE as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Zero-based row offset of a 1-based page; page 0 is read as page 1.
pub fn page_offset(page: u32) -> u64 {
    (page.max(1) as u64 - 1) * ITEMS_PER_PAGE as u64
}
