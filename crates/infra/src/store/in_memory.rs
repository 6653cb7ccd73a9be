use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use invoicedash_core::{Cents, Entity, InvoiceId, SellerId};
use invoicedash_invoicing::{InvoiceChanges, InvoiceRecord, InvoiceStatus, NewInvoice};

use super::{InvoiceStore, StoreError};
use crate::queries::{
    CardData, DashboardQueries, InvoiceTableRow, LATEST_INVOICES, LatestInvoice, Revenue, Seller,
    SellerField, SellerTableRow, page_count, page_offset,
};

#[derive(Debug, Default)]
struct Tables {
    sellers: BTreeMap<SellerId, Seller>,
    invoices: BTreeMap<InvoiceId, InvoiceRecord>,
    revenue: Vec<Revenue>,
}

/// In-memory dashboard datastore for tests/dev.
///
/// Enforces the same seller reference check as the Postgres foreign key so
/// both backends fail the same way.
#[derive(Debug, Default)]
pub struct InMemoryDashboardStore {
    inner: RwLock<Tables>,
}

impl InMemoryDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_seller(&self, seller: Seller) -> Result<(), StoreError> {
        self.write()?.sellers.insert(seller.key(), seller);
        Ok(())
    }

    pub fn add_invoice(&self, invoice: InvoiceRecord) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        ensure_seller(&tables, invoice.seller_id)?;
        tables.invoices.insert(invoice.key(), invoice);
        Ok(())
    }

    pub fn set_revenue(&self, revenue: Vec<Revenue>) -> Result<(), StoreError> {
        self.write()?.revenue = revenue;
        Ok(())
    }

    pub fn invoice(&self, id: InvoiceId) -> Option<InvoiceRecord> {
        self.inner.read().ok()?.invoices.get(&id).cloned()
    }

    pub fn invoice_count(&self) -> usize {
        self.inner.read().map(|t| t.invoices.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }
}

fn ensure_seller(tables: &Tables, seller_id: SellerId) -> Result<(), StoreError> {
    if tables.sellers.contains_key(&seller_id) {
        Ok(())
    } else {
        Err(StoreError::Constraint(format!("unknown seller {seller_id}")))
    }
}

#[async_trait]
impl InvoiceStore for InMemoryDashboardStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let mut tables = self.write()?;
        ensure_seller(&tables, invoice.seller_id)?;
        let id = InvoiceId::new();
        tables.invoices.insert(id, invoice.into_record(id));
        Ok(id)
    }

    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        ensure_seller(&tables, changes.seller_id)?;
        let record = tables.invoices.get_mut(&id).ok_or(StoreError::NotFound)?;
        record.apply(&changes);
        Ok(())
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), StoreError> {
        self.write()?
            .invoices
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

impl Tables {
    /// Invoices joined with their seller, newest first.
    fn invoice_rows(&self) -> Vec<InvoiceTableRow> {
        let mut rows: Vec<InvoiceTableRow> = self
            .invoices
            .values()
            .filter_map(|inv| {
                let seller = self.sellers.get(&inv.seller_id)?;
                Some(InvoiceTableRow {
                    id: inv.id,
                    seller_id: inv.seller_id,
                    name: seller.name.clone(),
                    email: seller.email.clone(),
                    image_url: seller.image_url.clone(),
                    date: inv.date,
                    amount: inv.amount,
                    status: inv.status,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        rows
    }

    fn matching_invoice_rows(&self, query: &str) -> Vec<InvoiceTableRow> {
        let needle = query.trim().to_lowercase();
        self.invoice_rows()
            .into_iter()
            .filter(|row| {
                needle.is_empty()
                    || [
                        row.name.to_lowercase(),
                        row.email.to_lowercase(),
                        row.amount.value().to_string(),
                        row.date.to_string(),
                        row.status.as_str().to_string(),
                    ]
                    .iter()
                    .any(|haystack| haystack.contains(&needle))
            })
            .collect()
    }

    /// Same failure as the `::BIGINT` cast on the Postgres side when the
    /// total leaves the `i64` range.
    fn total_for(&self, seller_id: Option<SellerId>, status: InvoiceStatus) -> Result<Cents, StoreError> {
        let amounts = self
            .invoices
            .values()
            .filter(|inv| inv.status == status)
            .filter(|inv| seller_id.is_none_or(|id| inv.seller_id == id))
            .map(|inv| inv.amount);
        Cents::checked_sum(amounts)
            .ok_or_else(|| StoreError::Database(format!("{status} invoice total out of range")))
    }
}

#[async_trait]
impl DashboardQueries for InMemoryDashboardStore {
    async fn card_data(&self) -> Result<CardData, StoreError> {
        let tables = self.read()?;
        Ok(CardData {
            number_of_invoices: tables.invoices.len() as i64,
            number_of_sellers: tables.sellers.len() as i64,
            total_fulfilled: tables.total_for(None, InvoiceStatus::Fulfilled)?,
            total_awaiting: tables.total_for(None, InvoiceStatus::Awaiting)?,
        })
    }

    async fn revenue(&self) -> Result<Vec<Revenue>, StoreError> {
        Ok(self.read()?.revenue.clone())
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, StoreError> {
        Ok(self
            .read()?
            .invoice_rows()
            .into_iter()
            .take(LATEST_INVOICES as usize)
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                amount: row.amount,
            })
            .collect())
    }

    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceTableRow>, StoreError> {
        let rows = self.read()?.matching_invoice_rows(query);
        Ok(rows
            .into_iter()
            .skip(page_offset(page) as usize)
            .take(crate::queries::ITEMS_PER_PAGE as usize)
            .collect())
    }

    async fn invoice_pages(&self, query: &str) -> Result<u32, StoreError> {
        let count = self.read()?.matching_invoice_rows(query).len();
        Ok(page_count(count as u64))
    }

    async fn invoice_by_id(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, StoreError> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn sellers(&self) -> Result<Vec<SellerField>, StoreError> {
        let mut fields: Vec<SellerField> = self
            .read()?
            .sellers
            .values()
            .map(|s| SellerField {
                id: s.id,
                name: s.name.clone(),
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fields)
    }

    async fn filtered_sellers(&self, query: &str) -> Result<Vec<SellerTableRow>, StoreError> {
        let tables = self.read()?;
        let needle = query.trim().to_lowercase();

        let mut rows: Vec<SellerTableRow> = tables
            .sellers
            .values()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.email.to_lowercase().contains(&needle)
            })
            .map(|s| {
                Ok(SellerTableRow {
                    id: s.id,
                    name: s.name.clone(),
                    email: s.email.clone(),
                    image_url: s.image_url.clone(),
                    total_invoices: tables.invoices.values().filter(|inv| inv.seller_id == s.id).count() as i64,
                    total_awaiting: tables.total_for(Some(s.id), InvoiceStatus::Awaiting)?,
                    total_fulfilled: tables.total_for(Some(s.id), InvoiceStatus::Fulfilled)?,
                })
            })
            .collect::<Result<_, StoreError>>()?;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seller(name: &str, email: &str) -> Seller {
        Seller {
            id: SellerId::new(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: format!("/sellers/{}.png", name.to_lowercase()),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
    }

    fn new_invoice(seller_id: SellerId, cents: i64, status: InvoiceStatus, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            seller_id,
            amount: Cents::new(cents),
            status,
            date,
        }
    }

    #[tokio::test]
    async fn insert_requires_known_seller() {
        let store = InMemoryDashboardStore::new();
        let err = store
            .insert(new_invoice(SellerId::new(), 100, InvoiceStatus::Awaiting, day(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.invoice_count(), 0);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = InMemoryDashboardStore::new();
        let s = seller("Amy", "amy@example.com");
        store.add_seller(s.clone()).unwrap();

        let id = store
            .insert(new_invoice(s.id, 100, InvoiceStatus::Awaiting, day(1)))
            .await
            .unwrap();

        let changes = InvoiceChanges {
            seller_id: s.id,
            amount: Cents::new(250),
            status: InvoiceStatus::Fulfilled,
        };
        store.update(id, changes.clone()).await.unwrap();
        let stored = store.invoice(id).unwrap();
        assert_eq!(stored.amount, Cents::new(250));
        assert_eq!(stored.date, day(1));

        store.delete(id).await.unwrap();
        assert_eq!(store.delete(id).await, Err(StoreError::NotFound));
        assert_eq!(store.update(id, changes).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn filtered_invoices_search_and_paginate() {
        let store = InMemoryDashboardStore::new();
        let amy = seller("Amy Burns", "amy@example.com");
        let lee = seller("Lee Robinson", "lee@example.com");
        store.add_seller(amy.clone()).unwrap();
        store.add_seller(lee.clone()).unwrap();

        for d in 1..=8 {
            store
                .insert(new_invoice(amy.id, 1000 + d as i64, InvoiceStatus::Awaiting, day(d)))
                .await
                .unwrap();
        }
        store
            .insert(new_invoice(lee.id, 4242, InvoiceStatus::Fulfilled, day(20)))
            .await
            .unwrap();

        assert_eq!(store.invoice_pages("").await.unwrap(), 2);
        let first = store.filtered_invoices("", 1).await.unwrap();
        assert_eq!(first.len(), 6);
        assert_eq!(first[0].name, "Lee Robinson");
        assert_eq!(store.filtered_invoices("", 2).await.unwrap().len(), 3);

        let lee_rows = store.filtered_invoices("ROBINSON", 1).await.unwrap();
        assert_eq!(lee_rows.len(), 1);
        assert_eq!(store.filtered_invoices("fulfilled", 1).await.unwrap().len(), 1);
        assert_eq!(store.filtered_invoices("4242", 1).await.unwrap().len(), 1);
        assert_eq!(store.filtered_invoices("2023-06-0", 1).await.unwrap().len(), 6);
        assert_eq!(store.invoice_pages("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn card_and_seller_totals() {
        let store = InMemoryDashboardStore::new();
        let amy = seller("Amy", "amy@example.com");
        let bob = seller("Bob", "bob@example.com");
        store.add_seller(amy.clone()).unwrap();
        store.add_seller(bob.clone()).unwrap();
        store.insert(new_invoice(amy.id, 500, InvoiceStatus::Awaiting, day(1))).await.unwrap();
        store.insert(new_invoice(amy.id, 700, InvoiceStatus::Fulfilled, day(2))).await.unwrap();
        store.insert(new_invoice(amy.id, 300, InvoiceStatus::Fulfilled, day(3))).await.unwrap();

        let cards = store.card_data().await.unwrap();
        assert_eq!(cards.number_of_invoices, 3);
        assert_eq!(cards.number_of_sellers, 2);
        assert_eq!(cards.total_awaiting, Cents::new(500));
        assert_eq!(cards.total_fulfilled, Cents::new(1000));

        let rows = store.filtered_sellers("").await.unwrap();
        assert_eq!(rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Amy", "Bob"]);
        assert_eq!(rows[0].total_invoices, 3);
        assert_eq!(rows[0].total_fulfilled, Cents::new(1000));
        assert_eq!(rows[1].total_invoices, 0);
        assert_eq!(rows[1].total_awaiting, Cents::ZERO);

        assert_eq!(store.filtered_sellers("bob@").await.unwrap().len(), 1);
        assert_eq!(store.latest_invoices().await.unwrap()[0].amount, Cents::new(300));
    }

    #[tokio::test]
    async fn overflowing_totals_are_store_errors() {
        let store = InMemoryDashboardStore::new();
        let amy = seller("Amy", "amy@example.com");
        store.add_seller(amy.clone()).unwrap();
        for d in 1..=2 {
            store
                .insert(new_invoice(amy.id, i64::MAX, InvoiceStatus::Fulfilled, day(d)))
                .await
                .unwrap();
        }

        assert!(matches!(store.card_data().await, Err(StoreError::Database(_))));
        assert!(matches!(store.filtered_sellers("").await, Err(StoreError::Database(_))));
    }
}
