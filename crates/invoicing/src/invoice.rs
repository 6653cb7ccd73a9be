use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use invoicedash_core::{Cents, Entity, InvoiceId, SellerId};

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Awaiting,
    Fulfilled,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown invoice status: {0:?}")]
pub struct ParseStatusError(pub String);

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Awaiting, InvoiceStatus::Fulfilled];

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Awaiting => "awaiting",
            InvoiceStatus::Fulfilled => "fulfilled",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = ParseStatusError;

    /// Exact match only; the form posts the lowercase value verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awaiting" => Ok(InvoiceStatus::Awaiting),
            "fulfilled" => Ok(InvoiceStatus::Fulfilled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A persisted invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub seller_id: SellerId,
    /// Amount in cents; never negative.
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl Entity for InvoiceRecord {
    type Key = InvoiceId;

    fn key(&self) -> InvoiceId {
        self.id
    }
}

/// Values bound into the INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub seller_id: SellerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    pub fn into_record(self, id: InvoiceId) -> InvoiceRecord {
        InvoiceRecord {
            id,
            seller_id: self.seller_id,
            amount: self.amount,
            status: self.status,
            date: self.date,
        }
    }
}

/// Values bound into the UPDATE statement. The issue date is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub seller_id: SellerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl InvoiceRecord {
    pub fn apply(&mut self, changes: &InvoiceChanges) {
        self.seller_id = changes.seller_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }
}
