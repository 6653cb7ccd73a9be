//! Invoice form schema.
//!
//! Each field is checked on its own and every failure is recorded, so a form
//! with three bad fields yields three error entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use invoicedash_core::{Cents, SellerId, money::MAX_DOLLARS};

use crate::invoice::{InvoiceChanges, InvoiceStatus, NewInvoice};

/// Raw form submission, exactly as posted by the invoice form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    pub seller_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl InvoiceForm {
    pub fn new(
        seller_id: impl Into<String>,
        amount: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            seller_id: Some(seller_id.into()),
            amount: Some(amount.into()),
            status: Some(status.into()),
        }
    }
}

/// Form fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    SellerId,
    Amount,
    Status,
}

pub const SELLER_MESSAGE: &str = "Please select a seller.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_TOO_LARGE_MESSAGE: &str = "Please enter a smaller amount.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::SellerId => "sellerId",
            Field::Amount => "amount",
            Field::Status => "status",
        }
    }
}

/// Field name → ordered list of messages. Only invalid fields have entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Typed output of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    pub seller_id: SellerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl ValidatedInvoice {
    pub fn issued_on(self, date: chrono::NaiveDate) -> NewInvoice {
        NewInvoice {
            seller_id: self.seller_id,
            amount: self.amount,
            status: self.status,
            date,
        }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            seller_id: self.seller_id,
            amount: self.amount,
            status: self.status,
        }
    }
}

/// Validate a submitted invoice form.
pub fn validate(form: &InvoiceForm) -> Result<ValidatedInvoice, FieldErrors> {
    let mut errors = FieldErrors::default();

    let seller_id = record(&mut errors, Field::SellerId, parse_seller_id(form.seller_id.as_deref()));
    let amount = record(&mut errors, Field::Amount, parse_amount(form.amount.as_deref()));
    let status = record(&mut errors, Field::Status, parse_status(form.status.as_deref()));

    match (seller_id, amount, status) {
        (Some(seller_id), Some(amount), Some(status)) => Ok(ValidatedInvoice {
            seller_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

fn record<T>(errors: &mut FieldErrors, field: Field, parsed: Result<T, &'static str>) -> Option<T> {
    parsed.map_err(|message| errors.push(field, message)).ok()
}

fn parse_seller_id(raw: Option<&str>) -> Result<SellerId, &'static str> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(SELLER_MESSAGE)?;
    raw.parse().map_err(|_| SELLER_MESSAGE)
}

/// Number coercion: surrounding whitespace is ignored, blank or missing is zero.
fn parse_amount(raw: Option<&str>) -> Result<Cents, &'static str> {
    let raw = raw.map(str::trim).unwrap_or("");
    let dollars = if raw.is_empty() {
        0.0
    } else {
        raw.parse::<f64>().map_err(|_| AMOUNT_MESSAGE)?
    };

    if !dollars.is_finite() || dollars <= 0.0 {
        return Err(AMOUNT_MESSAGE);
    }
    if dollars > MAX_DOLLARS {
        return Err(AMOUNT_TOO_LARGE_MESSAGE);
    }

    let cents = Cents::from_dollars(dollars).map_err(|_| AMOUNT_MESSAGE)?;
    // Fractions of a cent round to zero here.
    if cents.value() <= 0 {
        return Err(AMOUNT_MESSAGE);
    }
    Ok(cents)
}

fn parse_status(raw: Option<&str>) -> Result<InvoiceStatus, &'static str> {
    raw.ok_or(STATUS_MESSAGE)?.parse().map_err(|_| STATUS_MESSAGE)
}
