//! Invoicing domain module.
//!
//! Invoice records, the invoice form schema and the caller-facing result
//! shapes of the invoice mutations. Pure logic: no IO, no HTTP, no storage.

pub mod form;
pub mod invoice;
pub mod state;

pub use form::{Field, FieldErrors, InvoiceForm, ValidatedInvoice, validate};
pub use invoice::{InvoiceChanges, InvoiceRecord, InvoiceStatus, NewInvoice, ParseStatusError};
pub use state::{INVOICES_PATH, Mutation, Outcome, State};
