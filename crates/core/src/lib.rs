//! `invoicedash-core`: shared domain building blocks.
//!
//! Identifiers, money and the domain error model. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{InvoiceId, SellerId, UserId};
pub use money::Cents;
