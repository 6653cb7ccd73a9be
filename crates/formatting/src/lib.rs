//! `invoicedash-formatting`: presentation helpers for the dashboard views.
//!
//! Pure, deterministic functions. Safe to call from any number of threads.

pub mod chart;
pub mod currency;
pub mod date;
pub mod pagination;

use thiserror::Error;

pub use chart::{Income, YAxis, generate_y_axis};
pub use currency::format_currency;
pub use date::{DEFAULT_LOCALE, format_date_to_local};
pub use pagination::{PageToken, generate_pagination};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("cannot build a chart axis from an empty series")]
    EmptySeries,

    #[error("unparseable date: {0:?}")]
    InvalidDate(String),

    #[error("income {0} is too large to chart")]
    OutOfRange(i64),
}
