//! Monetary amounts stored in minor currency units.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest dollar amount accepted from user input.
///
/// Keeps `dollars * 100` well inside the exactly-representable `f64` range so
/// the rounding below never loses a cent.
pub const MAX_DOLLARS: f64 = 1_000_000_000_000.0;

/// Amount in cents (USD minor units).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a major-unit amount (dollars) to cents, rounding to the nearest cent.
    pub fn from_dollars(dollars: f64) -> DomainResult<Self> {
        if !dollars.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if dollars.abs() > MAX_DOLLARS {
            return Err(DomainError::validation("amount is out of range"));
        }
        Ok(Self((dollars * 100.0).round() as i64))
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Major-unit view of the amount, used to pre-fill edit forms.
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_add(self, other: Cents) -> Option<Cents> {
        self.0.checked_add(other.0).map(Cents)
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Cents> for i64 {
    fn from(value: Cents) -> Self {
        value.0
    }
}

impl Cents {
    /// Total of `amounts`, or `None` if it does not fit in an `i64`.
    pub fn checked_sum<I: IntoIterator<Item = Cents>>(amounts: I) -> Option<Cents> {
        amounts
            .into_iter()
            .try_fold(Cents::ZERO, |total, amount| total.checked_add(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn converts_dollars_with_fraction() {
        assert_eq!(Cents::from_dollars(10.50).unwrap(), Cents::new(1050));
        assert_eq!(Cents::from_dollars(0.29).unwrap(), Cents::new(29));
        assert_eq!(Cents::from_dollars(1.005).unwrap().value(), 100);
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(Cents::from_dollars(f64::NAN).is_err());
        assert!(Cents::from_dollars(f64::INFINITY).is_err());
        assert!(Cents::from_dollars(MAX_DOLLARS * 10.0).is_err());
    }

    #[test]
    fn dollars_view_divides_by_hundred() {
        assert_eq!(Cents::new(123456).as_dollars(), 1234.56);
    }

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(
            Cents::checked_sum([Cents::new(150), Cents::new(250)]),
            Some(Cents::new(400))
        );
        assert_eq!(Cents::checked_sum(std::iter::empty()), Some(Cents::ZERO));

        let max_invoice = Cents::from_dollars(MAX_DOLLARS).unwrap();
        assert_eq!(Cents::checked_sum(std::iter::repeat_n(max_invoice, 100_000)), None);
    }

    proptest! {
        #[test]
        fn whole_cent_amounts_survive_the_dollar_round_trip(cents in 0i64..10_000_000_000) {
            let dollars = Cents::new(cents).as_dollars();
            prop_assert_eq!(Cents::from_dollars(dollars).unwrap().value(), cents);
        }
    }
}
