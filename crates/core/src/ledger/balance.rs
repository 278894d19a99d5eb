//! Entry balance arithmetic.
//!
//! An entry's balance is the triple (total, settled, remaining) plus the
//! status derived from it. All mutation goes through [`EntryBalance::settle`],
//! which checks the caller's amount and re-derives every field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subledger_shared::types::AMOUNT_SCALE;

use super::error::LedgerError;
use super::types::SettlementStatus;

/// Balance of a ledger entry at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBalance {
    /// Total amount, fixed at creation.
    pub total: Decimal,
    /// Cumulative settled amount.
    pub settled: Decimal,
    /// `max(0, total - settled)`.
    pub remaining: Decimal,
    /// Derived status.
    pub status: SettlementStatus,
}

impl EntryBalance {
    /// Creates the balance of a freshly created entry.
    #[must_use]
    pub fn opening(total: Decimal) -> Self {
        Self::from_amounts(total, Decimal::ZERO)
    }

    /// Derives remaining and status from total and settled.
    #[must_use]
    pub fn from_amounts(total: Decimal, settled: Decimal) -> Self {
        let remaining = (total - settled).max(Decimal::ZERO);
        Self {
            total,
            settled,
            remaining,
            status: SettlementStatus::derive(total, settled),
        }
    }

    /// Applies a settlement of `amount` and returns the resulting balance.
    ///
    /// # Errors
    ///
    /// - `AlreadySettled` if nothing remains
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `AmountPrecision` if `amount` has more than [`AMOUNT_SCALE`] decimal places
    /// - `ExceedsRemaining` if `amount` is larger than the remaining balance
    /// - `Inconsistent` if the stored balance does not satisfy its invariants
    pub fn settle(&self, amount: Decimal) -> Result<Self, LedgerError> {
        self.check()?;

        if self.status == SettlementStatus::Paid {
            return Err(LedgerError::AlreadySettled);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        check_precision(amount)?;
        if amount > self.remaining {
            return Err(LedgerError::ExceedsRemaining {
                requested: amount,
                remaining: self.remaining,
            });
        }

        let next = Self::from_amounts(self.total, self.settled + amount);
        next.check()?;
        Ok(next)
    }

    /// Returns the amount a full settlement would apply.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySettled` if nothing remains.
    pub fn full_settlement_amount(&self) -> Result<Decimal, LedgerError> {
        self.check()?;
        if self.status == SettlementStatus::Paid {
            return Err(LedgerError::AlreadySettled);
        }
        Ok(self.remaining)
    }

    /// Verifies the balance invariants.
    ///
    /// # Errors
    ///
    /// Returns `Inconsistent` describing the first violated invariant.
    pub fn check(&self) -> Result<(), LedgerError> {
        if self.total <= Decimal::ZERO {
            return Err(LedgerError::Inconsistent(format!(
                "total {} is not positive",
                self.total
            )));
        }
        if self.settled < Decimal::ZERO || self.settled > self.total {
            return Err(LedgerError::Inconsistent(format!(
                "settled {} outside 0..={}",
                self.settled, self.total
            )));
        }
        let expected = Self::from_amounts(self.total, self.settled);
        if self.remaining != expected.remaining {
            return Err(LedgerError::Inconsistent(format!(
                "remaining {} != {}",
                self.remaining, expected.remaining
            )));
        }
        if self.status != expected.status {
            return Err(LedgerError::Inconsistent(format!(
                "status {} != {}",
                self.status, expected.status
            )));
        }
        Ok(())
    }
}

/// Checks that `amount` can be stored without rounding.
///
/// Trailing zeros do not count: `1.50000` is accepted, `0.00001` is not.
///
/// # Errors
///
/// Returns `AmountPrecision` if `amount` has more than [`AMOUNT_SCALE`]
/// significant decimal places.
pub fn check_precision(amount: Decimal) -> Result<(), LedgerError> {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::AmountPrecision {
            amount,
            max_scale: AMOUNT_SCALE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_opening_balance() {
        let balance = EntryBalance::opening(dec!(250000));
        assert_eq!(balance.settled, Decimal::ZERO);
        assert_eq!(balance.remaining, dec!(250000));
        assert_eq!(balance.status, SettlementStatus::Unpaid);
        assert!(balance.check().is_ok());
    }

    #[test]
    fn test_partial_then_full_settlement() {
        let balance = EntryBalance::opening(dec!(1000000));

        let balance = balance.settle(dec!(400000)).unwrap();
        assert_eq!(balance.settled, dec!(400000));
        assert_eq!(balance.remaining, dec!(600000));
        assert_eq!(balance.status, SettlementStatus::Partial);

        let err = balance.settle(dec!(700000)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ExceedsRemaining { remaining, .. } if remaining == dec!(600000)
        ));

        let balance = balance.settle(dec!(600000)).unwrap();
        assert_eq!(balance.settled, dec!(1000000));
        assert_eq!(balance.remaining, Decimal::ZERO);
        assert_eq!(balance.status, SettlementStatus::Paid);
    }

    #[test]
    fn test_settle_rejects_paid_entry() {
        let balance = EntryBalance::from_amounts(dec!(100), dec!(100));
        assert!(matches!(
            balance.settle(dec!(1)),
            Err(LedgerError::AlreadySettled)
        ));
        assert!(matches!(
            balance.full_settlement_amount(),
            Err(LedgerError::AlreadySettled)
        ));
    }

    #[test]
    fn test_settle_rejects_non_positive_amount() {
        let balance = EntryBalance::opening(dec!(100));
        assert!(matches!(
            balance.settle(Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount)
        ));
        assert!(matches!(
            balance.settle(dec!(-5)),
            Err(LedgerError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_full_settlement_amount_is_remaining() {
        let balance = EntryBalance::from_amounts(dec!(100), dec!(35.50));
        assert_eq!(balance.full_settlement_amount().unwrap(), dec!(64.50));
    }

    #[test]
    fn test_check_detects_drift() {
        let drifted = EntryBalance {
            total: dec!(100),
            settled: dec!(40),
            remaining: dec!(70),
            status: SettlementStatus::Partial,
        };
        assert!(matches!(drifted.check(), Err(LedgerError::Inconsistent(_))));

        let wrong_status = EntryBalance {
            total: dec!(100),
            settled: dec!(0),
            remaining: dec!(100),
            status: SettlementStatus::Partial,
        };
        assert!(matches!(
            wrong_status.settle(dec!(10)),
            Err(LedgerError::Inconsistent(_))
        ));
    }

    #[rstest]
    #[case::below_smallest_unit(dec!(0.00001))]
    #[case::half_unit_past_scale(dec!(33.33335))]
    #[case::one_unit_past_scale(dec!(33.33334))]
    fn test_settle_rejects_excess_precision(#[case] amount: Decimal) {
        let balance = EntryBalance::opening(dec!(100));
        assert!(matches!(
            balance.settle(amount),
            Err(LedgerError::AmountPrecision { max_scale: 4, .. })
        ));
    }

    #[test]
    fn test_settle_keeps_exact_amount_at_stored_scale() {
        let balance = EntryBalance::opening(dec!(100)).settle(dec!(33.3333)).unwrap();
        assert_eq!(balance.settled, dec!(33.3333));
        assert_eq!(balance.remaining, dec!(66.6667));
        assert_eq!(balance.status, SettlementStatus::Partial);
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        assert!(check_precision(dec!(12.500000)).is_ok());
        assert!(check_precision(dec!(12.00001)).is_err());
    }
}
