use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::types::ContributionShare;

/// profit-share calculator for co-investors
pub struct ContributionCalculator;

impl ContributionCalculator {
    /// compute a contributor's percentage share of the principal and the
    /// profit they can expect over the loan term
    ///
    /// All inputs must be strictly positive. No rounding is applied here;
    /// presentation-layer rounding to 2 decimal places happens in reporting.
    pub fn compute_share(
        loan_principal: Money,
        contributed_amount: Money,
        annual_rate: Rate,
        duration_months: u32,
    ) -> Result<ContributionShare> {
        if !loan_principal.is_positive() {
            return Err(LendingError::invalid_argument(
                "loan amount must be greater than zero",
            ));
        }
        if !contributed_amount.is_positive() {
            return Err(LendingError::invalid_argument(
                "contribute amount must be greater than zero",
            ));
        }
        if !annual_rate.is_positive() {
            return Err(LendingError::invalid_argument(
                "interest rate must be greater than zero",
            ));
        }
        if duration_months == 0 {
            return Err(LendingError::invalid_argument(
                "loan duration must be greater than zero",
            ));
        }

        let share_percent = Rate::from_percentage_decimal(
            contributed_amount.as_decimal() / loan_principal.as_decimal() * Decimal::from(100),
        );
        let years = Decimal::from(duration_months) / Decimal::from(12);
        let expected_profit = contributed_amount * annual_rate.as_decimal() * years;

        log::debug!(
            "contribution of {} against {}: share {}, expected profit {}",
            contributed_amount,
            loan_principal,
            share_percent,
            expected_profit
        );

        Ok(ContributionShare {
            share_percent,
            expected_profit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_share() {
        let share = ContributionCalculator::compute_share(
            Money::from_major(100_000),
            Money::from_major(25_000),
            Rate::from_percentage(12),
            12,
        )
        .unwrap();

        assert_eq!(share.share_percent.as_percentage(), dec!(25));
        assert_eq!(share.expected_profit, Money::from_major(3_000));
    }

    #[test]
    fn test_fractional_term_profit() {
        // 6 months at 12% on 10000 contributed: half a year of interest
        let share = ContributionCalculator::compute_share(
            Money::from_major(40_000),
            Money::from_major(10_000),
            Rate::from_percentage(12),
            6,
        )
        .unwrap();

        assert_eq!(share.share_percent.as_percentage(), dec!(25));
        assert_eq!(share.expected_profit, Money::from_major(600));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        let principal = Money::from_major(100_000);
        let amount = Money::from_major(25_000);
        let rate = Rate::from_percentage(12);

        let cases: Vec<Result<ContributionShare>> = vec![
            ContributionCalculator::compute_share(Money::ZERO, amount, rate, 12),
            ContributionCalculator::compute_share(principal, Money::ZERO, rate, 12),
            ContributionCalculator::compute_share(principal, amount, Rate::ZERO, 12),
            ContributionCalculator::compute_share(principal, amount, rate, 0),
            ContributionCalculator::compute_share(
                Money::from_decimal(dec!(-5)),
                amount,
                rate,
                12,
            ),
        ];

        for result in cases {
            assert!(matches!(
                result,
                Err(LendingError::InvalidArgument { .. })
            ));
        }
    }
}
