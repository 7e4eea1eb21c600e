use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::types::{AmortizationMethod, AmortizationQuote};

/// installment amount calculator
///
/// Pure arithmetic, no validation: callers (the scheduler and quote
/// endpoints) are responsible for rejecting non-positive terms first.
pub struct AmortizationCalculator {
    method: AmortizationMethod,
}

impl AmortizationCalculator {
    pub fn new(method: AmortizationMethod) -> Self {
        Self { method }
    }

    /// flat-rate calculator, the method exercised by every live call path
    pub fn flat_rate() -> Self {
        Self::new(AmortizationMethod::FlatRate)
    }

    /// quote installment amount, total payable, and total interest
    ///
    /// The installment is rounded half-up to a whole currency unit, and the
    /// totals are recomputed from the rounded installment so that
    /// `installment_amount * months == total_payable` holds exactly. The
    /// quote may therefore drift from the unrounded ideal by up to
    /// 0.5 * months currency units.
    pub fn quote(&self, principal: Money, annual_rate: Rate, months: u32) -> AmortizationQuote {
        let raw = match self.method {
            AmortizationMethod::FlatRate => flat_rate_installment(principal, annual_rate, months),
            AmortizationMethod::ReducingBalance => {
                reducing_balance_installment(principal, annual_rate, months)
            }
        };

        let installment_amount = raw.round_to_unit();
        let total_payable = installment_amount * Decimal::from(months);
        let total_interest = total_payable - principal;

        log::debug!(
            "quoted {:?} installment {} over {} months (total payable {})",
            self.method,
            installment_amount,
            months,
            total_payable
        );

        AmortizationQuote {
            installment_amount,
            total_payable,
            total_interest,
        }
    }

    /// unrounded installment amount for the configured method
    pub fn installment_amount(&self, principal: Money, annual_rate: Rate, months: u32) -> Money {
        match self.method {
            AmortizationMethod::FlatRate => flat_rate_installment(principal, annual_rate, months),
            AmortizationMethod::ReducingBalance => {
                reducing_balance_installment(principal, annual_rate, months)
            }
        }
    }
}

/// flat rate: interest on the full principal over the full term,
/// spread evenly across installments
fn flat_rate_installment(principal: Money, annual_rate: Rate, months: u32) -> Money {
    let years = Decimal::from(months) / Decimal::from(12);
    let total_interest = principal * annual_rate.as_decimal() * years;
    let total_payable = principal + total_interest;
    total_payable / Decimal::from(months)
}

/// reducing balance: EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
/// with monthly rate r = annual / 12
fn reducing_balance_installment(principal: Money, annual_rate: Rate, months: u32) -> Money {
    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return principal / Decimal::from(months);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_rate_reference_quote() {
        let quote = AmortizationCalculator::flat_rate().quote(
            Money::from_major(120_000),
            Rate::from_percentage(12),
            12,
        );

        assert_eq!(quote.installment_amount, Money::from_major(11_200));
        assert_eq!(quote.total_payable, Money::from_major(134_400));
        assert_eq!(quote.total_interest, Money::from_major(14_400));
    }

    #[test]
    fn test_installment_times_months_equals_total() {
        let cases = [
            (100_000i64, 10u32, 24u32),
            (50_000, 13, 18),
            (7_777, 9, 7),
            (1, 1, 1),
        ];

        for (principal, rate, months) in cases {
            let quote = AmortizationCalculator::flat_rate().quote(
                Money::from_major(principal),
                Rate::from_percentage(rate),
                months,
            );
            assert!(quote.installment_amount.is_positive());
            assert_eq!(
                quote.installment_amount * Decimal::from(months),
                quote.total_payable
            );
        }
    }

    #[test]
    fn test_rounding_drift_within_half_unit_per_month() {
        let principal = Money::from_major(99_991);
        let rate = Rate::from_percentage(11);
        let months = 23u32;

        let quote = AmortizationCalculator::flat_rate().quote(principal, rate, months);

        let ideal = flat_rate_installment(principal, rate, months) * Decimal::from(months);
        let drift = (quote.total_payable - ideal).abs();
        let bound = Money::from_decimal(dec!(0.5) * Decimal::from(months));
        assert!(drift <= bound, "drift {} exceeds bound {}", drift, bound);
    }

    #[test]
    fn test_reducing_balance_exceeds_flat_rate_never() {
        // flat rate charges interest on the full principal for the full
        // term, so its raw installment is at least the reducing-balance one
        let principal = Money::from_major(120_000);
        let rate = Rate::from_percentage(12);

        let flat = flat_rate_installment(principal, rate, 12);
        let reducing = reducing_balance_installment(principal, rate, 12);
        assert!(reducing <= flat);
        assert!(reducing.is_positive());
    }

    #[test]
    fn test_reducing_balance_zero_rate_divides_evenly() {
        let emi = reducing_balance_installment(Money::from_major(12_000), Rate::ZERO, 12);
        assert_eq!(emi, Money::from_major(1_000));
    }
}
