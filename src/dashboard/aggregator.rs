use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dashboard::growth::{growth_percent, month_to_date_windows};
use crate::decimal::Money;
use crate::repository::{BorrowerDirectory, LoanDirectory, LoanRecord};
use crate::types::LoanStatus;

/// derived point-in-time dashboard figures; computed, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub total_loans: u64,
    pub active_loans: u64,
    pub closed_loans: u64,
    pub total_borrowers: u64,
    pub total_loan_amount: Money,
    pub active_loan_amount: Money,
    pub closed_loan_amount: Money,
    /// month-to-date growth percentages, one decimal place
    pub total_loans_increase: Decimal,
    pub active_loans_increase: Decimal,
    pub closed_loans_increase: Decimal,
    pub total_borrowers_increase: Decimal,
}

/// computes dashboard counts, sums, and month-to-date growth over the
/// persisted loans and borrowers
pub struct DashboardAggregator<'a, L, B> {
    loans: &'a L,
    borrowers: &'a B,
}

fn is_active(loan: &LoanRecord) -> bool {
    loan.status == LoanStatus::Active
}

fn is_closed(loan: &LoanRecord) -> bool {
    loan.status == LoanStatus::Closed
}

/// "total" deliberately counts everything except rejected applications
fn is_not_rejected(loan: &LoanRecord) -> bool {
    loan.status != LoanStatus::Rejected
}

impl<'a, L: LoanDirectory, B: BorrowerDirectory> DashboardAggregator<'a, L, B> {
    pub fn new(loans: &'a L, borrowers: &'a B) -> Self {
        Self { loans, borrowers }
    }

    /// counts and sums over the requested creation-date range, with growth
    /// computed against the month-to-date windows anchored at "today"
    pub fn snapshot(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> DashboardSnapshot {
        log::info!("building dashboard snapshot for {} to {}", range_start, range_end);

        let loans = self.loans.loans_created_between(range_start, range_end);
        log::debug!("fetched {} loans in range", loans.len());

        let mut total_loans = 0u64;
        let mut active_loans = 0u64;
        let mut closed_loans = 0u64;
        let mut total_loan_amount = Money::ZERO;
        let mut active_loan_amount = Money::ZERO;
        let mut closed_loan_amount = Money::ZERO;

        for loan in &loans {
            if is_active(loan) {
                active_loans += 1;
                active_loan_amount += loan.amount;
            }
            if is_closed(loan) {
                closed_loans += 1;
                closed_loan_amount += loan.amount;
            }
            if is_not_rejected(loan) {
                total_loans += 1;
                total_loan_amount += loan.amount;
            }
        }

        let total_borrowers = self.borrowers.borrowers_created_between(range_start, range_end);
        let today = time_provider.now().date_naive();

        DashboardSnapshot {
            total_loans,
            active_loans,
            closed_loans,
            total_borrowers,
            total_loan_amount,
            active_loan_amount,
            closed_loan_amount,
            total_loans_increase: self.loan_growth(today, is_not_rejected),
            active_loans_increase: self.loan_growth(today, is_active),
            closed_loans_increase: self.loan_growth(today, is_closed),
            total_borrowers_increase: self.borrower_growth(today),
        }
    }

    /// month-to-date loan-count growth for loans matching the predicate
    fn loan_growth(&self, today: NaiveDate, predicate: fn(&LoanRecord) -> bool) -> Decimal {
        let (current, previous) = month_to_date_windows(today);

        let current_count = self
            .loans
            .loans_created_between(current.start, current.end)
            .into_iter()
            .filter(|l| predicate(l))
            .count() as u64;
        let previous_count = self
            .loans
            .loans_created_between(previous.start, previous.end)
            .into_iter()
            .filter(|l| predicate(l))
            .count() as u64;

        log::debug!(
            "loan growth windows: {} current, {} previous",
            current_count,
            previous_count
        );
        growth_percent(current_count, previous_count)
    }

    /// month-to-date borrower-count growth
    fn borrower_growth(&self, today: NaiveDate) -> Decimal {
        let (current, previous) = month_to_date_windows(today);

        let current_count = self
            .borrowers
            .borrowers_created_between(current.start, current.end);
        let previous_count = self
            .borrowers
            .borrowers_created_between(previous.start, previous.end);

        growth_percent(current_count, previous_count)
    }
}
