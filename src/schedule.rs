use chrono::{DateTime, Months, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculators::AmortizationCalculator;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::types::{ActorId, InstallmentStatus, LoanId, LoanTerms, PaymentMode};

/// one scheduled periodic payment (EMI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub loan_id: LoanId,
    pub sequence: u32,
    pub due_date: NaiveDate,
    pub scheduled_amount: Money,
    pub received_amount: Money,
    /// principal plus interest still outstanding after this installment
    pub remaining_balance: Money,
    pub status: InstallmentStatus,
    pub payment_mode: Option<PaymentMode>,
    pub receiver_name: Option<String>,
    pub notes: Option<String>,
    pub proof_reference: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub added_by: ActorId,
    pub added_at: DateTime<Utc>,
    pub updated_by: Option<ActorId>,
}

impl Installment {
    /// record a payment against this installment
    pub fn record_payment(&mut self, receipt: PaymentReceipt, actor: ActorId) {
        self.received_amount = receipt.amount;
        self.status = receipt.status;
        self.payment_mode = Some(receipt.payment_mode);
        self.received_date = Some(receipt.received_date);
        self.receiver_name = receipt.receiver_name;
        self.notes = receipt.notes;
        self.proof_reference = receipt.proof_reference;
        self.updated_by = Some(actor);
    }
}

/// details of a received payment, applied to a single installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub amount: Money,
    pub status: InstallmentStatus,
    pub payment_mode: PaymentMode,
    pub received_date: NaiveDate,
    pub receiver_name: Option<String>,
    pub notes: Option<String>,
    pub proof_reference: Option<String>,
}

/// the full installment schedule for a loan
#[derive(Debug, Clone)]
pub struct InstallmentSchedule {
    pub loan_id: LoanId,
    pub installment_amount: Money,
    pub installments: Vec<Installment>,
}

impl InstallmentSchedule {
    /// generate the ordered installment sequence for a loan
    ///
    /// Runs once per approval. Fails fast on the first invalid term. The
    /// final installment's remaining balance is exactly zero because the
    /// running balance starts at `installment * months` and is decremented
    /// by the installment amount each iteration.
    pub fn generate(
        loan_id: LoanId,
        terms: &LoanTerms,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        if !terms.principal.is_positive() {
            return Err(LendingError::invalid_argument(
                "loan amount must be greater than zero",
            ));
        }
        if !terms.annual_rate.is_positive() {
            log::error!("invalid interest rate: {}", terms.annual_rate);
            return Err(LendingError::invalid_argument(
                "interest rate must be greater than zero",
            ));
        }
        if terms.duration_months == 0 {
            log::error!("invalid loan duration: {}", terms.duration_months);
            return Err(LendingError::invalid_argument(
                "loan duration must be greater than zero",
            ));
        }

        log::info!("generating installment schedule for loan {}", loan_id);

        let months = terms.duration_months;
        let installment_amount = AmortizationCalculator::flat_rate()
            .installment_amount(terms.principal, terms.annual_rate, months)
            .round_to_unit();

        let now = time_provider.now();
        let mut remaining = installment_amount * Decimal::from(months);
        let mut installments = Vec::with_capacity(months as usize);

        for i in 1..=months {
            let due_date = add_months(terms.first_installment_date, i - 1);
            remaining -= installment_amount;

            installments.push(Installment {
                loan_id,
                sequence: i,
                due_date,
                scheduled_amount: installment_amount,
                received_amount: Money::ZERO,
                remaining_balance: remaining,
                status: InstallmentStatus::Pending,
                payment_mode: None,
                receiver_name: None,
                notes: None,
                proof_reference: None,
                received_date: None,
                added_by: actor,
                added_at: now,
                updated_by: None,
            });
        }

        log::info!(
            "installment schedule generated for loan {}: {} x {}",
            loan_id,
            months,
            installment_amount
        );

        Ok(Self {
            loan_id,
            installment_amount,
            installments,
        })
    }

    /// installments due within the given date range, ordered by due date
    pub fn due_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Installment> {
        let mut due: Vec<&Installment> = self
            .installments
            .iter()
            .filter(|i| i.due_date >= start && i.due_date <= end)
            .collect();
        due.sort_by_key(|i| i.due_date);
        due
    }
}

/// add calendar months, clamping to the last day of the target month
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
