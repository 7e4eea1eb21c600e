use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a borrower
pub type BorrowerId = Uuid;

/// unique identifier for a profit-share contributor
pub type ContributorId = Uuid;

/// identifier of the acting user, stamped on every mutation
pub type ActorId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// created, awaiting approval or rejection
    Pending,
    /// approved, schedule generated, repayments running
    Active,
    /// declined at review, no schedule exists
    Rejected,
    /// borrower stopped servicing the loan
    Defaulter,
    /// fully repaid
    Closed,
}

/// installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// due but not yet received
    Pending,
    /// payment received and confirmed
    Approved,
    /// payment attempted and failed
    Failed,
    /// settled early as part of a foreclosure
    Foreclosed,
}

/// how a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    BankTransfer,
    Upi,
    Cheque,
}

/// immutable financial terms of a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub duration_months: u32,
    pub first_installment_date: NaiveDate,
}

/// which installment formula to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationMethod {
    /// interest computed once over the full principal and term,
    /// divided evenly across installments
    FlatRate,
    /// interest computed on the outstanding balance each period
    ReducingBalance,
}

/// quote returned by the amortization calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationQuote {
    pub installment_amount: Money,
    pub total_payable: Money,
    pub total_interest: Money,
}

/// a contributor's computed stake in a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionShare {
    pub share_percent: Rate,
    pub expected_profit: Money,
}

/// co-investor funding part of a loan's principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub contributor_id: ContributorId,
    pub amount: Money,
    pub share_percent: Rate,
    pub annual_rate: Rate,
    pub expected_profit: Money,
    pub added_by: ActorId,
}

/// roll-up of a loan's repayment progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_payable: Money,
    pub received_amount: Money,
    pub outstanding_amount: Money,
    pub expected_profit: Money,
    pub received_installments: u32,
    pub remaining_installments: u32,
}
