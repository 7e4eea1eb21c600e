use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::loan::Loan;
use crate::schedule::Installment;
use crate::types::{LoanId, LoanStatus};

/// thin read model of a persisted loan, as the dashboard sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub status: LoanStatus,
    pub amount: Money,
    pub created_on: NaiveDate,
}

/// persistence contract for installment batches
///
/// Implementors must write the batch atomically; the core performs no
/// locking and assumes a single approval per loan reaches this point.
pub trait InstallmentStore {
    fn save_all(&mut self, loan_id: LoanId, installments: &[Installment]) -> Result<()>;
}

/// persistence contract for loan aggregates
///
/// `find_by_id` fails with `LoanNotFound` when the id does not resolve;
/// `delete` cascades to the loan's installments and contributors.
pub trait LoanStore {
    fn find_by_id(&self, id: LoanId) -> Result<Loan>;
    fn save(&mut self, loan: &Loan) -> Result<()>;
    fn delete(&mut self, id: LoanId) -> Result<()>;
}

/// read contract over persisted loans
pub trait LoanDirectory {
    fn loans_created_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<LoanRecord>;
}

/// read contract over persisted borrowers
pub trait BorrowerDirectory {
    fn borrowers_created_between(&self, start: NaiveDate, end: NaiveDate) -> u64;
}
