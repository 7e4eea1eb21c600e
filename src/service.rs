//! Lookup-then-mutate flows over a loan store.
//!
//! The aggregate methods on [`Loan`](crate::loan::Loan) assume the caller
//! already holds the loan; these functions add the by-id resolution step
//! and write the result back, so callers only need a [`LoanStore`] and,
//! for approvals, an [`InstallmentStore`].

use hourglass_rs::SafeTimeProvider;

use crate::errors::Result;
use crate::repository::{InstallmentStore, LoanStore};
use crate::types::{ActorId, LoanId};

/// approve a pending loan by id: generate its schedule, hand the batch to
/// the installment store, and save the activated loan
pub fn approve_loan<L, S>(
    loans: &mut L,
    installments: &mut S,
    loan_id: LoanId,
    actor: ActorId,
    time_provider: &SafeTimeProvider,
) -> Result<()>
where
    L: LoanStore,
    S: InstallmentStore,
{
    let mut loan = loans.find_by_id(loan_id)?;
    loan.approve_and_persist(installments, actor, time_provider)?;
    log::info!("loan {} approved by {}", loan_id, actor);
    loans.save(&loan)
}

/// reject a pending loan by id
pub fn reject_loan<L: LoanStore>(
    loans: &mut L,
    loan_id: LoanId,
    actor: ActorId,
    time_provider: &SafeTimeProvider,
) -> Result<()> {
    let mut loan = loans.find_by_id(loan_id)?;
    loan.reject(actor, time_provider)?;
    log::info!("loan {} rejected by {}", loan_id, actor);
    loans.save(&loan)
}

/// delete a loan by id; only pending applications may be deleted
pub fn delete_loan<L: LoanStore>(loans: &mut L, loan_id: LoanId) -> Result<()> {
    let loan = loans.find_by_id(loan_id)?;
    loan.ensure_deletable()?;
    log::info!("deleting pending loan {}", loan_id);
    loans.delete(loan_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::errors::LendingError;
    use crate::loan::{ContributorInput, Loan};
    use crate::schedule::Installment;
    use crate::types::{LoanStatus, LoanTerms, PaymentMode};
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemoryLoans {
        loans: HashMap<LoanId, Loan>,
    }

    impl LoanStore for MemoryLoans {
        fn find_by_id(&self, id: LoanId) -> Result<Loan> {
            self.loans
                .get(&id)
                .cloned()
                .ok_or(LendingError::LoanNotFound { id })
        }

        fn save(&mut self, loan: &Loan) -> Result<()> {
            self.loans.insert(loan.id, loan.clone());
            Ok(())
        }

        fn delete(&mut self, id: LoanId) -> Result<()> {
            self.loans.remove(&id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryInstallments {
        saved: Vec<(LoanId, Vec<Installment>)>,
    }

    impl InstallmentStore for MemoryInstallments {
        fn save_all(&mut self, loan_id: LoanId, installments: &[Installment]) -> Result<()> {
            self.saved.push((loan_id, installments.to_vec()));
            Ok(())
        }
    }

    fn test_time() -> SafeTimeProvider {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        SafeTimeProvider::new(TimeSource::Test(start))
    }

    fn pending_loan(time: &SafeTimeProvider) -> Loan {
        Loan::open(
            1,
            Uuid::new_v4(),
            LoanTerms {
                principal: Money::from_major(120_000),
                annual_rate: Rate::from_percentage(12),
                duration_months: 12,
                first_installment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            },
            PaymentMode::BankTransfer,
            None,
            Vec::<ContributorInput>::new(),
            Uuid::new_v4(),
            time,
        )
        .unwrap()
    }

    #[test]
    fn test_approve_loan_activates_and_persists_schedule() {
        let time = test_time();
        let mut loans = MemoryLoans::default();
        let mut installments = MemoryInstallments::default();

        let loan = pending_loan(&time);
        let loan_id = loan.id;
        loans.save(&loan).unwrap();

        approve_loan(&mut loans, &mut installments, loan_id, Uuid::new_v4(), &time).unwrap();

        let stored = loans.find_by_id(loan_id).unwrap();
        assert_eq!(stored.status, LoanStatus::Active);
        assert_eq!(stored.installments.len(), 12);
        assert_eq!(installments.saved.len(), 1);
        assert_eq!(installments.saved[0].0, loan_id);
        assert_eq!(installments.saved[0].1.len(), 12);
    }

    #[test]
    fn test_unknown_loan_id_is_not_found() {
        let time = test_time();
        let mut loans = MemoryLoans::default();
        let mut installments = MemoryInstallments::default();

        let missing = Uuid::new_v4();
        let err =
            approve_loan(&mut loans, &mut installments, missing, Uuid::new_v4(), &time)
                .unwrap_err();
        assert!(matches!(err, LendingError::LoanNotFound { id } if id == missing));
        assert!(installments.saved.is_empty());
    }

    #[test]
    fn test_reject_loan_persists_rejected_status() {
        let time = test_time();
        let mut loans = MemoryLoans::default();

        let loan = pending_loan(&time);
        let loan_id = loan.id;
        loans.save(&loan).unwrap();

        reject_loan(&mut loans, loan_id, Uuid::new_v4(), &time).unwrap();
        assert_eq!(
            loans.find_by_id(loan_id).unwrap().status,
            LoanStatus::Rejected
        );
    }

    #[test]
    fn test_delete_removes_pending_loan_only() {
        let time = test_time();
        let mut loans = MemoryLoans::default();
        let mut installments = MemoryInstallments::default();

        let loan = pending_loan(&time);
        let loan_id = loan.id;
        loans.save(&loan).unwrap();

        delete_loan(&mut loans, loan_id).unwrap();
        assert!(loans.find_by_id(loan_id).is_err());

        // active loans refuse deletion
        let loan = pending_loan(&time);
        let loan_id = loan.id;
        loans.save(&loan).unwrap();
        approve_loan(&mut loans, &mut installments, loan_id, Uuid::new_v4(), &time).unwrap();

        let err = delete_loan(&mut loans, loan_id).unwrap_err();
        assert!(matches!(err, LendingError::InvalidState { .. }));
        assert!(loans.find_by_id(loan_id).is_ok());
    }
}
