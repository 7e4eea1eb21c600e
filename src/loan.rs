use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculators::ContributionCalculator;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::events::{Event, EventStore};
use crate::repository::InstallmentStore;
use crate::schedule::{Installment, InstallmentSchedule, PaymentReceipt};
use crate::types::{
    ActorId, BorrowerId, Contributor, ContributorId, InstallmentStatus, LoanId, LoanStatus,
    LoanSummary, LoanTerms, PaymentMode,
};

/// requested stake of a co-investor; shares and profit are always
/// recomputed by the core, never taken from the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributorInput {
    pub contributor_id: ContributorId,
    pub amount: Money,
}

/// loan aggregate: terms, status, owned installments and contributors
///
/// Status transitions are one-directional. Pending may move to Active or
/// Rejected; Active may move to Defaulter or Closed. Nothing reverts to
/// Pending and nothing regenerates an existing schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower_id: BorrowerId,
    pub account_number: String,
    pub terms: LoanTerms,
    pub status: LoanStatus,
    pub payment_mode: PaymentMode,
    pub notes: Option<String>,
    pub expected_profit: Money,
    pub installments: Vec<Installment>,
    pub contributors: Vec<Contributor>,
    pub added_by: ActorId,
    pub added_at: DateTime<Utc>,
    pub updated_by: Option<ActorId>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_empty_store")]
    pub events: EventStore,
}

fn is_empty_store(store: &EventStore) -> bool {
    store.events().is_empty()
}

impl Loan {
    /// open a new loan account in Pending status
    ///
    /// The expected profit over the whole principal and each contributor's
    /// share are computed here; positivity of the terms is enforced by the
    /// contribution calculator.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        account_seq: u64,
        borrower_id: BorrowerId,
        terms: LoanTerms,
        payment_mode: PaymentMode,
        notes: Option<String>,
        contributors: Vec<ContributorInput>,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let expected_profit = ContributionCalculator::compute_share(
            terms.principal,
            terms.principal,
            terms.annual_rate,
            terms.duration_months,
        )?
        .expected_profit;

        let id = Uuid::new_v4();
        let now = time_provider.now();

        let mut loan = Self {
            id,
            borrower_id,
            account_number: format!("LN-{:07}", account_seq),
            terms,
            status: LoanStatus::Pending,
            payment_mode,
            notes,
            expected_profit,
            installments: Vec::new(),
            contributors: Vec::new(),
            added_by: actor,
            added_at: now,
            updated_by: None,
            updated_at: None,
            events: EventStore::new(),
        };

        for input in contributors {
            let share = ContributionCalculator::compute_share(
                terms.principal,
                input.amount,
                terms.annual_rate,
                terms.duration_months,
            )?;
            loan.contributors.push(Contributor {
                contributor_id: input.contributor_id,
                amount: input.amount,
                share_percent: share.share_percent,
                annual_rate: terms.annual_rate,
                expected_profit: share.expected_profit,
                added_by: actor,
            });
        }

        log::info!("loan account {} opened for borrower {}", loan.account_number, borrower_id);
        loan.events.emit(Event::LoanOpened {
            loan_id: id,
            principal: terms.principal,
            duration_months: terms.duration_months,
            actor,
            timestamp: now,
        });

        Ok(loan)
    }

    /// approve a pending loan: transition to Active and generate the
    /// installment schedule
    ///
    /// Guarded twice: the loan must be Pending, and no schedule may already
    /// exist. The second guard makes repeated or racing approvals fail
    /// instead of silently duplicating the schedule.
    pub fn approve(
        &mut self,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<&[Installment]> {
        if self.status != LoanStatus::Pending {
            return Err(LendingError::invalid_state(self.status, "Pending"));
        }
        if !self.installments.is_empty() {
            return Err(LendingError::invalid_state(
                self.status,
                "Pending with no existing schedule",
            ));
        }

        let schedule =
            InstallmentSchedule::generate(self.id, &self.terms, actor, time_provider)?;
        let first_due_date = schedule.installments[0].due_date;
        let installment_count = schedule.installments.len() as u32;
        let installment_amount = schedule.installment_amount;
        self.installments = schedule.installments;

        let now = time_provider.now();
        self.transition(LoanStatus::Active, actor, now);

        self.events.emit(Event::LoanApproved {
            loan_id: self.id,
            actor,
            timestamp: now,
        });
        self.events.emit(Event::ScheduleGenerated {
            loan_id: self.id,
            installments: installment_count,
            installment_amount,
            first_due_date,
        });

        log::info!("loan {} approved, {} installments scheduled", self.account_number, installment_count);
        Ok(&self.installments)
    }

    /// approve and hand the generated batch to the installment store in
    /// one step; the store is expected to write it atomically
    pub fn approve_and_persist<S: InstallmentStore>(
        &mut self,
        store: &mut S,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.approve(actor, time_provider)?;
        store.save_all(self.id, &self.installments)
    }

    /// reject a pending loan; no schedule is generated
    pub fn reject(&mut self, actor: ActorId, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.status != LoanStatus::Pending {
            return Err(LendingError::invalid_state(self.status, "Pending"));
        }

        let now = time_provider.now();
        self.transition(LoanStatus::Rejected, actor, now);
        self.events.emit(Event::LoanRejected {
            loan_id: self.id,
            actor,
            timestamp: now,
        });

        log::info!("loan {} rejected", self.account_number);
        Ok(())
    }

    /// close an active loan once fully repaid
    pub fn close(&mut self, actor: ActorId, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(LendingError::invalid_state(self.status, "Active"));
        }

        let now = time_provider.now();
        self.transition(LoanStatus::Closed, actor, now);
        self.events.emit(Event::LoanClosed {
            loan_id: self.id,
            actor,
            timestamp: now,
        });
        Ok(())
    }

    /// mark an active loan as in default
    pub fn mark_defaulter(
        &mut self,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(LendingError::invalid_state(self.status, "Active"));
        }

        let now = time_provider.now();
        self.transition(LoanStatus::Defaulter, actor, now);
        self.events.emit(Event::LoanMarkedDefaulter {
            loan_id: self.id,
            actor,
            timestamp: now,
        });
        Ok(())
    }

    /// update terms and contributor stakes while the loan is still Pending
    ///
    /// Contributors are merged by identity: stakes present in the request
    /// are added or updated with freshly computed shares, stakes absent
    /// from it are removed. No installments exist yet, so nothing is
    /// rescheduled.
    pub fn update(
        &mut self,
        terms: LoanTerms,
        contributors: Vec<ContributorInput>,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if self.status != LoanStatus::Pending {
            return Err(LendingError::invalid_state(self.status, "Pending"));
        }

        let expected_profit = ContributionCalculator::compute_share(
            terms.principal,
            terms.principal,
            terms.annual_rate,
            terms.duration_months,
        )?
        .expected_profit;

        // compute all shares before touching state
        let mut incoming = Vec::with_capacity(contributors.len());
        for input in &contributors {
            let share = ContributionCalculator::compute_share(
                terms.principal,
                input.amount,
                terms.annual_rate,
                terms.duration_months,
            )?;
            incoming.push((*input, share));
        }

        self.terms = terms;
        self.expected_profit = expected_profit;

        let keep: Vec<ContributorId> = contributors.iter().map(|c| c.contributor_id).collect();
        let loan_id = self.id;
        let events = &mut self.events;
        self.contributors.retain(|existing| {
            let kept = keep.contains(&existing.contributor_id);
            if !kept {
                events.emit(Event::ContributorRemoved {
                    loan_id,
                    contributor_id: existing.contributor_id,
                });
            }
            kept
        });

        for (input, share) in incoming {
            match self
                .contributors
                .iter_mut()
                .find(|c| c.contributor_id == input.contributor_id)
            {
                Some(existing) => {
                    existing.amount = input.amount;
                    existing.share_percent = share.share_percent;
                    existing.annual_rate = terms.annual_rate;
                    existing.expected_profit = share.expected_profit;
                    self.events.emit(Event::ContributorUpdated {
                        loan_id,
                        contributor_id: input.contributor_id,
                        amount: input.amount,
                    });
                }
                None => {
                    self.contributors.push(Contributor {
                        contributor_id: input.contributor_id,
                        amount: input.amount,
                        share_percent: share.share_percent,
                        annual_rate: terms.annual_rate,
                        expected_profit: share.expected_profit,
                        added_by: actor,
                    });
                    self.events.emit(Event::ContributorAdded {
                        loan_id,
                        contributor_id: input.contributor_id,
                        amount: input.amount,
                    });
                }
            }
        }

        let now = time_provider.now();
        self.updated_by = Some(actor);
        self.updated_at = Some(now);
        self.events.emit(Event::TermsUpdated {
            loan_id,
            principal: self.terms.principal,
            duration_months: self.terms.duration_months,
            actor,
            timestamp: now,
        });

        log::info!("loan {} updated", self.account_number);
        Ok(())
    }

    /// deletion is only permitted while the loan is still Pending
    ///
    /// The removal itself is the repository's cascade; this is the guard
    /// callers must pass first.
    pub fn ensure_deletable(&self) -> Result<()> {
        if self.status != LoanStatus::Pending {
            return Err(LendingError::invalid_state(self.status, "Pending"));
        }
        Ok(())
    }

    /// record a payment against a single installment
    pub fn record_payment(
        &mut self,
        sequence: u32,
        receipt: PaymentReceipt,
        actor: ActorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let loan_id = self.id;
        let installment = self
            .installments
            .iter_mut()
            .find(|i| i.sequence == sequence)
            .ok_or(LendingError::InstallmentNotFound { loan_id, sequence })?;

        let amount = receipt.amount;
        installment.record_payment(receipt, actor);

        let now = time_provider.now();
        self.updated_by = Some(actor);
        self.updated_at = Some(now);
        self.events.emit(Event::PaymentRecorded {
            loan_id,
            sequence,
            amount,
            actor,
            timestamp: now,
        });

        log::info!("payment of {} recorded against loan {} installment {}", amount, self.account_number, sequence);
        Ok(())
    }

    /// roll up repayment progress for reporting, rounded to 2 decimal
    /// places at this presentation edge
    pub fn summary(&self) -> LoanSummary {
        let total_payable = self
            .installments
            .iter()
            .fold(Money::ZERO, |acc, i| acc + i.scheduled_amount);

        let received: Vec<&Installment> = self
            .installments
            .iter()
            .filter(|i| i.status == InstallmentStatus::Approved)
            .collect();
        let received_amount = received
            .iter()
            .fold(Money::ZERO, |acc, i| acc + i.received_amount);
        let received_installments = received.len() as u32;

        LoanSummary {
            total_payable: total_payable.round_dp(2),
            received_amount: received_amount.round_dp(2),
            outstanding_amount: (total_payable - received_amount).round_dp(2),
            expected_profit: self.expected_profit.round_dp(2),
            received_installments,
            remaining_installments: self.terms.duration_months - received_installments,
        }
    }

    /// serialize the loan state to JSON for hand-off to storage
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// restore a loan from its JSON state
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// drain accumulated events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn transition(&mut self, new_status: LoanStatus, actor: ActorId, now: DateTime<Utc>) {
        let old_status = self.status;
        self.status = new_status;
        self.updated_by = Some(actor);
        self.updated_at = Some(now);
        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status,
            timestamp: now,
        });
    }
}
