use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ActorId, ContributorId, LoanId, LoanStatus};

/// all events emitted by a loan over its lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOpened {
        loan_id: LoanId,
        principal: Money,
        duration_months: u32,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    LoanRejected {
        loan_id: LoanId,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    LoanMarkedDefaulter {
        loan_id: LoanId,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    TermsUpdated {
        loan_id: LoanId,
        principal: Money,
        duration_months: u32,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    ScheduleGenerated {
        loan_id: LoanId,
        installments: u32,
        installment_amount: Money,
        first_due_date: NaiveDate,
    },
    ContributorAdded {
        loan_id: LoanId,
        contributor_id: ContributorId,
        amount: Money,
    },
    ContributorUpdated {
        loan_id: LoanId,
        contributor_id: ContributorId,
        amount: Money,
    },
    ContributorRemoved {
        loan_id: LoanId,
        contributor_id: ContributorId,
    },
    PaymentRecorded {
        loan_id: LoanId,
        sequence: u32,
        amount: Money,
        actor: ActorId,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
