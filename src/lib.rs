pub mod calculators;
pub mod dashboard;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod repository;
pub mod schedule;
pub mod service;
pub mod types;

// re-export key types
pub use calculators::{AmortizationCalculator, ContributionCalculator};
pub use dashboard::{DashboardAggregator, DashboardSnapshot};
pub use decimal::{Money, Rate};
pub use errors::{LendingError, Result};
pub use events::{Event, EventStore};
pub use loan::{ContributorInput, Loan};
pub use repository::{BorrowerDirectory, InstallmentStore, LoanDirectory, LoanRecord, LoanStore};
pub use service::{approve_loan, delete_loan, reject_loan};
pub use schedule::{Installment, InstallmentSchedule, PaymentReceipt};
pub use types::{
    ActorId, AmortizationMethod, AmortizationQuote, BorrowerId, ContributionShare, Contributor,
    ContributorId, InstallmentStatus, LoanId, LoanStatus, LoanSummary, LoanTerms, PaymentMode,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
