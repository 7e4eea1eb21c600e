use thiserror::Error;

use crate::types::{LoanId, LoanStatus};

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("invalid state: loan is {current:?}, expected {expected}")]
    InvalidState {
        current: LoanStatus,
        expected: String,
    },

    #[error("loan not found: {id}")]
    LoanNotFound { id: LoanId },

    #[error("installment {sequence} not found for loan {loan_id}")]
    InstallmentNotFound { loan_id: LoanId, sequence: u32 },
}

impl LendingError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LendingError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_state(current: LoanStatus, expected: impl Into<String>) -> Self {
        LendingError::InvalidState {
            current,
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LendingError>;
