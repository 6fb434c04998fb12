use thiserror::Error;

use crate::types::RepaymentType;

#[derive(Debug, Error)]
pub enum LoanCalcsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("{loan_type}::{operation} has not been defined")]
    NotImplemented { loan_type: String, operation: String },
}

impl LoanCalcsError {
    /// A formula or query operation the given loan type does not define.
    pub fn not_implemented(repayment_type: RepaymentType, operation: &str) -> Self {
        LoanCalcsError::NotImplemented {
            loan_type: repayment_type.loan_name().into(),
            operation: operation.into(),
        }
    }
}
