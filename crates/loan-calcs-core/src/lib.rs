pub mod error;
pub mod fixed_principal;
pub mod fixed_repayment;
pub mod interest_only;
pub mod loan;
pub mod numeric;
pub mod types;

pub use error::LoanCalcsError;
pub use fixed_principal::FixedPrincipalLoan;
pub use fixed_repayment::FixedRepaymentLoan;
pub use interest_only::InterestOnlyLoan;
pub use loan::{Loan, SolveInput};
pub use types::*;

/// Standard result type for all loan-calcs operations
pub type LoanCalcsResult<T> = Result<T, LoanCalcsError>;
