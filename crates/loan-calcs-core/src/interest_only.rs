//! Interest-only loans.
//!
//! Each periodic repayment only pays off the interest accrued on the loan;
//! the principal is paid off in full by the final repayment. The balance is
//! therefore unchanged until the final period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcsError;
use crate::loan::{Loan, SolveInput};
use crate::types::{LoanTerms, Money, RepaymentType};
use crate::LoanCalcsResult;

/// A loan where the periodic repayment equals the periodic interest and the
/// full principal is due on the final period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestOnlyLoan {
    terms: LoanTerms,
}

impl Loan for InterestOnlyLoan {
    fn repayment_type() -> RepaymentType {
        RepaymentType::InterestOnly
    }

    fn from_terms(terms: LoanTerms) -> Self {
        InterestOnlyLoan { terms }
    }

    fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Calculate the loan amount `L = P / R`.
    fn solve_loan_amount(input: &SolveInput) -> LoanCalcsResult<Money> {
        let periodic_repayment = input.require_periodic_repayment()?;
        let interest_rate = input.require_interest_rate()?;

        if interest_rate.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "interest only loan amount P / R".into(),
            });
        }
        Ok(periodic_repayment / interest_rate)
    }

    /// The total repayments cannot be derived: the balance is the same
    /// after every repayment, so an interest-only loan can run for as many
    /// periods as the borrower likes. The supplied value is required.
    fn solve_total_repayments(input: &SolveInput) -> LoanCalcsResult<Decimal> {
        input
            .total_repayments
            .ok_or_else(|| LoanCalcsError::InvalidInput {
                field: "total_repayments".into(),
                reason: "the total repayments must be supplied for an interest-only loan".into(),
            })
    }

    /// Calculate the periodic repayment, which is the periodic interest,
    /// `P = L * R`. The final repayment is then `P + L`.
    fn solve_periodic_repayment(input: &SolveInput) -> LoanCalcsResult<Money> {
        let loan_amount = input.require_loan_amount()?;
        let interest_rate = input.require_interest_rate()?;
        Ok(loan_amount * interest_rate)
    }

    /// Calculate the loan balance at the end of period `n`:
    ///
    /// `B_n = L` for `n < N`, and `B_n = 0` at `n = N`.
    fn balance_at_period(&self, period: u32) -> LoanCalcsResult<Money> {
        if Decimal::from(period) == self.terms.total_repayments {
            Ok(Decimal::ZERO)
        } else {
            Ok(self.terms.loan_amount)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
