//! Fixed principal loans.
//!
//! Similar to a fixed repayment loan in that each repayment pays off some
//! of the original loan amount plus some interest, but only the principal
//! part of each repayment has the same value. The interest part shrinks as
//! the balance declines.
//!
//! Each of the core quantities can also be a caller-supplied custom value
//! below its computed bound, with the difference absorbed by a larger final
//! repayment (the balloon). A custom value above its bound would make that
//! balloon negative, so it is rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcsError;
use crate::loan::{Loan, SolveInput};
use crate::types::{InterestApplyTiming, LoanTerms, Money, RepaymentType};
use crate::LoanCalcsResult;

/// A loan where the principal component of each repayment is constant.
///
/// The closed-form balance only holds when interest is applied before the
/// repayment; applying it after has no known analytical solution here and
/// fails as not implemented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedPrincipalLoan {
    terms: LoanTerms,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_principal_repayment: Option<Money>,
}

impl FixedPrincipalLoan {
    /// Override the principal component of the period repayment.
    ///
    /// The custom amount must not exceed the even split `L / N`; the bound
    /// is checked whenever the principal repayment is computed.
    pub fn with_principal_repayment(mut self, custom: Money) -> Self {
        self.custom_principal_repayment = Some(custom);
        self
    }

    /// The principal component of the period repayment.
    ///
    /// Two scenarios: the even split of the loan amount over the term,
    /// `L / N`, or the custom fixed amount when one is set, with the
    /// difference added on the final repayment (the balloon).
    pub fn principal_repayment(&self) -> LoanCalcsResult<Money> {
        if self.terms.total_repayments.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "fixed principal repayment L / N".into(),
            });
        }
        let calculated = self.terms.loan_amount / self.terms.total_repayments;

        match self.custom_principal_repayment {
            None => Ok(calculated),
            Some(custom) if custom > calculated => Err(LoanCalcsError::InvalidInput {
                field: "custom_principal_repayment".into(),
                reason: format!(
                    "the custom periodic repayment amount, {:.4}, exceeds the maximum value \
                     allowed by the loan amount and the number of repayments, {:.4}",
                    custom, calculated
                ),
            }),
            Some(custom) => Ok(custom),
        }
    }

    /// Calculate the loan amount from the principal repayment and the term,
    /// `L = P * N`, or validate a custom amount against that bound.
    pub fn loan_amount_from(
        periodic_repayment: Money,
        total_repayments: Decimal,
        custom_loan_amount: Option<Money>,
    ) -> LoanCalcsResult<Money> {
        let calculated = periodic_repayment * total_repayments;

        match custom_loan_amount {
            None => Ok(calculated),
            Some(custom) if custom > calculated => Err(LoanCalcsError::InvalidInput {
                field: "custom_loan_amount".into(),
                reason: format!(
                    "the custom loan amount, {:.4}, exceeds the maximum value allowed by the \
                     principal repayment amount and the number of repayments, {:.4}",
                    custom, calculated
                ),
            }),
            Some(custom) => Ok(custom),
        }
    }

    /// Calculate the periodic (principal) repayment from the loan amount
    /// and the term, `P = L / N`, or validate a custom amount against that
    /// bound.
    pub fn periodic_repayment_from(
        loan_amount: Money,
        total_repayments: Decimal,
        custom_periodic_repayment: Option<Money>,
    ) -> LoanCalcsResult<Money> {
        if total_repayments.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "fixed principal periodic repayment L / N".into(),
            });
        }
        let calculated = loan_amount / total_repayments;

        match custom_periodic_repayment {
            None => Ok(calculated),
            Some(custom) if custom > calculated => Err(LoanCalcsError::InvalidInput {
                field: "custom_periodic_repayment".into(),
                reason: format!(
                    "the custom periodic repayment amount, {:.4}, exceeds the maximum value \
                     allowed by the loan amount and the number of repayments, {:.4}",
                    custom, calculated
                ),
            }),
            Some(custom) => Ok(custom),
        }
    }

    /// Calculate the total repayments from the loan amount and the
    /// principal repayment, `N = ceil(L / P)`, or validate a custom count
    /// against that bound.
    pub fn total_repayments_from(
        loan_amount: Money,
        periodic_repayment: Money,
        custom_total_repayments: Option<Decimal>,
    ) -> LoanCalcsResult<Decimal> {
        if periodic_repayment.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "fixed principal total repayments L / P".into(),
            });
        }
        let calculated = (loan_amount / periodic_repayment).ceil();

        match custom_total_repayments {
            None => Ok(calculated),
            Some(custom) if custom > calculated => Err(LoanCalcsError::InvalidInput {
                field: "custom_total_repayments".into(),
                reason: format!(
                    "the custom number of repayments, {}, exceeds the maximum value allowed by \
                     the loan amount and the principal repayment value, {}",
                    custom, calculated
                ),
            }),
            Some(custom) => Ok(custom),
        }
    }
}

impl Loan for FixedPrincipalLoan {
    fn repayment_type() -> RepaymentType {
        RepaymentType::FixedPrincipal
    }

    fn from_terms(terms: LoanTerms) -> Self {
        FixedPrincipalLoan {
            terms,
            custom_principal_repayment: None,
        }
    }

    fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Calculate the loan amount `L = P * N`.
    fn solve_loan_amount(input: &SolveInput) -> LoanCalcsResult<Money> {
        Self::loan_amount_from(
            input.require_periodic_repayment()?,
            input.require_total_repayments()?,
            None,
        )
    }

    /// Calculate the total repayments `N = ceil(L / P)`.
    fn solve_total_repayments(input: &SolveInput) -> LoanCalcsResult<Decimal> {
        Self::total_repayments_from(
            input.require_loan_amount()?,
            input.require_periodic_repayment()?,
            None,
        )
    }

    /// Calculate the periodic repayment `P = L / N`: the fixed principal
    /// part only, with the interest for each period paid on top of it.
    fn solve_periodic_repayment(input: &SolveInput) -> LoanCalcsResult<Money> {
        Self::periodic_repayment_from(
            input.require_loan_amount()?,
            input.require_total_repayments()?,
            None,
        )
    }

    /// Calculate the loan balance at the end of period `n`.
    ///
    /// When interest is applied before the repayment, each repayment is the
    /// fixed principal amount plus the interest accrued in that period, so
    /// the balance is the loan amount less the principal repaid so far:
    ///
    /// `B_n = L - n * P_p`
    fn balance_at_period(&self, period: u32) -> LoanCalcsResult<Money> {
        if self.terms.interest_apply_timing == InterestApplyTiming::After {
            return Err(LoanCalcsError::not_implemented(
                Self::repayment_type(),
                "balance_at_period with interest applied after the repayment",
            ));
        }
        Ok(self.terms.loan_amount - Decimal::from(period) * self.principal_repayment()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
