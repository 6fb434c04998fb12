//! The abstract loan contract shared by all repayment structures.
//!
//! The following notation is used throughout the loan types:
//!   * `L`: loan amount.
//!   * `R`: periodic interest rate.
//!   * `N`: total number of repayments.
//!   * `P`: periodic repayment value (its principal part is `P_p`).
//!   * `b`: whether interest is applied before (0) or after (1) the
//!     repayment.
//!   * `B_n`: the balance on the loan at the end of period `n`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::LoanCalcsError;
use crate::numeric::{amortised_rate, apply_rounding};
use crate::types::{
    InterestApplyTiming, InterestRateType, LoanParameters, LoanTerms, Money, Rate, RepaymentType,
};
use crate::LoanCalcsResult;

/// Known values handed to a solve-for-unknown formula.
///
/// Carries every already-known core value plus the precomputed total
/// amortised rate `(1 + R)^N`. The amortised rate is `None` exactly when the
/// interest rate or the term count is the unknown being solved.
#[derive(Debug, Clone)]
pub struct SolveInput {
    pub loan_amount: Option<Money>,
    pub interest_rate: Option<Rate>,
    /// Term count as a decimal, when known.
    pub total_repayments: Option<Decimal>,
    pub periodic_repayment: Option<Money>,
    pub interest_apply_timing: InterestApplyTiming,
    /// `(1 + R)^N`, precomputed when both the rate and the term are known.
    pub total_amortised_rate: Option<Decimal>,
}

impl SolveInput {
    fn missing(field: &str) -> LoanCalcsError {
        LoanCalcsError::InvalidInput {
            field: field.into(),
            reason: "conversion from a missing value to a decimal is not supported".into(),
        }
    }

    pub fn require_loan_amount(&self) -> LoanCalcsResult<Money> {
        self.loan_amount.ok_or_else(|| Self::missing("loan_amount"))
    }

    pub fn require_interest_rate(&self) -> LoanCalcsResult<Rate> {
        self.interest_rate
            .ok_or_else(|| Self::missing("interest_rate"))
    }

    pub fn require_total_repayments(&self) -> LoanCalcsResult<Decimal> {
        self.total_repayments
            .ok_or_else(|| Self::missing("total_repayments"))
    }

    pub fn require_periodic_repayment(&self) -> LoanCalcsResult<Money> {
        self.periodic_repayment
            .ok_or_else(|| Self::missing("periodic_repayment"))
    }

    /// The precomputed `(1 + R)^N`; absent when the rate or the term is the
    /// unknown being solved.
    pub fn require_total_amortised_rate(&self) -> LoanCalcsResult<Decimal> {
        self.total_amortised_rate
            .ok_or_else(|| Self::missing("total_amortised_rate"))
    }
}

/// A loan: a fixed value of money borrowed by an entity and usually repaid
/// over a series of instalments.
///
/// The repayment for a loan typically has at least two components: the
/// *principal* part, which pays off the original money that was borrowed,
/// and the *interest* part, which pays off the interest applied on the
/// loan. In real life a loan can have other components such as fees; these
/// are outside the scope of these types.
///
/// Each concrete loan type supplies its own solve-for-unknown formulas and
/// per-period queries. A formula or query a type does not define fails with
/// [`LoanCalcsError::NotImplemented`] naming the type and the operation.
pub trait Loan: Sized {
    /// The repayment structure implemented by this loan type.
    fn repayment_type() -> RepaymentType;

    /// Construct the loan from an already-resolved parameter set.
    fn from_terms(terms: LoanTerms) -> Self;

    /// The resolved parameter set.
    fn terms(&self) -> &LoanTerms;

    // -----------------------------------------------------------------------
    // Solve-for-unknown formulas
    // -----------------------------------------------------------------------

    /// Calculate the loan amount `L` from the other known values.
    fn solve_loan_amount(_input: &SolveInput) -> LoanCalcsResult<Money> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "solve_loan_amount",
        ))
    }

    /// Calculate the interest rate `R` from the other known values.
    fn solve_interest_rate(_input: &SolveInput) -> LoanCalcsResult<Rate> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "solve_interest_rate",
        ))
    }

    /// Calculate the total number of repayments `N` from the other known
    /// values.
    fn solve_total_repayments(_input: &SolveInput) -> LoanCalcsResult<Decimal> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "solve_total_repayments",
        ))
    }

    /// Calculate the periodic repayment `P` from the other known values.
    fn solve_periodic_repayment(_input: &SolveInput) -> LoanCalcsResult<Money> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "solve_periodic_repayment",
        ))
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Build the loan using all four of the key components.
    ///
    /// No formula computation happens here; the integer term count is
    /// converted to a decimal for formula use and the values are stored as
    /// given.
    fn build_all(
        loan_amount: Money,
        interest_rate: Rate,
        total_repayments: u32,
        periodic_repayment: Money,
        interest_apply_timing: InterestApplyTiming,
        interest_rate_type: InterestRateType,
    ) -> Self {
        Self::from_terms(LoanTerms {
            loan_amount,
            interest_rate,
            total_repayments: Decimal::from(total_repayments),
            periodic_repayment,
            interest_apply_timing,
            interest_rate_type,
        })
    }

    /// Build the loan from exactly three of the four core values, solving
    /// for the one left unset.
    ///
    /// Supplying all four values is rejected: there is no consistency
    /// validation for a fully specified parameter set, so the builder only
    /// accepts a set it can resolve. Leaving more than one value unset is
    /// rejected as well.
    fn build(params: LoanParameters) -> LoanCalcsResult<Self> {
        let LoanParameters {
            mut loan_amount,
            mut interest_rate,
            mut total_repayments,
            mut periodic_repayment,
            interest_apply_timing,
            interest_rate_type,
            round_to,
        } = params;

        let unset = [
            loan_amount.is_none(),
            interest_rate.is_none(),
            total_repayments.is_none(),
            periodic_repayment.is_none(),
        ]
        .into_iter()
        .filter(|unset| *unset)
        .count();

        if unset == 0 {
            return Err(LoanCalcsError::InvalidInput {
                field: "parameters".into(),
                reason: "all four core values were supplied; leave exactly one unset to be solved"
                    .into(),
            });
        }
        if unset > 1 {
            return Err(LoanCalcsError::InvalidInput {
                field: "parameters".into(),
                reason: format!("{unset} core values are unset; exactly one may be solved"),
            });
        }

        let total_repayments_dec = total_repayments.map(Decimal::from);
        // Precomputed only when both the rate and the term are known. When
        // the term is the unknown being solved, its formula works from the
        // raw inputs instead.
        let total_amortised_rate = match (interest_rate, total_repayments_dec) {
            (Some(rate), Some(n)) => Some(amortised_rate(rate, n)?),
            _ => None,
        };

        let input = SolveInput {
            loan_amount,
            interest_rate,
            total_repayments: total_repayments_dec,
            periodic_repayment,
            interest_apply_timing,
            total_amortised_rate,
        };

        if loan_amount.is_none() {
            loan_amount = Some(apply_rounding(Self::solve_loan_amount(&input)?, round_to));
        } else if interest_rate.is_none() {
            interest_rate = Some(apply_rounding(Self::solve_interest_rate(&input)?, round_to));
        } else if total_repayments.is_none() {
            let solved = Self::solve_total_repayments(&input)?;
            total_repayments =
                Some(
                    solved
                        .to_u32()
                        .ok_or_else(|| LoanCalcsError::InvalidInput {
                            field: "total_repayments".into(),
                            reason: format!(
                                "the solved term count {solved} is not a positive integer"
                            ),
                        })?,
                );
        } else {
            periodic_repayment = Some(apply_rounding(
                Self::solve_periodic_repayment(&input)?,
                round_to,
            ));
        }

        match (
            loan_amount,
            interest_rate,
            total_repayments,
            periodic_repayment,
        ) {
            (
                Some(loan_amount),
                Some(interest_rate),
                Some(total_repayments),
                Some(periodic_repayment),
            ) => Ok(Self::build_all(
                loan_amount,
                interest_rate,
                total_repayments,
                periodic_repayment,
                interest_apply_timing,
                interest_rate_type,
            )),
            _ => Err(LoanCalcsError::InvalidInput {
                field: "parameters".into(),
                reason: "resolution left a core value unset".into(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Query operations
    // -----------------------------------------------------------------------

    /// Calculate the amortised rate at the complete term, `(1 + R)^N`.
    fn total_amortised_rate(&self) -> LoanCalcsResult<Decimal> {
        amortised_rate(self.terms().interest_rate, self.terms().total_repayments)
    }

    /// Calculate the loan balance `B_n` at the end of period `n`.
    fn balance_at_period(&self, period: u32) -> LoanCalcsResult<Money>;

    /// Calculate the principal part of the repayment due on period `n`.
    fn repayment_principal_at_period(&self, _period: u32) -> LoanCalcsResult<Money> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "repayment_principal_at_period",
        ))
    }

    /// Calculate the interest part of the repayment due on period `n`.
    fn repayment_interest_at_period(&self, _period: u32) -> LoanCalcsResult<Money> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "repayment_interest_at_period",
        ))
    }

    /// Calculate the total of the interest that has been accrued, including
    /// interest already paid off, at the end of period `n`.
    ///
    /// In financial terms this is the interest income for the entity that
    /// issued the loan.
    fn cumulative_interest(&self, _period: u32) -> LoanCalcsResult<Money> {
        Err(LoanCalcsError::not_implemented(
            Self::repayment_type(),
            "cumulative_interest",
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_repayment::FixedRepaymentLoan;
    use rust_decimal_macros::dec;

    fn three_known() -> LoanParameters {
        LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            total_repayments: Some(6),
            ..LoanParameters::default()
        }
    }

    #[test]
    fn test_build_rejects_all_four_supplied() {
        let params = LoanParameters {
            periodic_repayment: Some(dec!(100)),
            ..three_known()
        };
        let err = FixedRepaymentLoan::build(params).unwrap_err();
        match err {
            LoanCalcsError::InvalidInput { field, reason } => {
                assert_eq!(field, "parameters");
                assert!(reason.contains("all four core values"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_build_rejects_more_than_one_unset() {
        let params = LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            ..LoanParameters::default()
        };
        let err = FixedRepaymentLoan::build(params).unwrap_err();
        match err {
            LoanCalcsError::InvalidInput { field, reason } => {
                assert_eq!(field, "parameters");
                assert!(reason.contains("exactly one"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_build_solving_interest_rate_is_not_implemented() {
        let params = LoanParameters {
            loan_amount: Some(dec!(1000)),
            total_repayments: Some(6),
            periodic_repayment: Some(dec!(100)),
            ..LoanParameters::default()
        };
        let err = FixedRepaymentLoan::build(params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FixedRepaymentLoan::solve_interest_rate has not been defined"
        );
    }

    #[test]
    fn test_build_applies_rounding_to_solved_value() {
        let params = LoanParameters {
            round_to: Some(2),
            ..three_known()
        };
        let loan = FixedRepaymentLoan::build(params).unwrap();
        // Full precision repayment is 197.0174... on these terms
        assert_eq!(loan.terms().periodic_repayment, dec!(197.02));
    }

    #[test]
    fn test_total_amortised_rate_recomputed_from_terms() {
        let loan = FixedRepaymentLoan::build(three_known()).unwrap();
        assert_eq!(loan.total_amortised_rate().unwrap(), dec!(1.340095640625));
    }

    #[test]
    fn test_solve_input_reports_missing_values() {
        let input = SolveInput {
            loan_amount: None,
            interest_rate: None,
            total_repayments: None,
            periodic_repayment: None,
            interest_apply_timing: InterestApplyTiming::Before,
            total_amortised_rate: None,
        };
        let err = input.require_loan_amount().unwrap_err();
        match err {
            LoanCalcsError::InvalidInput { field, reason } => {
                assert_eq!(field, "loan_amount");
                assert_eq!(
                    reason,
                    "conversion from a missing value to a decimal is not supported"
                );
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
