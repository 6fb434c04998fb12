//! Fixed repayment loans.
//!
//! The 'normal' type of loan: each repayment pays off some of the original
//! loan amount but also some interest, and every repayment has the same
//! total value. All math uses `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcsError;
use crate::loan::{Loan, SolveInput};
use crate::numeric::amortised_rate;
use crate::types::{InterestApplyTiming, LoanTerms, Money, Rate, RepaymentType};
use crate::LoanCalcsResult;

/// A loan where the total periodic repayment `P` is constant and the
/// principal/interest split shifts each period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedRepaymentLoan {
    terms: LoanTerms,
}

// ---------------------------------------------------------------------------
// Timing factors
// ---------------------------------------------------------------------------

/// `R^(1 - b)`: `R` when interest is applied before the repayment, `1`
/// after. Exact for `b` in {0, 1}, so no decimal exponentiation is needed.
fn rate_power_one_minus_b(rate: Rate, timing: InterestApplyTiming) -> Decimal {
    match timing {
        InterestApplyTiming::Before => rate,
        InterestApplyTiming::After => Decimal::ONE,
    }
}

/// `R^(b - 1)`: the reciprocal of [`rate_power_one_minus_b`]. A zero rate
/// has no reciprocal, so that case is guarded.
fn rate_power_b_minus_one(rate: Rate, timing: InterestApplyTiming) -> LoanCalcsResult<Decimal> {
    match timing {
        InterestApplyTiming::Before => {
            if rate.is_zero() {
                return Err(LoanCalcsError::DivisionByZero {
                    context: "fixed repayment rate factor R^(b - 1)".into(),
                });
            }
            Ok(Decimal::ONE / rate)
        }
        InterestApplyTiming::After => Ok(Decimal::ONE),
    }
}

impl Loan for FixedRepaymentLoan {
    fn repayment_type() -> RepaymentType {
        RepaymentType::FixedRepayment
    }

    fn from_terms(terms: LoanTerms) -> Self {
        FixedRepaymentLoan { terms }
    }

    fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Calculate the loan amount `L`.
    ///
    /// Uses the interest rate `R`, the periodic repayment `P`, the total
    /// amortised rate `A = (1 + R)^N`, and the interest application timing
    /// `b`:
    ///
    /// `L = P * R^(b - 1) * (A - 1) / A`
    fn solve_loan_amount(input: &SolveInput) -> LoanCalcsResult<Money> {
        let periodic_repayment = input.require_periodic_repayment()?;
        let interest_rate = input.require_interest_rate()?;
        let total_amortised_rate = input.require_total_amortised_rate()?;

        if total_amortised_rate.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "fixed repayment loan amount (1 + R)^N".into(),
            });
        }
        let rate_factor = rate_power_b_minus_one(interest_rate, input.interest_apply_timing)?;

        Ok(periodic_repayment * rate_factor * (total_amortised_rate - Decimal::ONE)
            / total_amortised_rate)
    }

    /// Calculate the total number of repayments `N`.
    ///
    /// The natural log form of the calculation is:
    ///
    /// `N = ceil( ln(P / (P - L * R^(1 - b))) / ln(1 + R) )`
    ///
    /// The expression `P - L * R^(1 - b)` has to be strictly positive,
    /// otherwise there would be an unbounded number of repayments.
    fn solve_total_repayments(input: &SolveInput) -> LoanCalcsResult<Decimal> {
        let loan_amount = input.require_loan_amount()?;
        let periodic_repayment = input.require_periodic_repayment()?;
        let interest_rate = input.require_interest_rate()?;

        if interest_rate <= Decimal::ZERO {
            return Err(LoanCalcsError::InvalidInput {
                field: "interest_rate".into(),
                reason: "the interest rate must be positive to solve the total repayments".into(),
            });
        }
        if periodic_repayment <= Decimal::ZERO {
            return Err(LoanCalcsError::InvalidInput {
                field: "periodic_repayment".into(),
                reason: "the periodic repayment must be positive to solve the total repayments"
                    .into(),
            });
        }

        let denominator = periodic_repayment
            - loan_amount * rate_power_one_minus_b(interest_rate, input.interest_apply_timing);
        if denominator <= Decimal::ZERO {
            return Err(LoanCalcsError::InvalidInput {
                field: "periodic_repayment".into(),
                reason: "the values of the loan amount, interest rate, and periodic repayment \
                         lead to an unbounded number of repayments"
                    .into(),
            });
        }

        let periods =
            (periodic_repayment / denominator).ln() / (Decimal::ONE + interest_rate).ln();
        Ok(periods.ceil())
    }

    /// Calculate the periodic repayment `P`.
    ///
    /// Uses the interest rate `R`, the loan amount `L`, the total amortised
    /// rate `A = (1 + R)^N`, and the interest application timing `b`:
    ///
    /// `P = R^(1 - b) * L * A / (A - 1)`
    fn solve_periodic_repayment(input: &SolveInput) -> LoanCalcsResult<Money> {
        let loan_amount = input.require_loan_amount()?;
        let interest_rate = input.require_interest_rate()?;
        let total_amortised_rate = input.require_total_amortised_rate()?;

        let denominator = total_amortised_rate - Decimal::ONE;
        if denominator.is_zero() {
            return Err(LoanCalcsError::DivisionByZero {
                context: "fixed repayment periodic repayment (1 + R)^N - 1".into(),
            });
        }

        Ok(
            rate_power_one_minus_b(interest_rate, input.interest_apply_timing)
                * loan_amount
                * total_amortised_rate
                / denominator,
        )
    }

    /// Calculate the loan balance at the end of period `n`:
    ///
    /// `B_n = L * (1 + R)^n - P * R^(b - 1) * ((1 + R)^n - 1)`
    fn balance_at_period(&self, period: u32) -> LoanCalcsResult<Money> {
        let terms = &self.terms;
        let amortised = amortised_rate(terms.interest_rate, Decimal::from(period))?;
        let rate_factor =
            rate_power_b_minus_one(terms.interest_rate, terms.interest_apply_timing)?;

        Ok(terms.loan_amount * amortised
            - terms.periodic_repayment * rate_factor * (amortised - Decimal::ONE))
    }

    /// The principal part of the repayment due on period `n`:
    ///
    /// `P_p_n = P - P_i_n`
    fn repayment_principal_at_period(&self, period: u32) -> LoanCalcsResult<Money> {
        Ok(self.terms.periodic_repayment - self.repayment_interest_at_period(period)?)
    }

    /// The interest part of the repayment due on period `n`: the interest
    /// accrued on the previous period's closing balance,
    ///
    /// `P_i_n = B_(n-1) * R`
    fn repayment_interest_at_period(&self, period: u32) -> LoanCalcsResult<Money> {
        let previous = period.checked_sub(1).ok_or_else(|| {
            LoanCalcsError::InvariantViolation("amortise rate period has to be positive".into())
        })?;
        Ok(self.balance_at_period(previous)? * self.terms.interest_rate)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanParameters;
    use rust_decimal_macros::dec;

    const BALANCE_EPSILON: Decimal = dec!(0.000000000000000001);

    /// Helper: 1000 at 5% per period, repaying 100 per period.
    fn repayment_of_100() -> FixedRepaymentLoan {
        FixedRepaymentLoan::build(LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            periodic_repayment: Some(dec!(100)),
            ..LoanParameters::default()
        })
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // 1. Term solve: 1000 at 5% repaying 100 takes 15 periods
    // -----------------------------------------------------------------------
    #[test]
    fn test_solve_total_repayments() {
        let loan = repayment_of_100();
        assert_eq!(loan.terms().total_repayments, dec!(15));
    }

    // -----------------------------------------------------------------------
    // 2. Term solve: a repayment too small to amortize is unbounded
    // -----------------------------------------------------------------------
    #[test]
    fn test_solve_total_repayments_unbounded() {
        // Interest per period is exactly 50, so a repayment of 50 never
        // touches the principal
        let err = FixedRepaymentLoan::build(LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            periodic_repayment: Some(dec!(50)),
            ..LoanParameters::default()
        })
        .unwrap_err();

        match err {
            LoanCalcsError::InvalidInput { field, reason } => {
                assert_eq!(field, "periodic_repayment");
                assert!(reason.contains("unbounded number of repayments"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // 3. Balance endpoints: full at period 0, zero at period N
    // -----------------------------------------------------------------------
    #[test]
    fn test_balance_endpoints() {
        let loan = FixedRepaymentLoan::build(LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            total_repayments: Some(6),
            ..LoanParameters::default()
        })
        .unwrap();

        assert_eq!(loan.balance_at_period(0).unwrap(), dec!(1000));

        let closing = loan.balance_at_period(6).unwrap();
        assert!(
            closing.abs() < BALANCE_EPSILON,
            "Balance at the end of the term should be zero, got {}",
            closing
        );
    }

    // -----------------------------------------------------------------------
    // 4. First period split: interest on the full balance, rest principal
    // -----------------------------------------------------------------------
    #[test]
    fn test_first_period_split() {
        let loan = repayment_of_100();

        // Interest on 1000 at 5% is exactly 50
        assert_eq!(loan.repayment_interest_at_period(1).unwrap(), dec!(50));
        assert_eq!(loan.repayment_principal_at_period(1).unwrap(), dec!(50));
    }

    // -----------------------------------------------------------------------
    // 5. Split sums to the periodic repayment for every period
    // -----------------------------------------------------------------------
    #[test]
    fn test_split_sums_to_repayment() {
        let loan = repayment_of_100();

        for period in 1..=15 {
            let interest = loan.repayment_interest_at_period(period).unwrap();
            let principal = loan.repayment_principal_at_period(period).unwrap();
            assert_eq!(
                interest + principal,
                dec!(100),
                "Split at period {} should sum to the repayment",
                period
            );
        }
    }

    // -----------------------------------------------------------------------
    // 6. Interest at period 0 needs the balance at period -1
    // -----------------------------------------------------------------------
    #[test]
    fn test_interest_at_period_zero_fails() {
        let loan = repayment_of_100();
        let err = loan.repayment_interest_at_period(0).unwrap_err();
        match err {
            LoanCalcsError::InvariantViolation(message) => {
                assert_eq!(message, "amortise rate period has to be positive");
            }
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // 7. Interest applied after the repayment drops the rate factor
    // -----------------------------------------------------------------------
    #[test]
    fn test_after_timing_round_trip() {
        let loan = FixedRepaymentLoan::build(LoanParameters {
            loan_amount: Some(dec!(1000)),
            interest_rate: Some(dec!(0.05)),
            total_repayments: Some(6),
            interest_apply_timing: InterestApplyTiming::After,
            ..LoanParameters::default()
        })
        .unwrap();

        // Solve the loan amount back from the solved repayment
        let input = SolveInput {
            loan_amount: None,
            interest_rate: Some(dec!(0.05)),
            total_repayments: Some(dec!(6)),
            periodic_repayment: Some(loan.terms().periodic_repayment),
            interest_apply_timing: InterestApplyTiming::After,
            total_amortised_rate: Some(loan.total_amortised_rate().unwrap()),
        };
        let amount = FixedRepaymentLoan::solve_loan_amount(&input).unwrap();
        assert!(
            (amount - dec!(1000)).abs() < BALANCE_EPSILON,
            "Round-tripped loan amount should reproduce 1000, got {}",
            amount
        );

        let closing = loan.balance_at_period(6).unwrap();
        assert!(closing.abs() < BALANCE_EPSILON);
    }

    // -----------------------------------------------------------------------
    // 8. A zero rate has no reciprocal factor when applied before
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_balance_fails_before_timing() {
        let loan = FixedRepaymentLoan::build_all(
            dec!(1000),
            Decimal::ZERO,
            10,
            dec!(100),
            InterestApplyTiming::Before,
            Default::default(),
        );
        let err = loan.balance_at_period(1).unwrap_err();
        match err {
            LoanCalcsError::DivisionByZero { context } => {
                assert!(context.contains("R^(b - 1)"));
            }
            other => panic!("Expected DivisionByZero, got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // 9. Cumulative interest is a known gap
    // -----------------------------------------------------------------------
    #[test]
    fn test_cumulative_interest_not_implemented() {
        let loan = repayment_of_100();
        let err = loan.cumulative_interest(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FixedRepaymentLoan::cumulative_interest has not been defined"
        );
    }
}
