use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Whether interest accrues before or after the period's repayment is
/// applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestApplyTiming {
    #[default]
    Before,
    After,
}

/// Loan interest rate types.
///
/// A variable rate can change over the lifetime of the loan, usually when it
/// is tied to a benchmark that also changes over time, such as the Bank of
/// England rate. A fixed rate does not change. Metadata only: no formula in
/// this crate depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestRateType {
    #[default]
    Variable,
    Fixed,
}

/// Loan repayment structures, which determine the values of each repayment.
///
/// Check the documentation of the corresponding loan types for explanations
/// of their differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentType {
    FixedRepayment,
    FixedPrincipal,
    InterestOnly,
}

impl RepaymentType {
    /// The concrete loan type name, as reported by NotImplemented errors.
    pub fn loan_name(self) -> &'static str {
        match self {
            RepaymentType::FixedRepayment => "FixedRepaymentLoan",
            RepaymentType::FixedPrincipal => "FixedPrincipalLoan",
            RepaymentType::InterestOnly => "InterestOnlyLoan",
        }
    }
}

/// The calendar interval over which repayments are made. Metadata for
/// callers describing a schedule; the formulas only see period ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentInterval {
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

/// The resolved, immutable parameter set of a loan.
///
/// The `periodic_repayment` semantics depend on the loan type: the total
/// repayment value for a fixed repayment loan, the principal part of the
/// repayment for a fixed principal loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    pub interest_rate: Rate,
    /// Positive integer count of periods, held as a decimal for formula use.
    pub total_repayments: Decimal,
    pub periodic_repayment: Money,
    pub interest_apply_timing: InterestApplyTiming,
    pub interest_rate_type: InterestRateType,
}

/// Builder input for [`crate::Loan::build`].
///
/// Exactly three of the four core values must be supplied; the fourth is
/// solved from the other three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_repayments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_repayment: Option<Money>,
    pub interest_apply_timing: InterestApplyTiming,
    pub interest_rate_type: InterestRateType,
    /// Decimal places applied to the solved parameter. `None` keeps full
    /// precision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_to: Option<u32>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
