//! Numeric primitives shared by all loan types.

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::LoanCalcsError;
use crate::types::Rate;
use crate::LoanCalcsResult;

/// Convert a numeric or textual input into an exact decimal.
///
/// Casting a binary float directly to a decimal drags the float's rounding
/// artifacts along with it, so the conversion goes through the value's text
/// representation instead: `0.1_f64` becomes exactly `0.1`.
pub fn to_exact_decimal<T: Display>(value: T) -> LoanCalcsResult<Decimal> {
    let text = value.to_string();
    Decimal::from_str(&text).map_err(|e| LoanCalcsError::InvalidInput {
        field: "value".into(),
        reason: format!("cannot convert {text:?} to a decimal: {e}"),
    })
}

/// Calculate the amortised rate at period `n`.
///
/// Let `R` be the interest rate on a loan. Then the amortised rate is
/// `(1 + R)^n`.
pub fn amortised_rate(interest_rate: Rate, n: Decimal) -> LoanCalcsResult<Decimal> {
    if n < Decimal::ZERO {
        return Err(LoanCalcsError::InvariantViolation(
            "amortise rate period has to be positive".into(),
        ));
    }
    Ok((Decimal::ONE + interest_rate).powd(n))
}

/// Round a value to an explicit number of decimal places.
///
/// The builder applies this to each solved parameter. `None` keeps full
/// precision.
pub fn apply_rounding(value: Decimal, round_to: Option<u32>) -> Decimal {
    match round_to {
        Some(dp) => value.round_dp(dp),
        None => value,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
