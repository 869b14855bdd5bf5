use rust_decimal::Decimal;

use crate::error::SolarRoiError;
use crate::types::Money;
use crate::SolarRoiResult;

/// `(1 + rate)^periods` by repeated multiplication, so that successive
/// periods differ by exactly one factor of `1 + rate`.
fn growth_factor(rate: Decimal, periods: u32) -> SolarRoiResult<Decimal> {
    let step = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor
            .checked_mul(step)
            .ok_or_else(|| SolarRoiError::InvalidInput {
                field: "rate".into(),
                reason: format!("Growth factor overflows after compounding {periods} periods"),
            })?;
    }
    Ok(factor)
}

/// Level payment on a fixed-rate amortising loan.
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)`. A zero rate degrades to
/// straight-line repayment `P / n`.
pub fn loan_payment(principal: Money, periodic_rate: Decimal, periods: u32) -> SolarRoiResult<Money> {
    if periods == 0 {
        return Err(SolarRoiError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = growth_factor(periodic_rate, periods)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(SolarRoiError::DivisionByZero {
            context: "loan payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| SolarRoiError::InvalidInput {
            field: "principal".into(),
            reason: "Loan payment overflows".into(),
        })
}

/// Interest paid over the life of a level-payment loan.
pub fn total_interest(payment: Money, periods: u32, principal: Money) -> SolarRoiResult<Money> {
    payment
        .checked_mul(Decimal::from(periods))
        .map(|paid| paid - principal)
        .ok_or_else(|| SolarRoiError::InvalidInput {
            field: "payment".into(),
            reason: "Total repaid overflows".into(),
        })
}
